use crate::money::Amount;

/// Failures of the underlying key-value store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("sled storage failure: {0}")]
    Storage(#[from] sled::Error),
    #[error("failed to encode record: {0}")]
    Encode(String),
    #[error("failed to decode record: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error(transparent)]
    Id(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("no actor is signed in")]
    Unauthenticated,
    #[error("actor is neither the artist nor an administrator")]
    Forbidden,
    #[error("artwork {0} does not exist")]
    NotFound(String),
    #[error("artwork is not for sale")]
    NotForSale,
    #[error("bidding on this artwork has closed")]
    BiddingClosed,
    #[error("bid of {amount} is too low, minimum is {minimum}")]
    BidTooLow { amount: Amount, minimum: Amount },
    #[error("starting price must be a positive amount")]
    InvalidPrice,
    #[error("{0} days is not an offered bidding duration")]
    InvalidDuration(u32),
    #[error("artists cannot bid on their own artwork")]
    SelfBid,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("no actor is signed in")]
    Unauthenticated,
    #[error("actor is not allowed to modify this artwork")]
    Forbidden,
    #[error("artwork {0} does not exist")]
    NotFound(String),
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("rating must be between 1 and 5 stars, got {0}")]
    InvalidRating(u8),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} could not be parsed: {value:?}")]
    Unparsable { key: &'static str, value: String },
    #[error("minimum bid increment must be at least one minor unit")]
    ZeroIncrement,
    #[error("at least one bidding duration must be offered")]
    NoDurations,
    #[error("default duration of {0} days is not among the offered durations")]
    DefaultNotOffered(u32),
}

/// Failures opening a [`Marketplace`](crate::marketplace::Marketplace).
#[derive(thiserror::Error, Debug)]
pub enum OpenError {
    #[error("invalid ledger configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
