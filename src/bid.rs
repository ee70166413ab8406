use crate::identity::IdentitySnapshot;
use crate::money::Amount;
use crate::time::TimeStamp;
use chrono::Utc;
use std::cmp::Ordering;

/// An accepted bid. Never mutated after it is written.
#[derive(Debug, PartialEq, Eq, minicbor::Encode, minicbor::Decode, Clone)]
pub struct Bid {
    #[n(0)]
    pub id: String, // bech32, `bid_` prefix
    #[n(1)]
    pub seq: u64, // insertion order across the whole log
    #[n(2)]
    pub artwork_id: String,
    #[n(3)]
    pub listing_id: String, // the listing that was active when the bid was accepted
    #[n(4)]
    pub bidder: IdentitySnapshot,
    #[n(5)]
    pub amount: Amount,
    #[n(6)]
    pub created_at: TimeStamp<Utc>,
}

impl Bid {
    pub fn new(
        id: String,
        seq: u64,
        artwork_id: String,
        listing_id: String,
        bidder: IdentitySnapshot,
        amount: Amount,
        created_at: TimeStamp<Utc>,
    ) -> Self {
        Self {
            id,
            seq,
            artwork_id,
            listing_id,
            bidder,
            amount,
            created_at,
        }
    }
    pub fn bidder_id(&self) -> &str {
        &self.bidder.id
    }
}

/// Highest amount first; equal amounts go to whoever bid first.
pub fn by_rank(a: &Bid, b: &Bid) -> Ordering {
    b.amount
        .cmp(&a.amount)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.seq.cmp(&b.seq))
}

pub fn rank(bids: &mut [Bid]) {
    bids.sort_by(by_rank);
}
