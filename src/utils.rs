//! Identifier minting

use crate::error::StoreError;
use bech32::Bech32m;
use uuid7::uuid7;

pub const ARTWORK_HRP: &str = "art_";
pub const BID_HRP: &str = "bid_";
pub const USER_HRP: &str = "user_";
pub const COMMENT_HRP: &str = "cmt_";
pub const RATING_HRP: &str = "rate_";
pub const LISTING_HRP: &str = "lst_";

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Same as [`new_uuid_to_bech32`], for use inside store-backed operations.
pub(crate) fn mint(hrp: &str) -> Result<String, StoreError> {
    Ok(new_uuid_to_bech32(hrp)?)
}
