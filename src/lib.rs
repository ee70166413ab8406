//! Listing and bid ledger for a local-first art marketplace.
//!
//! Artists list artworks for sale, members bid on them, and every record is
//! kept in a local sled database. [`marketplace::Marketplace`] is the entry
//! point; [`ledger::Ledger`] holds the sale and bidding rules.

pub mod artwork;
pub mod bid;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod marketplace;
pub mod money;
pub mod store;
pub mod time;
pub mod utils;
