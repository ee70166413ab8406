//! Listing & bid ledger.
//!
//! Owns the sale state of every artwork and the append-only bid log. The
//! current bid is never cached: it is the highest bid in the log tagged with
//! the artwork's active listing, recomputed on every read.
use crate::artwork::{Artwork, SaleState, SaleStatus};
use crate::bid::{self, Bid};
use crate::config::LedgerConfig;
use crate::error::{ConfigError, LedgerError};
use crate::identity::Actor;
use crate::money::Amount;
use crate::store::Store;
use crate::time::{Clock, TimeStamp};
use crate::utils;
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Ledger {
    store: Arc<Store>,
    config: Arc<LedgerConfig>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Refuses a config that fails [`LedgerConfig::validate`]; a zero
    /// increment would let a bid tie the amount it has to beat.
    pub fn new(
        store: Arc<Store>,
        config: Arc<LedgerConfig>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            clock,
        })
    }

    fn load(&self, artwork_id: &str) -> Result<Artwork, LedgerError> {
        self.store
            .artwork(artwork_id)?
            .ok_or_else(|| LedgerError::NotFound(artwork_id.to_string()))
    }

    /// Open or close an artwork for bidding.
    ///
    /// Turning sale on for an unlisted artwork starts a fresh listing with no
    /// current bid. Turning it on again while already listed keeps the
    /// listing (and its bids) and overwrites price and deadline. When
    /// `starting_price` is `None` the listed price is reused. Turning sale off
    /// always drops price, deadline and current bid; the bid history stays.
    pub fn list_for_sale(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        for_sale: bool,
        starting_price: Option<Amount>,
        bid_end_time: Option<TimeStamp<Utc>>,
    ) -> Result<Artwork, LedgerError> {
        let actor = actor.ok_or(LedgerError::Unauthenticated)?;

        let _guard = self.store.write_guard();
        let mut artwork = self.load(artwork_id)?;
        if !actor.can_manage(&artwork.artist_id) {
            return Err(LedgerError::Forbidden);
        }

        artwork.sale = if for_sale {
            let starting_price = match (starting_price, artwork.starting_price()) {
                (Some(price), _) if price.is_positive() => price,
                (Some(_), _) => return Err(LedgerError::InvalidPrice),
                (None, Some(listed)) => listed,
                (None, None) => return Err(LedgerError::InvalidPrice),
            };
            let listing_id = match artwork.listing_id() {
                Some(active) => active.to_string(),
                None => utils::mint(utils::LISTING_HRP)?,
            };
            SaleState::Listed {
                listing_id,
                starting_price,
                bid_end_time,
            }
        } else {
            SaleState::Unlisted
        };
        self.store.put_artwork(&artwork)?;

        match &artwork.sale {
            SaleState::Listed {
                listing_id,
                starting_price,
                bid_end_time,
            } => info!(
                artwork = %artwork.id,
                listing = %listing_id,
                %starting_price,
                deadline = ?bid_end_time.as_ref().map(ToString::to_string),
                "artwork listed for sale"
            ),
            SaleState::Unlisted => info!(artwork = %artwork.id, "artwork removed from sale"),
        }

        Ok(artwork)
    }

    /// List an artwork for one of the configured durations, counted from now.
    pub fn list_for_days(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        starting_price: Amount,
        days: u32,
    ) -> Result<Artwork, LedgerError> {
        if !self.config.offers_duration(days) {
            return Err(LedgerError::InvalidDuration(days));
        }
        let deadline = self
            .clock
            .now()
            .plus_days(days)
            .ok_or(LedgerError::InvalidDuration(days))?;
        self.list_for_sale(actor, artwork_id, true, Some(starting_price), Some(deadline))
    }

    /// Same as [`Ledger::list_for_days`] with the configured default duration.
    pub fn list_with_default_duration(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        starting_price: Amount,
    ) -> Result<Artwork, LedgerError> {
        self.list_for_days(
            actor,
            artwork_id,
            starting_price,
            self.config.default_bid_duration_days,
        )
    }

    /// Place a bid. Either the bid is appended and returned, or nothing changes.
    pub fn place_bid(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        amount: Amount,
    ) -> Result<Bid, LedgerError> {
        let actor = actor.ok_or(LedgerError::Unauthenticated)?;

        let _guard = self.store.write_guard();
        let artwork = self.load(artwork_id)?;
        let Some(listing_id) = artwork.listing_id() else {
            debug!(artwork = %artwork_id, bidder = %actor.id, "bid rejected: not for sale");
            return Err(LedgerError::NotForSale);
        };
        if artwork.artist_id == actor.id {
            debug!(artwork = %artwork_id, "bid rejected: artist bidding on own work");
            return Err(LedgerError::SelfBid);
        }

        let now = self.clock.now();
        if artwork.status_at(&now) == SaleStatus::Closed {
            debug!(artwork = %artwork_id, bidder = %actor.id, "bid rejected: bidding closed");
            return Err(LedgerError::BiddingClosed);
        }

        let minimum = self.threshold(&artwork)?;
        if minimum.is_none_or(|minimum| amount < minimum) {
            let minimum = minimum.unwrap_or(Amount::MAX);
            debug!(artwork = %artwork_id, %amount, %minimum, "bid rejected: too low");
            return Err(LedgerError::BidTooLow { amount, minimum });
        }

        let bid = Bid::new(
            utils::mint(utils::BID_HRP)?,
            self.store.next_seq()?,
            artwork.id.clone(),
            listing_id.to_string(),
            actor.snapshot(),
            amount,
            now,
        );
        self.store.append_bid(&bid)?;
        info!(artwork = %artwork_id, bid = %bid.id, bidder = %actor.id, %amount, "bid accepted");

        Ok(bid)
    }

    /// Bids on the active listing only, ranked.
    fn listing_bids(&self, artwork: &Artwork) -> Result<Vec<Bid>, LedgerError> {
        let Some(listing_id) = artwork.listing_id() else {
            return Ok(vec![]);
        };
        let mut bids = self.store.bids_for(&artwork.id)?;
        bids.retain(|b| b.listing_id == listing_id);
        bid::rank(&mut bids);
        Ok(bids)
    }

    /// The value a new bid has to exceed: current bid, else starting price, else zero.
    fn floor(&self, artwork: &Artwork) -> Result<Amount, LedgerError> {
        let current = self.listing_bids(artwork)?.first().map(|b| b.amount);
        Ok(current
            .or(artwork.starting_price())
            .unwrap_or(Amount::ZERO))
    }

    /// Smallest acceptable amount, `None` when nothing can beat the floor.
    fn threshold(&self, artwork: &Artwork) -> Result<Option<Amount>, LedgerError> {
        Ok(self.floor(artwork)?.checked_add(self.config.min_increment))
    }

    /// All bids ever placed on an artwork, highest first, earliest wins ties.
    pub fn bids_for_artwork(&self, artwork_id: &str) -> Result<Vec<Bid>, LedgerError> {
        let mut bids = self.store.bids_for(artwork_id)?;
        bid::rank(&mut bids);
        Ok(bids)
    }

    pub fn highest_bid(&self, artwork_id: &str) -> Result<Option<Bid>, LedgerError> {
        Ok(self.bids_for_artwork(artwork_id)?.into_iter().next())
    }

    /// Every bid one user has placed, in the order they were placed.
    pub fn bids_by_user(&self, user_id: &str) -> Result<Vec<Bid>, LedgerError> {
        let mut bids = self.store.bids()?;
        bids.retain(|b| b.bidder_id() == user_id);
        Ok(bids)
    }

    /// Highest bid on the active listing; `None` when unlisted or not yet bid on.
    pub fn current_bid(&self, artwork_id: &str) -> Result<Option<Amount>, LedgerError> {
        let artwork = self.load(artwork_id)?;
        Ok(self.listing_bids(&artwork)?.first().map(|b| b.amount))
    }

    /// The amount to prefill for the next bid. Anything below it is rejected.
    pub fn minimum_next_bid(&self, artwork_id: &str) -> Result<Amount, LedgerError> {
        let artwork = self.load(artwork_id)?;
        Ok(self.threshold(&artwork)?.unwrap_or(Amount::MAX))
    }

    pub fn sale_status(&self, artwork_id: &str) -> Result<SaleStatus, LedgerError> {
        Ok(self.load(artwork_id)?.status_at(&self.clock.now()))
    }

    /// Time left before bidding closes. `None` without a deadline, zero once passed.
    pub fn time_remaining(&self, artwork_id: &str) -> Result<Option<TimeDelta>, LedgerError> {
        let artwork = self.load(artwork_id)?;
        let now = self.clock.now();
        Ok(artwork
            .bid_end_time()
            .map(|end| end.since(&now).max(TimeDelta::zero())))
    }
}
