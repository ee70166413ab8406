//! Artwork content, comments and ratings.
//!
//! The catalog owns everything about an artwork except its sale state, which
//! only the [`Ledger`](crate::ledger::Ledger) writes.
use crate::artwork::{Artwork, ArtworkDraft};
use crate::error::CatalogError;
use crate::identity::{Actor, IdentitySnapshot, Role};
use crate::store::Store;
use crate::time::{Clock, TimeStamp};
use crate::utils;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Comment {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub seq: u64,
    #[n(2)]
    pub artwork_id: String,
    #[n(3)]
    pub author: IdentitySnapshot,
    #[n(4)]
    pub content: String,
    #[n(5)]
    pub created_at: TimeStamp<Utc>,
}

/// One user's star rating of one artwork. Re-rating overwrites `value`.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Rating {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub artwork_id: String,
    #[n(2)]
    pub user_id: String,
    #[n(3)]
    pub value: u8,
    #[n(4)]
    pub created_at: TimeStamp<Utc>,
}

pub struct Catalog {
    store: Arc<Store>,
    clock: Arc<dyn Clock>,
}

impl Catalog {
    pub fn new(store: Arc<Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn require_actor(actor: Option<&Actor>) -> Result<&Actor, CatalogError> {
        actor.ok_or(CatalogError::Unauthenticated)
    }

    fn load(&self, artwork_id: &str) -> Result<Artwork, CatalogError> {
        self.store
            .artwork(artwork_id)?
            .ok_or_else(|| CatalogError::NotFound(artwork_id.to_string()))
    }

    /// Accept a new artwork into the catalog. Only artists and admins upload.
    pub fn add_artwork(
        &self,
        actor: Option<&Actor>,
        draft: ArtworkDraft,
    ) -> Result<Artwork, CatalogError> {
        let actor = Self::require_actor(actor)?;
        if actor.role == Role::Member {
            return Err(CatalogError::Forbidden);
        }

        let id = utils::mint(utils::ARTWORK_HRP)?;
        let artwork = draft.validate_and_finalise(id, actor, self.clock.now())?;

        let _guard = self.store.write_guard();
        self.store.put_artwork(&artwork)?;
        info!(artwork = %artwork.id, artist = %actor.id, "artwork added");

        Ok(artwork)
    }

    pub fn artwork(&self, artwork_id: &str) -> Result<Option<Artwork>, CatalogError> {
        Ok(self.store.artwork(artwork_id)?)
    }

    /// All artworks, oldest first.
    pub fn artworks(&self) -> Result<Vec<Artwork>, CatalogError> {
        Ok(self.store.artworks()?)
    }

    pub fn artworks_by_artist(&self, artist_id: &str) -> Result<Vec<Artwork>, CatalogError> {
        let mut artworks = self.store.artworks()?;
        artworks.retain(|a| a.artist_id == artist_id);
        Ok(artworks)
    }

    /// Replace title, description, image, categories and year.
    pub fn update_details(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        draft: ArtworkDraft,
    ) -> Result<Artwork, CatalogError> {
        let actor = Self::require_actor(actor)?;

        let _guard = self.store.write_guard();
        let mut artwork = self.load(artwork_id)?;
        if !actor.can_manage(&artwork.artist_id) {
            return Err(CatalogError::Forbidden);
        }
        draft.apply_to(&mut artwork)?;
        self.store.put_artwork(&artwork)?;
        info!(artwork = %artwork.id, "artwork details updated");

        Ok(artwork)
    }

    /// Delete an artwork and everything hanging off it: bids, comments, ratings.
    pub fn delete_artwork(&self, actor: Option<&Actor>, artwork_id: &str) -> Result<(), CatalogError> {
        let actor = Self::require_actor(actor)?;

        let _guard = self.store.write_guard();
        let artwork = self.load(artwork_id)?;
        if !actor.can_manage(&artwork.artist_id) {
            return Err(CatalogError::Forbidden);
        }

        let removed_bids = self.store.delete_artwork_cascade(artwork_id)?;
        if removed_bids > 0 && artwork.is_for_sale() {
            warn!(artwork = %artwork_id, removed_bids, "deleted an artwork with live bids");
        }
        info!(artwork = %artwork_id, by = %actor.id, "artwork deleted");

        Ok(())
    }

    pub fn add_comment(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        content: &str,
    ) -> Result<Comment, CatalogError> {
        let actor = Self::require_actor(actor)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(CatalogError::MissingField("comment"));
        }

        let _guard = self.store.write_guard();
        self.load(artwork_id)?;

        let comment = Comment {
            id: utils::mint(utils::COMMENT_HRP)?,
            seq: self.store.next_seq()?,
            artwork_id: artwork_id.to_string(),
            author: actor.snapshot(),
            content: content.to_string(),
            created_at: self.clock.now(),
        };
        self.store.append_comment(&comment)?;

        Ok(comment)
    }

    /// Comments on one artwork in the order they were written.
    pub fn comments_for_artwork(&self, artwork_id: &str) -> Result<Vec<Comment>, CatalogError> {
        Ok(self.store.comments_for(artwork_id)?)
    }

    /// Rate an artwork 1 to 5 stars. A second rating by the same user replaces the first.
    pub fn rate(
        &self,
        actor: Option<&Actor>,
        artwork_id: &str,
        stars: u8,
    ) -> Result<Rating, CatalogError> {
        let actor = Self::require_actor(actor)?;
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return Err(CatalogError::InvalidRating(stars));
        }

        let _guard = self.store.write_guard();
        self.load(artwork_id)?;

        let rating = match self.store.rating(artwork_id, &actor.id)? {
            Some(existing) => Rating {
                value: stars,
                ..existing
            },
            None => Rating {
                id: utils::mint(utils::RATING_HRP)?,
                artwork_id: artwork_id.to_string(),
                user_id: actor.id.clone(),
                value: stars,
                created_at: self.clock.now(),
            },
        };
        self.store.put_rating(&rating)?;

        Ok(rating)
    }

    /// The user's stars for an artwork, 0 when they have not rated it.
    pub fn user_rating(&self, artwork_id: &str, user_id: &str) -> Result<u8, CatalogError> {
        Ok(self
            .store
            .rating(artwork_id, user_id)?
            .map_or(0, |r| r.value))
    }

    /// Mean star rating, 0.0 for an unrated artwork.
    pub fn average_rating(&self, artwork_id: &str) -> Result<f64, CatalogError> {
        let values: Vec<u8> = self
            .store
            .ratings_for(artwork_id)?
            .into_iter()
            .map(|r| r.value)
            .collect();
        if values.is_empty() {
            return Ok(0.0);
        }
        let total: u32 = values.iter().map(|&v| u32::from(v)).sum();
        Ok(f64::from(total) / values.len() as f64)
    }

    pub fn rating_count(&self, artwork_id: &str) -> Result<usize, CatalogError> {
        Ok(self.store.ratings_for(artwork_id)?.len())
    }
}
