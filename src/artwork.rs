//! Artwork records and their sale dimension
use crate::error::CatalogError;
use crate::identity::Actor;
use crate::money::Amount;
use crate::time::TimeStamp;
use chrono::Utc;

/// Sale dimension of an artwork. A listing always carries a starting price.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub enum SaleState {
    #[n(0)]
    Unlisted,
    #[n(1)]
    Listed {
        #[n(0)]
        listing_id: String, // changes every time the artwork goes from unlisted to listed
        #[n(1)]
        starting_price: Amount,
        #[n(2)]
        bid_end_time: Option<TimeStamp<Utc>>, // None: no deadline
    },
}

/// Sale status derived at query time; the stored record never self-transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatus {
    Unlisted,
    Open,
    Closed,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub title: String,
    #[n(2)]
    pub description: String,
    #[n(3)]
    pub image_url: String, // url or inline data uri
    #[n(4)]
    pub artist_id: String,
    #[n(5)]
    pub artist_name: String,
    #[n(6)]
    pub created_at: TimeStamp<Utc>,
    #[n(7)]
    pub categories: Vec<String>,
    #[n(8)]
    pub year: Option<String>,
    #[n(9)]
    pub sale: SaleState,
}

impl Artwork {
    pub fn is_for_sale(&self) -> bool {
        matches!(self.sale, SaleState::Listed { .. })
    }
    pub fn listing_id(&self) -> Option<&str> {
        match &self.sale {
            SaleState::Listed { listing_id, .. } => Some(listing_id),
            SaleState::Unlisted => None,
        }
    }
    pub fn starting_price(&self) -> Option<Amount> {
        match &self.sale {
            SaleState::Listed { starting_price, .. } => Some(*starting_price),
            SaleState::Unlisted => None,
        }
    }
    pub fn bid_end_time(&self) -> Option<&TimeStamp<Utc>> {
        match &self.sale {
            SaleState::Listed { bid_end_time, .. } => bid_end_time.as_ref(),
            SaleState::Unlisted => None,
        }
    }
    /// A deadline exactly equal to `now` is still open.
    pub fn status_at(&self, now: &TimeStamp<Utc>) -> SaleStatus {
        match &self.sale {
            SaleState::Unlisted => SaleStatus::Unlisted,
            SaleState::Listed {
                bid_end_time: Some(end),
                ..
            } if end < now => SaleStatus::Closed,
            SaleState::Listed { .. } => SaleStatus::Open,
        }
    }
}

/// Content of an artwork before it is accepted into the catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArtworkDraft {
    title: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    categories: Vec<String>,
    year: Option<String>,
}

impl ArtworkDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_title(mut self, title: &str) -> Self {
        self.title = Some(title.trim().to_string());
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.trim().to_string());
        self
    }
    pub fn set_image(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.trim().to_string());
        self
    }
    /// Adds a category, ignoring blanks and repeats.
    pub fn add_category(mut self, category: &str) -> Self {
        let category = category.trim();
        if !category.is_empty() && !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
        self
    }
    pub fn set_year(mut self, year: &str) -> Self {
        self.year = Some(year.trim().to_string()).filter(|y| !y.is_empty());
        self
    }

    fn required(field: &Option<String>, name: &'static str) -> Result<String, CatalogError> {
        field
            .clone()
            .filter(|value| !value.is_empty())
            .ok_or(CatalogError::MissingField(name))
    }

    /// Checks required fields and produces an unlisted artwork owned by `artist`.
    pub fn validate_and_finalise(
        &self,
        id: String,
        artist: &Actor,
        created_at: TimeStamp<Utc>,
    ) -> Result<Artwork, CatalogError> {
        let title = Self::required(&self.title, "title")?;
        let description = Self::required(&self.description, "description")?;
        let image_url = Self::required(&self.image_url, "image")?;

        Ok(Artwork {
            id,
            title,
            description,
            image_url,
            artist_id: artist.id.clone(),
            artist_name: artist.username.clone(),
            created_at,
            categories: self.categories.clone(),
            year: self.year.clone(),
            sale: SaleState::Unlisted,
        })
    }

    /// Overwrites the content fields of `artwork`, leaving ownership and sale state alone.
    pub fn apply_to(&self, artwork: &mut Artwork) -> Result<(), CatalogError> {
        artwork.title = Self::required(&self.title, "title")?;
        artwork.description = Self::required(&self.description, "description")?;
        artwork.image_url = Self::required(&self.image_url, "image")?;
        artwork.categories = self.categories.clone();
        artwork.year = self.year.clone();
        Ok(())
    }
}
