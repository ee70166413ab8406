//! Persistent aggregate behind the ledger and the catalog.
//!
//! Everything lives in one sled database, split into keyspaces by prefix:
//!
//! - `artwork/<id>`                       -> [`Artwork`]
//! - `bid/<artwork_id>/<seq>`             -> [`Bid`]
//! - `comment/<artwork_id>/<seq>`         -> [`Comment`]
//! - `rating/<artwork_id>/<user_id>`      -> [`Rating`]
//!
//! Values are CBOR. Sequence numbers come from sled's monotonic id generator
//! and are stored big-endian so a prefix scan over one artwork yields
//! insertion order. Each mutation is one atomic write (a single insert, or a
//! [`Batch`] when it touches several keys), so it either lands completely or
//! not at all.
use crate::artwork::Artwork;
use crate::bid::Bid;
use crate::catalog::{Comment, Rating};
use crate::error::StoreError;
use sled::Batch;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const ARTWORK_PREFIX: &[u8] = b"artwork/";
const BID_PREFIX: &[u8] = b"bid/";
const COMMENT_PREFIX: &[u8] = b"comment/";
const RATING_PREFIX: &[u8] = b"rating/";

// Shared by every `Store` in the process, whichever `sled::Db` handle it wraps.
static WRITER: Mutex<()> = Mutex::new(());

/// `<keyspace><artwork_id>/`: everything one artwork owns in a keyspace.
pub(crate) fn artwork_scope(keyspace: &[u8], artwork_id: &str) -> Vec<u8> {
    [keyspace, artwork_id.as_bytes(), b"/"].concat()
}

pub(crate) fn artwork_key(id: &str) -> Vec<u8> {
    [ARTWORK_PREFIX, id.as_bytes()].concat()
}

pub(crate) fn bid_key(artwork_id: &str, seq: u64) -> Vec<u8> {
    [artwork_scope(BID_PREFIX, artwork_id).as_slice(), &seq.to_be_bytes()].concat()
}

pub(crate) fn comment_key(artwork_id: &str, seq: u64) -> Vec<u8> {
    [artwork_scope(COMMENT_PREFIX, artwork_id).as_slice(), &seq.to_be_bytes()].concat()
}

pub(crate) fn rating_key(artwork_id: &str, user_id: &str) -> Vec<u8> {
    [artwork_scope(RATING_PREFIX, artwork_id).as_slice(), user_id.as_bytes()].concat()
}

pub(crate) fn encode<T: minicbor::Encode<()>>(value: &T) -> Result<Vec<u8>, StoreError> {
    minicbor::to_vec(value).map_err(|e| StoreError::Encode(e.to_string()))
}

pub(crate) fn decode<T>(bytes: &[u8]) -> Result<T, StoreError>
where
    T: for<'b> minicbor::Decode<'b, ()>,
{
    Ok(minicbor::decode(bytes)?)
}

/// Every record in the store, as it would be exported in one piece.
#[derive(Debug, Default, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct Snapshot {
    #[n(0)]
    pub artworks: Vec<Artwork>,
    #[n(1)]
    pub bids: Vec<Bid>,
    #[n(2)]
    pub comments: Vec<Comment>,
    #[n(3)]
    pub ratings: Vec<Rating>,
}

pub struct Store {
    instance: Arc<sled::Db>,
}

impl Store {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Held for the whole read-validate-write span of a mutating operation.
    /// The lock is process-wide, so two stores opened over the same database
    /// still take turns. A panic while holding it cannot leave a half-applied
    /// batch behind, so poisoning is ignored.
    pub fn write_guard(&self) -> MutexGuard<'static, ()> {
        WRITER.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn next_seq(&self) -> Result<u64, StoreError> {
        Ok(self.instance.generate_id()?)
    }

    pub fn apply(&self, batch: Batch) -> Result<(), StoreError> {
        self.instance.apply_batch(batch)?;
        Ok(())
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.instance.flush()?;
        Ok(())
    }

    fn scan<T>(&self, prefix: &[u8]) -> Result<Vec<T>, StoreError>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        self.instance
            .scan_prefix(prefix)
            .map(|entry| {
                let (_key, value) = entry?;
                decode(&value)
            })
            .collect()
    }

    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<sled::IVec>, StoreError> {
        self.instance
            .scan_prefix(prefix)
            .keys()
            .map(|key| key.map_err(StoreError::from))
            .collect()
    }

    pub fn artwork(&self, id: &str) -> Result<Option<Artwork>, StoreError> {
        self.instance
            .get(artwork_key(id))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn artworks(&self) -> Result<Vec<Artwork>, StoreError> {
        let mut artworks: Vec<Artwork> = self.scan(ARTWORK_PREFIX)?;
        artworks.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(artworks)
    }

    pub fn put_artwork(&self, artwork: &Artwork) -> Result<(), StoreError> {
        self.instance
            .insert(artwork_key(&artwork.id), encode(artwork)?)?;
        Ok(())
    }

    /// The whole bid log in insertion order.
    pub fn bids(&self) -> Result<Vec<Bid>, StoreError> {
        let mut bids: Vec<Bid> = self.scan(BID_PREFIX)?;
        bids.sort_by_key(|b| b.seq);
        Ok(bids)
    }

    /// Bids on one artwork in insertion order.
    pub fn bids_for(&self, artwork_id: &str) -> Result<Vec<Bid>, StoreError> {
        self.scan(&artwork_scope(BID_PREFIX, artwork_id))
    }

    pub fn append_bid(&self, bid: &Bid) -> Result<(), StoreError> {
        self.instance
            .insert(bid_key(&bid.artwork_id, bid.seq), encode(bid)?)?;
        Ok(())
    }

    pub fn comments(&self) -> Result<Vec<Comment>, StoreError> {
        let mut comments: Vec<Comment> = self.scan(COMMENT_PREFIX)?;
        comments.sort_by_key(|c| c.seq);
        Ok(comments)
    }

    pub fn comments_for(&self, artwork_id: &str) -> Result<Vec<Comment>, StoreError> {
        self.scan(&artwork_scope(COMMENT_PREFIX, artwork_id))
    }

    pub fn append_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        self.instance.insert(
            comment_key(&comment.artwork_id, comment.seq),
            encode(comment)?,
        )?;
        Ok(())
    }

    pub fn ratings(&self) -> Result<Vec<Rating>, StoreError> {
        self.scan(RATING_PREFIX)
    }

    pub fn ratings_for(&self, artwork_id: &str) -> Result<Vec<Rating>, StoreError> {
        self.scan(&artwork_scope(RATING_PREFIX, artwork_id))
    }

    pub fn rating(&self, artwork_id: &str, user_id: &str) -> Result<Option<Rating>, StoreError> {
        self.instance
            .get(rating_key(artwork_id, user_id))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn put_rating(&self, rating: &Rating) -> Result<(), StoreError> {
        self.instance.insert(
            rating_key(&rating.artwork_id, &rating.user_id),
            encode(rating)?,
        )?;
        Ok(())
    }

    /// Removes an artwork together with every bid, comment and rating that
    /// references it. Returns how many bids went with it.
    pub fn delete_artwork_cascade(&self, artwork_id: &str) -> Result<usize, StoreError> {
        let bids = self.scan_keys(&artwork_scope(BID_PREFIX, artwork_id))?;
        let comments = self.scan_keys(&artwork_scope(COMMENT_PREFIX, artwork_id))?;
        let ratings = self.scan_keys(&artwork_scope(RATING_PREFIX, artwork_id))?;

        let mut batch = Batch::default();
        batch.remove(artwork_key(artwork_id));
        for key in bids.iter().chain(&comments).chain(&ratings) {
            batch.remove(key.clone());
        }
        self.apply(batch)?;

        Ok(bids.len())
    }

    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot {
            artworks: self.artworks()?,
            bids: self.bids()?,
            comments: self.comments()?,
            ratings: self.ratings()?,
        })
    }
}
