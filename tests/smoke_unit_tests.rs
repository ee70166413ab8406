//! Smoke Screen Unit tests for art ledger components
//!
//! These test are unit tests that span the codebase, testing behavior in
//! isolation from the marketplace scenarios. These are intended as
//! smoke-screen and generally test the happy-path.
//!
#![allow(unused_imports)]

use art_ledger::{
    artwork::{ArtworkDraft, SaleState, SaleStatus},
    bid::{self, Bid},
    catalog::Catalog,
    config::LedgerConfig,
    error::{CatalogError, ConfigError},
    identity::{Actor, Role},
    money::Amount,
    store::Store,
    time::{Clock, ManualClock, TimeStamp},
    utils::{ARTWORK_HRP, BID_HRP, USER_HRP, new_uuid_to_bech32},
};
use chrono::{TimeDelta, Utc};
use std::sync::Arc;

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Test that new_uuid_to_bech32 generates valid bech32-encoded strings
    /// with the correct human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32(ARTWORK_HRP).unwrap();
        assert!(encoded.starts_with("art_1"));
        assert!(encoded.len() > 10);
    }

    /// Test that the function handles empty strings appropriately
    #[test]
    fn handles_empty_hrp() {
        assert!(new_uuid_to_bech32("").is_err());
    }

    /// Test that different HRPs produce different encoded strings
    #[test]
    fn prefixes_tell_records_apart() {
        let bid_id = new_uuid_to_bech32(BID_HRP).unwrap();
        let user_id = new_uuid_to_bech32(USER_HRP).unwrap();

        assert!(bid_id.starts_with("bid_"));
        assert!(user_id.starts_with("user_"));
        assert_ne!(bid_id, user_id);
    }
}

// TIME MODULE TESTS
#[cfg(test)]
mod time_tests {
    use super::*;

    /// Test that TimeStamp::new() creates a timestamp close to current time
    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let diff = (Utc::now() - ts.to_datetime_utc()).num_seconds().abs();
        assert!(diff < 1);
    }

    /// Test that plus_days counts whole days and orders after the start
    #[test]
    fn plus_days_moves_forward() {
        let start = TimeStamp::new_with(2024, 2, 27, 9, 0, 0);
        let end = start.plus_days(3).unwrap();

        assert_eq!(end, TimeStamp::new_with(2024, 3, 1, 9, 0, 0)); // leap year
        assert!(end > start);
        assert_eq!(end.since(&start), TimeDelta::days(3));
    }

    /// Test that a manual clock only moves when told to
    #[test]
    fn manual_clock_is_deterministic() {
        let clock = ManualClock::new(TimeStamp::new_with(2024, 6, 1, 0, 0, 0));
        let before = clock.now();
        assert_eq!(clock.now(), before);

        clock.advance(TimeDelta::hours(36));
        assert_eq!(clock.now(), TimeStamp::new_with(2024, 6, 2, 12, 0, 0));

        clock.set(TimeStamp::new_with(2030, 1, 1, 0, 0, 0));
        assert_eq!(clock.now().to_string(), "2030-01-01T00:00:00+00:00");
    }
}

// MONEY MODULE TESTS
#[cfg(test)]
mod money_tests {
    use super::*;

    /// Test that amounts compare by minor units
    #[test]
    fn amounts_order_by_value() {
        assert!(Amount::from_major(150) > Amount::from_minor(14_999));
        assert_eq!(Amount::from_major(1), Amount::from_minor(100));
        assert!(!Amount::ZERO.is_positive());
    }

    /// Test that overflow is reported rather than wrapped
    #[test]
    fn addition_never_wraps() {
        assert_eq!(Amount::MAX.checked_add(Amount::from_minor(1)), None);
        assert_eq!(Amount::MAX.saturating_add(Amount::from_minor(1)), Amount::MAX);
    }
}

// ARTWORK MODULE TESTS
#[cfg(test)]
mod artwork_tests {
    use super::*;

    fn artist() -> Actor {
        Actor::new("user_georgia", "georgia", Role::Artist)
    }

    /// Test that a complete draft becomes an unlisted artwork
    #[test]
    fn complete_draft_is_accepted() {
        let artwork = ArtworkDraft::new()
            .set_title("  Black Iris ")
            .set_description("Oil on canvas")
            .set_image("data:image/png;base64,AAAA")
            .set_year("1926")
            .validate_and_finalise("art_iris".into(), &artist(), TimeStamp::new())
            .unwrap();

        assert_eq!(artwork.title, "Black Iris");
        assert_eq!(artwork.year.as_deref(), Some("1926"));
        assert_eq!(artwork.artist_name, "georgia");
        assert_eq!(artwork.status_at(&TimeStamp::new()), SaleStatus::Unlisted);
    }

    /// Test that each required field is enforced
    #[test]
    fn missing_fields_are_named() {
        let no_image = ArtworkDraft::new()
            .set_title("Jimson Weed")
            .set_description("Oil on linen");
        let no_title = ArtworkDraft::new()
            .set_description("Oil on linen")
            .set_image("https://example.org/jimson.png");

        assert!(matches!(
            no_image.validate_and_finalise("art_1".into(), &artist(), TimeStamp::new()),
            Err(CatalogError::MissingField("image"))
        ));
        assert!(matches!(
            no_title.validate_and_finalise("art_2".into(), &artist(), TimeStamp::new()),
            Err(CatalogError::MissingField("title"))
        ));
    }
}

// BID MODULE TESTS
#[cfg(test)]
mod bid_tests {
    use super::*;

    fn bid(seq: u64, amount: u64, minute: u32) -> Bid {
        let bidder = Actor::new(format!("user_{seq}"), format!("bidder{seq}"), Role::Member);
        Bid::new(
            format!("bid_{seq}"),
            seq,
            "art_1".into(),
            "lst_1".into(),
            bidder.snapshot(),
            Amount::from_minor(amount),
            TimeStamp::new_with(2024, 6, 1, 12, minute, 0),
        )
    }

    /// Test that ranking puts the highest amount first and the earliest on ties
    #[test]
    fn ranking_prefers_amount_then_time() {
        let mut bids = vec![bid(1, 500, 0), bid(2, 900, 5), bid(3, 900, 1), bid(4, 100, 9)];
        bid::rank(&mut bids);

        let order: Vec<u64> = bids.iter().map(|b| b.seq).collect();
        assert_eq!(order, vec![3, 2, 1, 4]);
        assert_eq!(bids[0].bidder_id(), "user_3");
    }
}

// CATALOG MODULE TESTS
#[cfg(test)]
mod catalog_tests {
    use super::*;
    use tempfile::tempdir;

    fn catalog(dir: &tempfile::TempDir) -> (Catalog, ManualClock) {
        let db = sled::open(dir.path().join("catalog.db")).unwrap();
        let clock = ManualClock::default();
        let catalog = Catalog::new(Arc::new(Store::new(Arc::new(db))), Arc::new(clock.clone()));
        (catalog, clock)
    }

    fn draft() -> ArtworkDraft {
        ArtworkDraft::new()
            .set_title("Water Lilies")
            .set_description("One of roughly 250 oil paintings")
            .set_image("https://example.org/lilies.png")
            .add_category("impressionism")
    }

    /// Test that members can browse but not upload
    #[test]
    fn only_artists_and_admins_upload() {
        let dir = tempdir().unwrap();
        let (catalog, _) = catalog(&dir);
        let member = Actor::new("user_m", "member", Role::Member);
        let admin = Actor::new("user_a", "admin", Role::Admin);

        assert!(matches!(
            catalog.add_artwork(Some(&member), draft()),
            Err(CatalogError::Forbidden)
        ));
        assert!(matches!(
            catalog.add_artwork(None, draft()),
            Err(CatalogError::Unauthenticated)
        ));
        let artwork = catalog.add_artwork(Some(&admin), draft()).unwrap();
        assert_eq!(catalog.artworks_by_artist("user_a").unwrap(), vec![artwork]);
    }

    /// Test that artworks list oldest first
    #[test]
    fn artworks_list_in_upload_order() {
        let dir = tempdir().unwrap();
        let (catalog, clock) = catalog(&dir);
        let artist = Actor::new("user_claude", "claude", Role::Artist);

        let first = catalog.add_artwork(Some(&artist), draft()).unwrap();
        clock.advance(TimeDelta::minutes(1));
        let second = catalog
            .add_artwork(Some(&artist), draft().set_title("Haystacks"))
            .unwrap();

        let ids: Vec<String> = catalog.artworks().unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    /// Test that editing details leaves the sale state alone
    #[test]
    fn update_details_keeps_owner_and_sale() {
        let dir = tempdir().unwrap();
        let (catalog, _) = catalog(&dir);
        let artist = Actor::new("user_claude", "claude", Role::Artist);
        let artwork = catalog.add_artwork(Some(&artist), draft()).unwrap();

        let updated = catalog
            .update_details(
                Some(&artist),
                &artwork.id,
                draft().set_title("Nymphéas").add_category("series"),
            )
            .unwrap();

        assert_eq!(updated.title, "Nymphéas");
        assert_eq!(updated.categories, vec!["impressionism", "series"]);
        assert_eq!(updated.artist_id, artwork.artist_id);
        assert_eq!(updated.sale, SaleState::Unlisted);
    }

    /// Test that comments are trimmed, ordered, and never empty
    #[test]
    fn comments_are_kept_in_order() {
        let dir = tempdir().unwrap();
        let (catalog, _) = catalog(&dir);
        let artist = Actor::new("user_claude", "claude", Role::Artist);
        let fan = Actor::new("user_fan", "fan", Role::Member);
        let artwork = catalog.add_artwork(Some(&artist), draft()).unwrap();

        catalog.add_comment(Some(&fan), &artwork.id, "  Beautiful ").unwrap();
        catalog.add_comment(Some(&artist), &artwork.id, "Thank you").unwrap();
        assert!(matches!(
            catalog.add_comment(Some(&fan), &artwork.id, "   "),
            Err(CatalogError::MissingField("comment"))
        ));
        assert!(matches!(
            catalog.add_comment(Some(&fan), "art_missing", "hello"),
            Err(CatalogError::NotFound(_))
        ));

        let comments = catalog.comments_for_artwork(&artwork.id).unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["Beautiful", "Thank you"]);
        assert_eq!(comments[0].author.username, "fan");
    }

    /// Test that a second rating replaces the first
    #[test]
    fn ratings_are_one_per_user() {
        let dir = tempdir().unwrap();
        let (catalog, _) = catalog(&dir);
        let artist = Actor::new("user_claude", "claude", Role::Artist);
        let a = Actor::new("user_a", "a", Role::Member);
        let b = Actor::new("user_b", "b", Role::Member);
        let artwork = catalog.add_artwork(Some(&artist), draft()).unwrap();

        assert_eq!(catalog.average_rating(&artwork.id).unwrap(), 0.0);

        let first = catalog.rate(Some(&a), &artwork.id, 2).unwrap();
        let again = catalog.rate(Some(&a), &artwork.id, 4).unwrap();
        catalog.rate(Some(&b), &artwork.id, 5).unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(catalog.user_rating(&artwork.id, "user_a").unwrap(), 4);
        assert_eq!(catalog.user_rating(&artwork.id, "user_nobody").unwrap(), 0);
        assert_eq!(catalog.rating_count(&artwork.id).unwrap(), 2);
        assert_eq!(catalog.average_rating(&artwork.id).unwrap(), 4.5);

        assert!(matches!(
            catalog.rate(Some(&a), &artwork.id, 6),
            Err(CatalogError::InvalidRating(6))
        ));
        assert!(matches!(
            catalog.rate(Some(&a), &artwork.id, 0),
            Err(CatalogError::InvalidRating(0))
        ));
    }
}

// CONFIG MODULE TESTS
#[cfg(test)]
mod config_tests {
    use super::*;

    /// Test that defaults validate and offer a week-long listing
    #[test]
    fn defaults_are_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.offers_duration(config.default_bid_duration_days));
        assert_eq!(config.min_increment, Amount::from_minor(1));
    }

    /// Test that a default duration outside the offered list is rejected
    #[test]
    fn default_must_be_offered() {
        let config = LedgerConfig {
            bid_durations_days: vec![1, 3],
            ..LedgerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DefaultNotOffered(7)));
    }
}
