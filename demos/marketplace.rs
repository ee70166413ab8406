//! Walk through one listing: upload, list, a few bids, then close it.
//!
//! Run with `RUST_LOG=art_ledger=debug` to see rejected bids as well.

use anyhow::Context;
use art_ledger::{
    artwork::ArtworkDraft,
    config::LedgerConfig,
    identity::{Actor, Role},
    marketplace::Marketplace,
    money::Amount,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("art_ledger=info")),
        )
        .init();

    let config = LedgerConfig {
        temporary: true,
        ..LedgerConfig::from_env()?
    };
    let market = Marketplace::open(config)?;

    let artist = Actor::register("hokusai", Role::Artist)?;
    let collector_x = Actor::register("collector_x", Role::Member)?;
    let collector_y = Actor::register("collector_y", Role::Member)?;

    let artwork = market
        .catalog()
        .add_artwork(
            Some(&artist),
            ArtworkDraft::new()
                .set_title("The Great Wave off Kanagawa")
                .set_description("Woodblock print")
                .set_image("https://example.org/wave.png")
                .add_category("ukiyo-e")
                .set_year("1831"),
        )
        .context("Failed to add artwork: ")?;

    let ledger = market.ledger();
    ledger.list_with_default_duration(Some(&artist), &artwork.id, Amount::from_major(100))?;
    println!(
        "listed '{}', minimum bid {}",
        artwork.title,
        ledger.minimum_next_bid(&artwork.id)?
    );

    for (bidder, major) in [(&collector_x, 150), (&collector_y, 120), (&collector_y, 200)] {
        match ledger.place_bid(Some(bidder), &artwork.id, Amount::from_major(major)) {
            Ok(bid) => println!("{} bid {}", bid.bidder.username, bid.amount),
            Err(err) => println!("{} rejected: {err}", bidder.username),
        }
    }

    println!("bid history:");
    for bid in ledger.bids_for_artwork(&artwork.id)? {
        println!("  {} {} at {}", bid.bidder.username, bid.amount, bid.created_at);
    }
    if let Some(remaining) = ledger.time_remaining(&artwork.id)? {
        println!("bidding closes in {} hours", remaining.num_hours());
    }

    let artwork = ledger.list_for_sale(Some(&artist), &artwork.id, false, None, None)?;
    println!(
        "unlisted, for sale: {}, current bid: {:?}",
        artwork.is_for_sale(),
        ledger.current_bid(&artwork.id)?
    );

    Ok(())
}
