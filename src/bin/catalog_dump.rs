use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::env;

use pokemarket_rs::catalog::{Catalog, Query, SortMode};
use pokemarket_rs::clock::{Clock, SystemClock};

/// Usage: catalog_dump [seed] [--json]
#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let seed = match args.iter().find(|a| !a.starts_with("--")) {
        Some(s) => s.parse::<u64>().map_err(|e| anyhow!("bad seed {}: {}", s, e))?,
        None => 42,
    };

    let catalog = Catalog::generate(seed, SystemClock.now_ms());

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.assets())?);
        return Ok(());
    }

    let by_price = catalog.query(&Query {
        sort: SortMode::PriceAsc,
        ..Default::default()
    });
    for asset in &by_price {
        let kind = if asset.is_auction() { "auction" } else { "fixed" };
        println!("{:<15} {:<12} {:>8} {}", asset.id, asset.name, asset.price, kind);
    }

    // Stats
    let prices: Vec<Decimal> = by_price.iter().map(|a| a.price).collect();
    let (Some(min), Some(max)) = (prices.first(), prices.last()) else {
        return Err(anyhow!("empty catalog"));
    };
    let sum: Decimal = prices.iter().copied().sum();
    let avg = sum / Decimal::from(prices.len());
    let median = prices[prices.len() / 2];
    let auctions = by_price.iter().filter(|a| a.is_auction()).count();

    println!("\n=== CATALOG seed={} ({} assets, {} auctions) ===", seed, prices.len(), auctions);
    println!("Min:    {} SOL", min);
    println!("Max:    {} SOL", max);
    println!("Avg:    {} SOL", avg.round_dp(2));
    println!("Median: {} SOL", median);

    Ok(())
}
