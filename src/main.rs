use std::env;
use std::sync::Arc;
use std::time::Duration;

use pokemarket_rs::catalog::Catalog;
use pokemarket_rs::clock::{Clock, SystemClock};
use pokemarket_rs::config::Config;
use pokemarket_rs::events::Event;
use pokemarket_rs::input;
use pokemarket_rs::shell::{Pending, Shell, HELP};
use pokemarket_rs::storage::FileStorage;
use pokemarket_rs::wallet::{PurchaseOutcome, SessionStore};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Store = SessionStore<FileStorage, SystemClock>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = env::var("POKEMARKET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = Config::load_or_default(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!(path = %config_path, ?cfg, "loaded config");

    let clock = Arc::new(SystemClock);
    let seed = cfg.catalog.seed.unwrap_or_else(rand::random);
    let catalog = Catalog::generate(seed, clock.now_ms());
    info!(seed, assets = catalog.len(), "catalog generated");

    let storage = Arc::new(FileStorage::new(&cfg.wallet.storage_dir));
    let store: Store = SessionStore::new(storage, Arc::clone(&clock), cfg.wallet.settings());
    let mut shell = Shell::new(store.load().await);

    // Create the event channel
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    input::spawn(tx.clone());
    spawn_ticker(tx.clone());
    spawn_ctrl_c(tx.clone());

    println!("PokeMarket {}\n{}\n", shell.render_wallet(), HELP);
    println!("{}", shell.render_grid(&catalog));

    while let Some(event) = rx.recv().await {
        match event {
            Event::Connect => match shell.request_connect() {
                Ok(pending) => {
                    println!("{}", shell.render_wallet());
                    spawn_request(store.clone(), pending, tx.clone());
                }
                Err(refusal) => println!("{}", refusal),
            },
            Event::Disconnect => match shell.request_disconnect() {
                Ok(pending) => spawn_request(store.clone(), pending, tx.clone()),
                Err(refusal) => println!("{}", refusal),
            },
            Event::Buy { asset_id } => match shell.request_buy(&catalog, &asset_id) {
                Ok(Pending::Connect) => {
                    println!("Connect your wallet first. {}", shell.render_wallet());
                    spawn_request(store.clone(), Pending::Connect, tx.clone());
                }
                Ok(pending) => {
                    println!("Processing Transaction...");
                    spawn_request(store.clone(), pending, tx.clone());
                }
                Err(refusal) => println!("{}", refusal),
            },
            Event::Search { term } => {
                shell.query.term = term;
                println!("{}", shell.render_grid(&catalog));
            }
            Event::FilterType(creature_type) => {
                shell.query.creature_type = creature_type;
                println!("{}", shell.render_grid(&catalog));
            }
            Event::FilterRarity(rarity) => {
                shell.query.rarity = rarity;
                println!("{}", shell.render_grid(&catalog));
            }
            Event::Sort(sort) => {
                shell.query.sort = sort;
                println!("{}", shell.render_grid(&catalog));
            }
            Event::ResetFilters => {
                shell.query.reset_filters();
                println!("{}", shell.render_grid(&catalog));
            }
            Event::List => {
                shell.close();
                println!("{}", shell.render_grid(&catalog));
            }
            Event::Show { asset_id } => {
                if catalog.get(&asset_id).is_some() {
                    shell.open(&asset_id);
                }
                println!("{}", shell.render_detail(&catalog, &asset_id, clock.now_ms()));
            }
            Event::Profile => println!("{}", shell.render_profile(&catalog)),
            Event::Trading => println!("{}", shell.render_trading(&catalog, clock.now_ms())),
            Event::Help => println!("{}", HELP),
            Event::Connected(session) => {
                shell.on_connected(session);
                println!("Wallet connected {}", shell.render_wallet());
            }
            Event::Disconnected(locked) => {
                shell.on_disconnected(locked);
                println!("Wallet disconnected {}", shell.render_wallet());
            }
            Event::PurchaseSettled {
                asset_id,
                outcome,
                session,
            } => {
                let success = outcome.success;
                shell.on_purchase_settled(asset_id.clone(), outcome, session);
                if shell.open_asset() == Some(asset_id.as_str()) {
                    println!("{}", shell.render_detail(&catalog, &asset_id, clock.now_ms()));
                }
                if success {
                    println!("{}", shell.render_wallet());
                }
            }
            Event::WalletFailed { reason } => {
                shell.on_wallet_failed();
                warn!(%reason, "wallet request failed");
                println!("Wallet request failed: {}", reason);
            }
            Event::Tick => {
                if let Some(notice) = shell.on_tick(&catalog, clock.now_ms()) {
                    println!("{}", notice);
                }
            }
            Event::Shutdown => {
                println!("Shutting down...");
                break;
            }
        }
    }

    Ok(())
}

/// Run one wallet request on its own task so the loop keeps serving
/// catalog commands during the simulated latency.
fn spawn_request(store: Store, pending: Pending, tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let event = match pending {
            Pending::Connect => match store.connect().await {
                Ok(session) => Event::Connected(session),
                Err(e) => Event::WalletFailed {
                    reason: e.to_string(),
                },
            },
            Pending::Disconnect => match store.disconnect().await {
                Ok(locked) => Event::Disconnected(locked),
                Err(e) => Event::WalletFailed {
                    reason: e.to_string(),
                },
            },
            Pending::Purchase { asset_id, price } => {
                let outcome = PurchaseOutcome::from(store.purchase(&asset_id, price).await);
                let session = store.load().await;
                Event::PurchaseSettled {
                    asset_id,
                    outcome,
                    session,
                }
            }
        };
        let _ = tx.send(event).await;
    });
}

/// Timer tick (every second) for auction countdowns
fn spawn_ticker(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            if tx.send(Event::Tick).await.is_err() {
                break;
            }
        }
    });
}

fn spawn_ctrl_c(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Shutdown).await;
        }
    });
}
