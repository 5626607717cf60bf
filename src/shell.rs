//! In-memory UI state and text rendering for the terminal shell.
//!
//! The shell owns the current session copy, the filter bar, the open
//! detail view and the one wallet request allowed in flight.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{Catalog, Query};
use crate::state::{Asset, LockedSession, Session, SessionView, Transaction, TxKind};
use crate::wallet::PurchaseOutcome;

/// The wallet request currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Connect,
    Disconnect,
    Purchase { asset_id: String, price: Decimal },
}

/// Why a wallet command was not started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Processing Transaction... please wait")]
    Busy,
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("You own this asset")]
    AlreadyOwned,
    #[error("Wallet already connected")]
    AlreadyConnected,
    #[error("Wallet not connected")]
    NotConnected,
}

/// Result of the last purchase on the open detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseStatus {
    pub asset_id: String,
    pub outcome: PurchaseOutcome,
}

/// Sales shown on the trading view.
const RECENT_TRADES: usize = 5;

#[derive(Debug, Default)]
pub struct Shell {
    session: Session,
    pub query: Query,
    pending: Option<Pending>,
    open_asset: Option<String>,
    last_purchase: Option<PurchaseStatus>,
    /// Auction whose end was already announced
    announced_end: Option<String>,
}

impl Shell {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            ..Default::default()
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn open_asset(&self) -> Option<&str> {
        self.open_asset.as_deref()
    }

    pub fn open(&mut self, asset_id: &str) {
        self.open_asset = Some(asset_id.to_string());
        if self
            .last_purchase
            .as_ref()
            .is_some_and(|s| s.asset_id != asset_id)
        {
            self.last_purchase = None;
        }
    }

    pub fn close(&mut self) {
        self.open_asset = None;
    }

    pub fn request_connect(&mut self) -> Result<Pending, Refusal> {
        if self.is_busy() {
            return Err(Refusal::Busy);
        }
        if self.session.is_connected {
            return Err(Refusal::AlreadyConnected);
        }
        self.begin(Pending::Connect)
    }

    pub fn request_disconnect(&mut self) -> Result<Pending, Refusal> {
        if self.is_busy() {
            return Err(Refusal::Busy);
        }
        if !self.session.is_connected {
            return Err(Refusal::NotConnected);
        }
        self.begin(Pending::Disconnect)
    }

    /// Buy button. A disconnected wallet is asked to connect instead.
    pub fn request_buy(&mut self, catalog: &Catalog, asset_id: &str) -> Result<Pending, Refusal> {
        if self.is_busy() {
            return Err(Refusal::Busy);
        }
        let asset = catalog
            .get(asset_id)
            .ok_or_else(|| Refusal::NotFound(asset_id.to_string()))?;

        if !self.session.is_connected {
            return self.begin(Pending::Connect);
        }
        if self.session.owns(asset_id) {
            return Err(Refusal::AlreadyOwned);
        }

        self.open(asset_id);
        self.last_purchase = None;
        self.begin(Pending::Purchase {
            asset_id: asset.id.clone(),
            price: asset.price,
        })
    }

    fn begin(&mut self, pending: Pending) -> Result<Pending, Refusal> {
        if self.is_busy() {
            return Err(Refusal::Busy);
        }
        self.pending = Some(pending.clone());
        Ok(pending)
    }

    pub fn on_connected(&mut self, session: Session) {
        self.pending = None;
        self.session = session;
    }

    pub fn on_disconnected(&mut self, locked: LockedSession) {
        self.pending = None;
        self.session = locked.into_record();
    }

    pub fn on_purchase_settled(&mut self, asset_id: String, outcome: PurchaseOutcome, session: Session) {
        self.pending = None;
        self.session = session;
        self.last_purchase = Some(PurchaseStatus { asset_id, outcome });
    }

    pub fn on_wallet_failed(&mut self) {
        self.pending = None;
    }

    /// Once per second. Returns the notice for an open auction that has
    /// just ended, at most once per asset.
    pub fn on_tick(&mut self, catalog: &Catalog, now_ms: i64) -> Option<String> {
        let asset = catalog.get(self.open_asset.as_deref()?)?;
        if !asset.countdown(now_ms).is_some_and(|c| c.is_ended()) {
            return None;
        }
        if self.announced_end.as_deref() == Some(asset.id.as_str()) {
            return None;
        }
        self.announced_end = Some(asset.id.clone());
        Some(format!("Auction for {} has ended", asset.name))
    }

    /// Navbar wallet strip.
    pub fn render_wallet(&self) -> String {
        match self.session.view() {
            SessionView::Connected {
                address, balance, ..
            } => format!(
                "[{}] {:.2} SOL",
                address.unwrap_or("unknown"),
                balance
            ),
            SessionView::Locked { .. } if self.pending == Some(Pending::Connect) => {
                "[Connecting...]".to_string()
            }
            SessionView::Locked { .. } => "[Connect Wallet]".to_string(),
        }
    }

    /// Marketplace grid for the current query.
    pub fn render_grid(&self, catalog: &Catalog) -> String {
        let results = catalog.query(&self.query);
        if results.is_empty() {
            return "No Pokémon found. Try `reset` to clear all filters.".to_string();
        }

        let mut lines = vec![format!(
            "Marketplace Results ({}) sort={}",
            results.len(),
            self.query.sort
        )];
        lines.extend(results.iter().map(|a| render_card(a)));
        lines.join("\n")
    }

    /// Asset detail with buy/bid control state, countdown and history.
    pub fn render_detail(&self, catalog: &Catalog, asset_id: &str, now_ms: i64) -> String {
        let Some(asset) = catalog.get(asset_id) else {
            return format!("Asset not found: {}", asset_id);
        };

        let mut lines = vec![
            format!("{} #{} ({})", asset.name, asset.id, asset.rarity),
            asset.description.clone(),
            format!(
                "Type: {} | Level: {} | Owner: {}",
                asset.creature_type, asset.level, asset.owner
            ),
            asset
                .stats
                .iter()
                .map(|s| format!("{} {}/{}", s.name, s.value, s.full_mark))
                .collect::<Vec<_>>()
                .join("  "),
        ];

        if let Some(countdown) = asset.countdown(now_ms) {
            lines.push(format!("Auction ends in: {}", countdown));
        }
        let label = if asset.is_auction() { "Current Bid" } else { "Price" };
        lines.push(format!("{}: {} SOL", label, asset.price));

        let settled = self
            .last_purchase
            .as_ref()
            .filter(|s| s.asset_id == asset.id);

        match settled {
            Some(status) if status.outcome.success => {
                lines.push(format!("{} You now own {}.", status.outcome.message, asset.name));
            }
            _ => {
                lines.push(self.action_label(asset));
                if let Some(status) = settled {
                    lines.push(format!("Error: {}", status.outcome.message));
                }
            }
        }

        lines.push("History:".to_string());
        for tx in &asset.history {
            lines.push(format!(
                "  {:<5} {:>6} SOL  {} -> {}  {}",
                tx.kind.to_string(),
                tx.price,
                tx.from,
                tx.to,
                tx.date
            ));
        }

        lines.join("\n")
    }

    fn action_label(&self, asset: &Asset) -> String {
        let in_flight = matches!(
            &self.pending,
            Some(Pending::Purchase { asset_id, .. }) if *asset_id == asset.id
        );
        let owned = matches!(
            self.session.view(),
            SessionView::Connected { inventory_ids, .. } if inventory_ids.contains(&asset.id)
        );

        if owned {
            "[You own this asset]".to_string()
        } else if in_flight {
            "[Processing Transaction...]".to_string()
        } else if asset.is_auction() {
            format!("[Place Bid] (buy {})", asset.id)
        } else {
            format!("[Buy Now] (buy {})", asset.id)
        }
    }

    /// Profile: address, balance and owned assets. Locked when disconnected.
    pub fn render_profile(&self, catalog: &Catalog) -> String {
        let (address, balance) = match self.session.view() {
            SessionView::Connected {
                address, balance, ..
            } => (address.unwrap_or("unknown"), balance),
            SessionView::Locked { .. } => {
                return "Wallet Disconnected. Connect your wallet to view your profile.".to_string()
            }
        };

        let owned = catalog.owned_by(&self.session);
        let mut lines = vec![
            format!("Trainer {}", address),
            format!("Balance: {:.2} SOL | Items: {}", balance, owned.len()),
        ];
        if owned.is_empty() {
            lines.push("No assets yet. Browse the marketplace with `list`.".to_string());
        } else {
            lines.extend(owned.iter().map(|a| render_card(a)));
        }
        lines.join("\n")
    }

    /// Trading center: sale volume across all asset histories, the latest
    /// sales and the number of auctions still running.
    pub fn render_trading(&self, catalog: &Catalog, now_ms: i64) -> String {
        let mut sales: Vec<(&Asset, &Transaction)> = catalog
            .assets()
            .iter()
            .flat_map(|a| a.history.iter().map(move |tx| (a, tx)))
            .filter(|(_, tx)| tx.kind == TxKind::Sale)
            .collect();
        // Newest first, catalog order on equal dates
        sales.sort_by(|a, b| b.1.date.cmp(&a.1.date));

        let volume: Decimal = sales.iter().map(|(_, tx)| tx.price).sum();
        let live = catalog
            .assets()
            .iter()
            .filter(|a| a.countdown(now_ms).is_some_and(|c| !c.is_ended()))
            .count();

        let mut lines = vec![
            "Trading Center".to_string(),
            format!("Market Volume: {:.2} SOL ({} sales)", volume, sales.len()),
            format!("Live Auctions: {}", live),
            "Recent Trades:".to_string(),
        ];
        if sales.is_empty() {
            lines.push("  none yet".to_string());
        }
        for (asset, tx) in sales.iter().take(RECENT_TRADES) {
            lines.push(format!(
                "  {:<12} {:<15} {:>6} SOL  {}",
                asset.name, asset.id, tx.price, tx.date
            ));
        }
        lines.join("\n")
    }
}

fn render_card(asset: &Asset) -> String {
    let tag = if asset.is_auction() { "AUCTION" } else { "" };
    format!(
        "  {:<15} {:<12} {:<9} {:<9} {:>8} SOL {}",
        asset.id,
        asset.name,
        asset.creature_type.to_string(),
        asset.rarity.to_string(),
        asset.price,
        tag
    )
}

pub const HELP: &str = "\
commands:
  list                          show marketplace results
  search <term>                 filter by name (bare `search` clears)
  type <Type|All>               Fire Water Grass Electric Psychic Dragon Ghost Normal
  rarity <Rarity|All>           Common Rare Epic Legendary
  sort <price_asc|price_desc|newest>
  reset                         clear search, type and rarity
  show <id>                     asset details
  buy <id>                      buy now / place bid
  profile                       your wallet and items
  trading                       market volume, recent trades, live auctions
  connect | disconnect
  quit";
