use crate::catalog::SortMode;
use crate::state::{CreatureType, LockedSession, Rarity, Session};
use crate::wallet::PurchaseOutcome;

/// Everything the shell's main loop reacts to: user commands from the input
/// feed, completions of wallet requests, and the countdown tick.
#[derive(Debug)]
pub enum Event {
    // Wallet control
    Connect,
    Disconnect,
    /// Buy or bid on an asset; connects instead when disconnected
    Buy { asset_id: String },

    // Filter bar, each change re-runs the query
    Search { term: String },
    FilterType(Option<CreatureType>),
    FilterRarity(Option<Rarity>),
    Sort(SortMode),
    ResetFilters,

    // Views
    List,
    Show { asset_id: String },
    Profile,
    /// Market volume, recent sales and live auctions
    Trading,
    Help,

    // Wallet request completions
    Connected(Session),
    Disconnected(LockedSession),
    PurchaseSettled {
        asset_id: String,
        outcome: PurchaseOutcome,
        /// Session as stored after the attempt
        session: Session,
    },
    WalletFailed { reason: String },

    // Once per second; announces when the open auction ends
    Tick,

    // "quit", EOF on stdin, or Ctrl+C
    Shutdown,
}
