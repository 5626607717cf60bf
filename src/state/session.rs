use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted wallet session - one per storage profile.
/// Rewritten on every connect, disconnect and purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_connected: bool,
    /// Demo address, kept after disconnect
    pub address: Option<String>,
    /// Native token units (SOL)
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Owned asset ids in purchase order, no duplicates
    pub inventory_ids: Vec<String>,
}

impl Session {
    /// Check if the asset id is in the inventory.
    pub fn owns(&self, asset_id: &str) -> bool {
        self.inventory_ids.iter().any(|id| id == asset_id)
    }

    /// Debit the price and record ownership.
    /// Callers validate first; see `SessionStore::purchase`.
    pub fn apply_purchase(&mut self, asset_id: &str, price: Decimal) {
        self.balance -= price;
        self.inventory_ids.push(asset_id.to_string());
    }

    /// What the UI may read from this session.
    pub fn view(&self) -> SessionView<'_> {
        if self.is_connected {
            SessionView::Connected {
                address: self.address.as_deref(),
                balance: self.balance,
                inventory_ids: &self.inventory_ids,
            }
        } else {
            SessionView::Locked {
                address: self.address.as_deref(),
            }
        }
    }

    /// Lock the record. Balance and inventory stay in the record but are
    /// no longer reachable through the returned wrapper.
    pub fn lock(mut self) -> LockedSession {
        self.is_connected = false;
        LockedSession(self)
    }
}

/// Borrowed, access-checked view of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView<'a> {
    Connected {
        address: Option<&'a str>,
        balance: Decimal,
        inventory_ids: &'a [String],
    },
    Locked {
        address: Option<&'a str>,
    },
}

impl SessionView<'_> {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

/// A disconnected session as returned by disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedSession(Session);

impl LockedSession {
    pub fn address(&self) -> Option<&str> {
        self.0.address.as_deref()
    }

    /// Unwrap the full record, balance and inventory included.
    /// Only the store and the persistence layer should need this.
    pub fn into_record(self) -> Session {
        self.0
    }
}
