//! Mock wallet: connect, disconnect and purchase against a persisted session.
//!
//! Every operation is read-validate-write against the storage slot after a
//! simulated network delay. Nothing here serializes callers; the shell keeps
//! at most one request in flight. Two overlapping purchases can both pass
//! validation against the same stale balance.

mod purchase;

pub use purchase::{PurchaseError, PurchaseOutcome, Receipt, CONFIRMED_MESSAGE};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::state::{LockedSession, Session};
use crate::storage::{Storage, StorageError};

/// Storage slot holding the JSON session record.
pub const SESSION_KEY: &str = "pokemarket_user_v1";

pub const DEMO_ADDRESS: &str = "Hu3k...9Xm2";
pub const STARTING_BALANCE: Decimal = dec!(145.5);

/// Simulated network latency per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub connect: Duration,
    pub disconnect: Duration,
    pub purchase: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(1500),
            disconnect: Duration::from_millis(500),
            purchase: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSettings {
    /// Address assigned on connect
    pub address: String,
    /// Grant for a wallet with zero balance
    pub starting_balance: Decimal,
    pub latency: Latency,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            address: DEMO_ADDRESS.to_string(),
            starting_balance: STARTING_BALANCE,
            latency: Latency::default(),
        }
    }
}

/// Single source of truth for the user's wallet session.
pub struct SessionStore<S, C> {
    storage: Arc<S>,
    clock: Arc<C>,
    settings: Arc<WalletSettings>,
}

// Manual impl: S and C need not be Clone behind the Arc.
impl<S, C> Clone for SessionStore<S, C> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            clock: Arc::clone(&self.clock),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: Storage, C: Clock> SessionStore<S, C> {
    pub fn new(storage: Arc<S>, clock: Arc<C>, settings: WalletSettings) -> Self {
        Self {
            storage,
            clock,
            settings: Arc::new(settings),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Persisted session, or the default disconnected one.
    /// Missing, unreadable or undecodable records all count as "none stored".
    pub async fn load(&self) -> Session {
        let raw = match self.storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::default(),
            Err(e) => {
                warn!(error = %e, "session read failed, using default");
                return Session::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "stored session undecodable, using default");
                Session::default()
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(SESSION_KEY, &raw).await
    }

    /// Connect the demo wallet. A returning user keeps a non-zero balance;
    /// an empty wallet gets the starting grant.
    pub async fn connect(&self) -> Result<Session, StorageError> {
        debug!("connecting wallet");
        self.clock.sleep(self.settings.latency.connect).await;

        let mut session = self.load().await;
        session.is_connected = true;
        session.address = Some(self.settings.address.clone());
        if session.balance.is_zero() {
            session.balance = self.settings.starting_balance;
        }
        self.save(&session).await?;

        info!(
            address = %self.settings.address,
            balance = %session.balance,
            owned = session.inventory_ids.len(),
            "wallet connected"
        );
        Ok(session)
    }

    /// Disconnect. Only the flag changes; balance and inventory stay stored.
    pub async fn disconnect(&self) -> Result<LockedSession, StorageError> {
        debug!("disconnecting wallet");
        self.clock.sleep(self.settings.latency.disconnect).await;

        let mut session = self.load().await;
        session.is_connected = false;
        self.save(&session).await?;

        info!("wallet disconnected");
        Ok(session.lock())
    }

    /// Buy an asset at the given price.
    ///
    /// Checks run in order: connected, affordable, not already owned.
    /// A refused purchase leaves the stored session untouched.
    pub async fn purchase(&self, asset_id: &str, price: Decimal) -> Result<Receipt, PurchaseError> {
        debug!(asset_id, %price, "purchase requested");
        self.clock.sleep(self.settings.latency.purchase).await;

        let mut session = self.load().await;

        let checked = if !session.is_connected {
            Err(PurchaseError::NotConnected)
        } else if price <= Decimal::ZERO {
            Err(PurchaseError::InvalidPrice)
        } else if session.balance < price {
            Err(PurchaseError::InsufficientBalance {
                balance: session.balance,
                price,
            })
        } else if session.owns(asset_id) {
            Err(PurchaseError::AlreadyOwned)
        } else {
            Ok(())
        };

        if let Err(e) = checked {
            info!(asset_id, %price, reason = %e, "purchase refused");
            return Err(e);
        }

        session.apply_purchase(asset_id, price);
        self.save(&session).await?;

        info!(asset_id, %price, balance = %session.balance, "purchase confirmed");
        Ok(Receipt {
            asset_id: asset_id.to_string(),
            price,
            balance: session.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};
    use crate::storage::{FileStorage, MemoryStorage};
    use async_trait::async_trait;
    use std::io;

    type TestStore = SessionStore<MemoryStorage, ManualClock>;

    fn store_with(storage: MemoryStorage) -> (TestStore, Arc<MemoryStorage>) {
        let storage = Arc::new(storage);
        let store = SessionStore::new(
            Arc::clone(&storage),
            Arc::new(ManualClock::new(0)),
            WalletSettings::default(),
        );
        (store, storage)
    }

    fn store() -> TestStore {
        store_with(MemoryStorage::new()).0
    }

    async fn stored_raw(storage: &MemoryStorage) -> Option<String> {
        storage.get(SESSION_KEY).await.unwrap()
    }

    /// Backend whose writes always fail. Reads fail too unless a slot
    /// is served from `slots`.
    struct BrokenStorage {
        slots: Option<MemoryStorage>,
    }

    fn disk_error() -> StorageError {
        io::Error::new(io::ErrorKind::Other, "disk unavailable").into()
    }

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match &self.slots {
                Some(slots) => slots.get(key).await,
                None => Err(disk_error()),
            }
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(disk_error())
        }
    }

    fn broken_store(slots: Option<MemoryStorage>) -> SessionStore<BrokenStorage, ManualClock> {
        SessionStore::new(
            Arc::new(BrokenStorage { slots }),
            Arc::new(ManualClock::new(0)),
            WalletSettings::default(),
        )
    }

    fn file_store(dir: &std::path::Path) -> SessionStore<FileStorage, ManualClock> {
        SessionStore::new(
            Arc::new(FileStorage::new(dir)),
            Arc::new(ManualClock::new(0)),
            WalletSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_load_empty_storage() {
        let session = store().load().await;
        assert_eq!(session, Session::default());
    }

    #[tokio::test]
    async fn test_load_corrupt_record_is_default() {
        let (store, _) = store_with(MemoryStorage::with_slot(SESSION_KEY, "{not json"));
        assert_eq!(store.load().await, Session::default());

        let (store, _) = store_with(MemoryStorage::with_slot(SESSION_KEY, "{\"balance\":1}"));
        assert_eq!(store.load().await, Session::default());
    }

    #[tokio::test]
    async fn test_unreadable_storage() {
        let store = broken_store(None);
        assert_eq!(store.load().await, Session::default());

        let err = store.connect().await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[tokio::test]
    async fn test_purchase_write_failure() {
        let session = Session {
            is_connected: true,
            address: Some(DEMO_ADDRESS.to_string()),
            balance: dec!(145.5),
            inventory_ids: Vec::new(),
        };
        let raw = serde_json::to_string(&session).unwrap();
        let store = broken_store(Some(MemoryStorage::with_slot(SESSION_KEY, &raw)));

        let result = store.purchase("pokemarket-7", dec!(10)).await;
        assert!(matches!(result, Err(PurchaseError::Storage(_))));

        let outcome = PurchaseOutcome::from(result);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Transaction could not be saved");

        // Nothing was debited
        assert_eq!(store.load().await, session);
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let first = file_store(dir.path());
        first.connect().await.unwrap();
        first.purchase("pokemarket-5", dec!(20.25)).await.unwrap();
        drop(first);

        let reloaded = file_store(dir.path()).load().await;
        assert!(reloaded.is_connected);
        assert_eq!(reloaded.balance, dec!(125.25));
        assert_eq!(reloaded.inventory_ids, vec!["pokemarket-5".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_first_time_grant() {
        let store = store();
        let session = store.connect().await.unwrap();

        assert!(session.is_connected);
        assert_eq!(session.address.as_deref(), Some(DEMO_ADDRESS));
        assert_eq!(session.balance, dec!(145.5));
        assert_eq!(store.load().await, session);
    }

    #[tokio::test]
    async fn test_connect_keeps_prior_balance() {
        let store = store();
        store.connect().await.unwrap();
        store.purchase("pokemarket-3", dec!(140)).await.unwrap();
        store.disconnect().await.unwrap();

        // Non-zero balance survives reconnect, even below the grant
        let session = store.connect().await.unwrap();
        assert_eq!(session.balance, dec!(5.5));
        assert_eq!(session.inventory_ids, vec!["pokemarket-3".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_regrants_spent_wallet() {
        let store = store();
        store.connect().await.unwrap();
        store.purchase("pokemarket-1", dec!(145.5)).await.unwrap();

        let session = store.connect().await.unwrap();
        assert_eq!(session.balance, dec!(145.5));
    }

    #[tokio::test]
    async fn test_disconnect_locks_not_erases() {
        let store = store();
        store.connect().await.unwrap();
        store.purchase("pokemarket-9", dec!(10)).await.unwrap();

        let locked = store.disconnect().await.unwrap();
        assert_eq!(locked.address(), Some(DEMO_ADDRESS));
        let returned = locked.into_record();
        assert!(!returned.is_connected);
        assert_eq!(returned.balance, dec!(135.5));

        let reloaded = store.load().await;
        assert!(!reloaded.is_connected);
        assert_eq!(reloaded.balance, dec!(135.5));
        assert_eq!(reloaded.inventory_ids, vec!["pokemarket-9".to_string()]);
        assert!(!reloaded.view().is_connected());
    }

    #[tokio::test]
    async fn test_purchase_not_connected() {
        let (store, storage) = store_with(MemoryStorage::new());

        let err = store.purchase("pokemarket-1", dec!(1)).await.unwrap_err();
        assert!(matches!(err, PurchaseError::NotConnected));
        assert_eq!(err.to_string(), "Wallet not connected");
        assert_eq!(stored_raw(&storage).await, None);

        store.connect().await.unwrap();
        store.disconnect().await.unwrap();
        let before = stored_raw(&storage).await;
        assert!(store.purchase("pokemarket-1", dec!(1)).await.is_err());
        assert_eq!(stored_raw(&storage).await, before);
    }

    #[tokio::test]
    async fn test_purchase_insufficient_balance() {
        let (store, storage) = store_with(MemoryStorage::new());
        store.connect().await.unwrap();
        let before = stored_raw(&storage).await;

        let err = store.purchase("pokemarket-1", dec!(145.51)).await.unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientBalance { .. }));
        assert_eq!(err.to_string(), "Insufficient SOL balance");
        assert_eq!(stored_raw(&storage).await, before);
    }

    #[tokio::test]
    async fn test_purchase_exact_balance() {
        let store = store();
        store.connect().await.unwrap();

        let receipt = store.purchase("pokemarket-1", dec!(145.5)).await.unwrap();
        assert_eq!(receipt.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_purchase_debits_once() {
        let store = store();
        store.connect().await.unwrap();

        let receipt = store.purchase("pokemarket-4", dec!(12.34)).await.unwrap();
        assert_eq!(receipt.balance, dec!(133.16));

        let err = store.purchase("pokemarket-4", dec!(12.34)).await.unwrap_err();
        assert!(matches!(err, PurchaseError::AlreadyOwned));

        let session = store.load().await;
        assert_eq!(session.balance, dec!(133.16));
        assert_eq!(
            session.inventory_ids.iter().filter(|id| *id == "pokemarket-4").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_purchase_rejects_non_positive_price() {
        let store = store();
        store.connect().await.unwrap();

        let err = store.purchase("pokemarket-1", dec!(-5)).await.unwrap_err();
        assert!(matches!(err, PurchaseError::InvalidPrice));
        assert_eq!(store.load().await.balance, dec!(145.5));
    }

    #[tokio::test]
    async fn test_operations_request_configured_latency() {
        let store = store();
        store.connect().await.unwrap();
        store.purchase("pokemarket-1", dec!(1)).await.unwrap();
        store.disconnect().await.unwrap();

        assert_eq!(
            store.clock().sleeps(),
            vec![
                Duration::from_millis(1500),
                Duration::from_millis(2000),
                Duration::from_millis(500)
            ]
        );
        assert_eq!(store.clock().now_ms(), 4000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_does_not_block_other_tasks() {
        let store = SessionStore::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(SystemClock),
            WalletSettings::default(),
        );

        let start = tokio::time::Instant::now();
        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.connect().await }
        });

        // Other work proceeds while connect is sleeping
        let session = store.load().await;
        assert!(!session.is_connected);
        assert!(start.elapsed() < Duration::from_millis(1500));

        let connected = pending.await.unwrap().unwrap();
        assert!(connected.is_connected);
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
