use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

pub const CONFIRMED_MESSAGE: &str = "Transaction Confirmed!";

/// A settled purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub asset_id: String,
    pub price: Decimal,
    /// Balance after the debit
    pub balance: Decimal,
}

/// Why a purchase was refused. The display text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Insufficient SOL balance")]
    InsufficientBalance { balance: Decimal, price: Decimal },

    #[error("You already own this asset")]
    AlreadyOwned,

    #[error("Invalid price")]
    InvalidPrice,

    #[error("Transaction could not be saved")]
    Storage(#[from] StorageError),
}

/// Flat `{success, message}` result for the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOutcome {
    pub success: bool,
    pub message: String,
}

impl From<Result<Receipt, PurchaseError>> for PurchaseOutcome {
    fn from(result: Result<Receipt, PurchaseError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                message: CONFIRMED_MESSAGE.to_string(),
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_from_receipt() {
        let outcome = PurchaseOutcome::from(Ok(Receipt {
            asset_id: "pokemarket-1".to_string(),
            price: dec!(2),
            balance: dec!(143.5),
        }));
        assert!(outcome.success);
        assert_eq!(outcome.message, "Transaction Confirmed!");
    }

    #[test]
    fn test_outcome_messages() {
        let outcome = PurchaseOutcome::from(Err(PurchaseError::NotConnected));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Wallet not connected");

        let outcome = PurchaseOutcome::from(Err(PurchaseError::InsufficientBalance {
            balance: dec!(1),
            price: dec!(2),
        }));
        assert_eq!(outcome.message, "Insufficient SOL balance");

        let outcome = PurchaseOutcome::from(Err(PurchaseError::AlreadyOwned));
        assert_eq!(outcome.message, "You already own this asset");
    }
}
