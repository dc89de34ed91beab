//! Error types for the vending machine.

use crate::decimal::Decimal2;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for machine operations
pub type Result<T> = std::result::Result<T, VendingError>;

/// Errors that can occur while building or operating the machine.
#[derive(Error, Debug)]
pub enum VendingError {
    /// Coin value is not one of the legal denominations
    #[error("Invalid coin value: {0}")]
    InvalidDenomination(Decimal),

    /// Requested item slot does not exist
    #[error("Item number is invalid.")]
    InvalidItemNumber,

    /// Inserted coins are worth less than the item price.
    /// Session coins are left untouched.
    #[error("Not enough money (provided: {provided}, required: {required}).")]
    InsufficientFunds {
        provided: Decimal2,
        required: Decimal2,
    },

    /// Change cannot be assembled from the till.
    /// Session coins and till counts are left untouched.
    #[error("Exact change only (left: {remaining}).")]
    ExactChangeOnly { remaining: Decimal2 },

    /// The slot has no copies left. Session coins are left untouched.
    #[error("No items left")]
    NoStockLeft,

    /// Item price below the smallest denomination
    #[error("Incorrect item price: {0}")]
    InvalidPrice(Decimal2),

    /// Initial stock per slot must be at least one
    #[error("Incorrect amount of items: {0}")]
    InvalidStock(u32),

    /// Slot range is empty
    #[error("Invalid item slot range: {first}..={last}")]
    InvalidSlotRange { first: u32, last: u32 },

    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid script or price record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing script file argument
    #[error("Missing input file argument. Usage: vending-machine <script.csv> [prices.csv]")]
    MissingArgument,
}

impl VendingError {
    /// Stable snake_case tag identifying the failure, for callers that branch
    /// on the kind rather than the message.
    pub fn kind(&self) -> &'static str {
        match self {
            VendingError::InvalidDenomination(_) => "invalid_denomination",
            VendingError::InvalidItemNumber => "invalid_item_number",
            VendingError::InsufficientFunds { .. } => "insufficient_funds",
            VendingError::ExactChangeOnly { .. } => "exact_change_only",
            VendingError::NoStockLeft => "no_stock_left",
            VendingError::InvalidPrice(_) => "invalid_price",
            VendingError::InvalidStock(_) => "invalid_stock",
            VendingError::InvalidSlotRange { .. } => "invalid_slot_range",
            VendingError::Io(_) => "io",
            VendingError::Csv(_) => "csv",
            VendingError::InvalidRecord { .. } => "invalid_record",
            VendingError::MissingArgument => "missing_argument",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_amounts() {
        let err = VendingError::InsufficientFunds {
            provided: Decimal2::from_cents(100),
            required: Decimal2::from_cents(520),
        };
        assert_eq!(
            err.to_string(),
            "Not enough money (provided: 1.00, required: 5.20)."
        );
        assert_eq!(err.kind(), "insufficient_funds");

        let err = VendingError::ExactChangeOnly {
            remaining: Decimal2::from_cents(3),
        };
        assert_eq!(err.to_string(), "Exact change only (left: 0.03).");
    }

    #[test]
    fn test_invalid_denomination_message() {
        let err = VendingError::InvalidDenomination(Decimal::new(88, 2));
        assert_eq!(err.to_string(), "Invalid coin value: 0.88");
        assert_eq!(err.kind(), "invalid_denomination");
    }
}
