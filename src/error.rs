use crate::domain::flow::{Operation, Step};
use thiserror::Error;

/// Why a card could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    #[error("Could not read card: {0}")]
    Unreadable(String),
    #[error("NFC not available on this device")]
    HardwareUnavailable,
    #[error("Invalid card reading: {0}")]
    InvalidReading(String),
}

/// Why the gateway did not complete a charge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentFailure {
    #[error("Payment declined: {0}")]
    Declined(String),
    #[error("Payment gateway unreachable: {0}")]
    Unreachable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RechargeError {
    #[error(transparent)]
    Scan(#[from] ScanFailure),
    #[error(transparent)]
    Payment(#[from] PaymentFailure),
    #[error("Cannot {operation} while {step}")]
    InvalidState { operation: Operation, step: Step },
    #[error("Recharge amount {0} is outside the allowed range")]
    InvalidAmount(u64),
    #[error("Unknown payment method '{0}'")]
    InvalidPaymentMethod(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RechargeError>;

/// Failures while writing receipts or session output.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
