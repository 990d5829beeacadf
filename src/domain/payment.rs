use crate::error::RechargeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    MobileWallet,
    OtherQr,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Card, Self::MobileWallet, Self::OtherQr];

    /// Name used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::MobileWallet => "mobile-wallet",
            Self::OtherQr => "other-qr",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = RechargeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "mobile-wallet" | "mobile" => Ok(Self::MobileWallet),
            "other-qr" | "other" | "qr" => Ok(Self::OtherQr),
            other => Err(RechargeError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

/// Gateway-issued reference for a completed charge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful answer from a [`PaymentGateway`](super::ports::PaymentGateway).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub transaction_id: TransactionId,
}

impl PaymentConfirmation {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: TransactionId::new(transaction_id),
        }
    }
}
