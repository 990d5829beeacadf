use super::amount::RechargeAmount;
use crate::error::ScanFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Opaque identifier printed on (or read from) a transit card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Stored value on a card, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub u64);

impl Balance {
    pub const ZERO: Self = Self(0);

    /// Largest balance a reading may report. Anything above is treated as a bad read.
    pub const CEILING: Self = Self(1_000_000_000);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Add<RechargeAmount> for Balance {
    type Output = Self;

    /// Saturates at `u64::MAX`; readings are capped at [`Balance::CEILING`] so
    /// this never triggers for a validated reading.
    fn add(self, rhs: RechargeAmount) -> Self::Output {
        Self(self.0.saturating_add(rhs.value()))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the scanner hands back after a successful read.
///
/// Immutable once produced; the flow keeps it for the rest of the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCardReading")]
pub struct CardReading {
    card_id: CardId,
    balance: Balance,
}

/// Wire shape of a reading before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCardReading {
    card_id: String,
    balance: u64,
}

impl TryFrom<RawCardReading> for CardReading {
    type Error = ScanFailure;

    fn try_from(raw: RawCardReading) -> Result<Self, Self::Error> {
        Self::new(raw.card_id, raw.balance)
    }
}

impl CardReading {
    pub fn new(card_id: impl Into<String>, balance: u64) -> Result<Self, ScanFailure> {
        let card_id = card_id.into();
        if card_id.trim().is_empty() {
            return Err(ScanFailure::InvalidReading("empty card id".to_string()));
        }
        let balance = Balance::new(balance);
        if balance > Balance::CEILING {
            return Err(ScanFailure::InvalidReading(format!(
                "balance {} exceeds {}",
                balance,
                Balance::CEILING
            )));
        }
        Ok(Self {
            card_id: CardId(card_id),
            balance,
        })
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }
}
