use crate::error::RechargeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Operator-chosen top-up amount, always within [`RechargeAmount::RANGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RechargeAmount(u64);

impl RechargeAmount {
    pub const MIN: u64 = 50;
    pub const MAX: u64 = 5000;
    pub const RANGE: RangeInclusive<u64> = Self::MIN..=Self::MAX;

    /// Quick-pick amounts offered before manual entry.
    pub const PRESETS: [u64; 4] = [100, 200, 500, 1000];

    pub fn new(value: u64) -> Result<Self, RechargeError> {
        if Self::RANGE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(RechargeError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn presets() -> impl Iterator<Item = RechargeAmount> {
        Self::PRESETS.into_iter().map(Self)
    }
}

impl TryFrom<u64> for RechargeAmount {
    type Error = RechargeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RechargeAmount> for u64 {
    fn from(amount: RechargeAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for RechargeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
