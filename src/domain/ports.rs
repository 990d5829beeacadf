use super::amount::RechargeAmount;
use super::card::CardReading;
use super::payment::{PaymentConfirmation, PaymentMethod};
use crate::error::{PaymentFailure, ScanFailure};
use async_trait::async_trait;

/// Source of card readings. One call, one completion; implementations never retry.
#[async_trait]
pub trait CardScanner: Send + Sync {
    async fn scan(&self) -> Result<CardReading, ScanFailure>;
}

/// Charges an amount through a payment method. One call, one completion.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(
        &self,
        amount: RechargeAmount,
        method: PaymentMethod,
    ) -> Result<PaymentConfirmation, PaymentFailure>;
}

pub type CardScannerBox = Box<dyn CardScanner>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
