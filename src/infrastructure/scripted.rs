use crate::domain::amount::RechargeAmount;
use crate::domain::card::CardReading;
use crate::domain::payment::{PaymentConfirmation, PaymentMethod};
use crate::domain::ports::{CardScanner, PaymentGateway};
use crate::error::{PaymentFailure, ScanFailure};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A card scanner that replays queued outcomes in order.
///
/// Clones share the same queue, so a test can keep a handle after boxing one
/// into a flow. An empty queue answers with an unreadable card.
#[derive(Default, Clone)]
pub struct ScriptedCardScanner {
    outcomes: Arc<Mutex<VecDeque<Result<CardReading, ScanFailure>>>>,
}

impl ScriptedCardScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, outcome: Result<CardReading, ScanFailure>) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Number of outcomes not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.outcomes.lock().await.len()
    }
}

#[async_trait]
impl CardScanner for ScriptedCardScanner {
    async fn scan(&self) -> Result<CardReading, ScanFailure> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ScanFailure::Unreadable("no card presented".to_string())))
    }
}

/// A payment gateway that replays queued outcomes and records every charge.
#[derive(Default, Clone)]
pub struct ScriptedPaymentGateway {
    outcomes: Arc<Mutex<VecDeque<Result<PaymentConfirmation, PaymentFailure>>>>,
    charges: Arc<Mutex<Vec<(RechargeAmount, PaymentMethod)>>>,
}

impl ScriptedPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, outcome: Result<PaymentConfirmation, PaymentFailure>) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Every `(amount, method)` this gateway was asked to charge, oldest first.
    pub async fn charges(&self) -> Vec<(RechargeAmount, PaymentMethod)> {
        self.charges.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedPaymentGateway {
    async fn charge(
        &self,
        amount: RechargeAmount,
        method: PaymentMethod,
    ) -> Result<PaymentConfirmation, PaymentFailure> {
        self.charges.lock().await.push((amount, method));
        self.outcomes.lock().await.pop_front().unwrap_or_else(|| {
            Err(PaymentFailure::Unreachable(
                "no scripted response".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scanner_replays_in_order() {
        let scanner = ScriptedCardScanner::new();
        scanner.push(Err(ScanFailure::HardwareUnavailable)).await;
        scanner
            .push(Ok(CardReading::new("MRT1", 10).unwrap()))
            .await;

        assert_eq!(scanner.scan().await, Err(ScanFailure::HardwareUnavailable));
        assert_eq!(scanner.scan().await.unwrap().card_id().as_str(), "MRT1");
        assert!(matches!(
            scanner.scan().await,
            Err(ScanFailure::Unreadable(_))
        ));
    }

    #[tokio::test]
    async fn test_gateway_records_charges_even_on_failure() {
        let gateway = ScriptedPaymentGateway::new();
        let handle = gateway.clone();
        let amount = RechargeAmount::new(100).unwrap();

        assert!(gateway.charge(amount, PaymentMethod::Card).await.is_err());
        assert_eq!(handle.charges().await, vec![(amount, PaymentMethod::Card)]);
    }
}
