use crate::domain::amount::RechargeAmount;
use crate::domain::card::CardReading;
use crate::domain::flow::{FlowState, Operation, Step};
use crate::domain::payment::PaymentMethod;
use crate::domain::ports::{CardScannerBox, PaymentGatewayBox};
use crate::domain::transaction::TransactionResult;
use crate::error::{RechargeError, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Drives one recharge attempt from card scan to confirmation.
///
/// `RechargeStepFlow` owns the [`FlowState`] and the two ports. Scanning and
/// charging borrow the flow mutably for the whole call, so nothing else can
/// touch the state while a port is outstanding.
pub struct RechargeStepFlow {
    state: FlowState,
    scanner: CardScannerBox,
    gateway: PaymentGatewayBox,
}

impl RechargeStepFlow {
    /// Creates a flow in the scan step.
    ///
    /// # Arguments
    ///
    /// * `scanner` - Where card readings come from.
    /// * `gateway` - Where charges are submitted.
    pub fn new(scanner: CardScannerBox, gateway: PaymentGatewayBox) -> Self {
        Self {
            state: FlowState::new(),
            scanner,
            gateway,
        }
    }

    /// Read-only view for presenters.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    /// Begins a fresh attempt, discarding whatever the previous one held.
    pub fn start(&mut self) {
        info!("recharge flow started");
        self.state.reset();
    }

    /// Asks the scanner for a card. Only allowed while awaiting a scan.
    ///
    /// A failed read leaves the flow on the scan step with the failure stored
    /// and is returned as an error.
    pub async fn scan(&mut self) -> Result<&CardReading> {
        self.state.ensure(Operation::Scan, Step::AwaitingScan)?;
        debug!("waiting for card");

        let outcome = self.scanner.scan().await;
        match &outcome {
            Ok(card) => info!(
                card = %card.card_id(),
                balance = %card.balance(),
                "card scanned"
            ),
            Err(reason) => warn!(%reason, "card scan failed"),
        }
        self.state.apply_scan(outcome)?;

        self.state
            .card_reading()
            .ok_or(RechargeError::InvalidState {
                operation: Operation::Scan,
                step: self.state.step(),
            })
    }

    /// Clears the last scan failure and scans again.
    pub async fn retry_scan(&mut self) -> Result<&CardReading> {
        self.state.retry_scan()?;
        self.scan().await
    }

    /// Stages an amount. Returns `Ok(None)` when the value is out of range,
    /// which leaves "continue" disabled.
    pub fn select_amount(&mut self, value: u64) -> Result<Option<RechargeAmount>> {
        let staged = self.state.select_amount(value)?;
        match staged {
            Some(amount) => debug!(%amount, "amount staged"),
            None => debug!(value, "amount out of range, nothing staged"),
        }
        Ok(staged)
    }

    pub fn confirm_amount(&mut self) -> Result<()> {
        self.state.confirm_amount()?;
        debug!(amount = ?self.state.amount(), "amount confirmed");
        Ok(())
    }

    pub fn back(&mut self) -> Result<()> {
        let from = self.state.step();
        self.state.back()?;
        debug!(%from, to = %self.state.step(), "stepped back");
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.state.cancel()?;
        debug!("payment selection cancelled");
        Ok(())
    }

    /// Picks a payment method and charges the staged amount through the gateway.
    ///
    /// On success the flow is in Confirmation with a result ready to report.
    /// On failure it is back in PaymentSelection, card and amount untouched,
    /// and the failure is returned.
    pub async fn select_method(&mut self, method: PaymentMethod) -> Result<&TransactionResult> {
        let amount = self.state.begin_payment(method)?;
        info!(%amount, %method, "submitting payment");

        let outcome = self.gateway.charge(amount, method).await;
        match &outcome {
            Ok(confirmation) => info!(
                transaction = %confirmation.transaction_id,
                "payment confirmed"
            ),
            Err(reason) => warn!(%reason, "payment failed"),
        }
        self.state.apply_payment(outcome, Utc::now())?;

        self.state
            .result()
            .ok_or(RechargeError::InvalidState {
                operation: Operation::CompletePayment,
                step: self.state.step(),
            })
    }

    /// Hands the completed transaction to the caller. Works once per attempt.
    pub fn report(&mut self) -> Result<TransactionResult> {
        let result = self.state.report()?;
        info!(
            card = %result.card_id,
            transaction = %result.transaction_id,
            final_balance = %result.final_balance,
            "recharge reported"
        );
        Ok(result)
    }

    /// Abandons the current attempt. Safe to call at any time, any number of times.
    pub fn reset(&mut self) {
        if self.state != FlowState::new() {
            debug!(from = %self.state.step(), "flow reset");
        }
        self.state.reset();
    }
}
