//! The recharge wizard as an explicit state value.
//!
//! [`FlowState`] carries exactly the data each step is allowed to hold, so a
//! step can never be reached without what it needs. Transitions are plain
//! synchronous methods; the asynchronous port calls live in
//! [`RechargeStepFlow`](crate::application::flow::RechargeStepFlow).

use super::amount::RechargeAmount;
use super::card::CardReading;
use super::payment::{PaymentConfirmation, PaymentMethod};
use super::transaction::TransactionResult;
use crate::error::{PaymentFailure, RechargeError, Result, ScanFailure};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    AwaitingScan,
    AmountSelection,
    PaymentSelection,
    Processing,
    Confirmation,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Self::AwaitingScan,
        Self::AmountSelection,
        Self::PaymentSelection,
        Self::Processing,
        Self::Confirmation,
    ];

    /// 1-based position in the wizard.
    pub fn position(&self) -> u8 {
        match self {
            Self::AwaitingScan => 1,
            Self::AmountSelection => 2,
            Self::PaymentSelection => 3,
            Self::Processing => 4,
            Self::Confirmation => 5,
        }
    }

    /// Percentage shown on a progress bar.
    pub fn progress(&self) -> u8 {
        (u16::from(self.position()) * 100 / Self::ALL.len() as u16) as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitingScan => "Scan Card",
            Self::AmountSelection => "Amount",
            Self::PaymentSelection => "Payment",
            Self::Processing => "Process",
            Self::Confirmation => "Complete",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AwaitingScan => "awaiting a card scan",
            Self::AmountSelection => "selecting an amount",
            Self::PaymentSelection => "selecting a payment method",
            Self::Processing => "processing a payment",
            Self::Confirmation => "showing the confirmation",
        };
        f.write_str(text)
    }
}

/// Everything a caller can ask the flow to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Scan,
    RetryScan,
    SelectAmount,
    ConfirmAmount,
    Back,
    Cancel,
    SelectMethod,
    CompletePayment,
    Report,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Scan => "scan a card",
            Self::RetryScan => "retry the scan",
            Self::SelectAmount => "select an amount",
            Self::ConfirmAmount => "confirm the amount",
            Self::Back => "go back",
            Self::Cancel => "cancel payment selection",
            Self::SelectMethod => "select a payment method",
            Self::CompletePayment => "complete a payment",
            Self::Report => "report the result",
        };
        f.write_str(text)
    }
}

/// Current step of one recharge attempt plus the values gathered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    AwaitingScan {
        last_failure: Option<ScanFailure>,
    },
    AmountSelection {
        card: CardReading,
        staged: Option<RechargeAmount>,
    },
    PaymentSelection {
        card: CardReading,
        amount: RechargeAmount,
        last_failure: Option<PaymentFailure>,
    },
    Processing {
        card: CardReading,
        amount: RechargeAmount,
        method: PaymentMethod,
    },
    /// `result` is `None` once it has been reported.
    Confirmation {
        result: Option<TransactionResult>,
    },
}

impl Default for FlowState {
    fn default() -> Self {
        Self::AwaitingScan { last_failure: None }
    }
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        match self {
            Self::AwaitingScan { .. } => Step::AwaitingScan,
            Self::AmountSelection { .. } => Step::AmountSelection,
            Self::PaymentSelection { .. } => Step::PaymentSelection,
            Self::Processing { .. } => Step::Processing,
            Self::Confirmation { .. } => Step::Confirmation,
        }
    }

    pub fn card_reading(&self) -> Option<&CardReading> {
        match self {
            Self::AmountSelection { card, .. }
            | Self::PaymentSelection { card, .. }
            | Self::Processing { card, .. } => Some(card),
            _ => None,
        }
    }

    /// The staged amount in AmountSelection, or the confirmed one afterwards.
    pub fn amount(&self) -> Option<RechargeAmount> {
        match self {
            Self::AmountSelection { staged, .. } => *staged,
            Self::PaymentSelection { amount, .. } | Self::Processing { amount, .. } => {
                Some(*amount)
            }
            Self::Confirmation { result } => result.as_ref().map(|r| r.recharge_amount),
            Self::AwaitingScan { .. } => None,
        }
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        match self {
            Self::Processing { method, .. } => Some(*method),
            Self::Confirmation { result } => result.as_ref().map(|r| r.payment_method),
            _ => None,
        }
    }

    pub fn scan_failure(&self) -> Option<&ScanFailure> {
        match self {
            Self::AwaitingScan { last_failure } => last_failure.as_ref(),
            _ => None,
        }
    }

    pub fn payment_failure(&self) -> Option<&PaymentFailure> {
        match self {
            Self::PaymentSelection { last_failure, .. } => last_failure.as_ref(),
            _ => None,
        }
    }

    /// The completed transaction, until it is reported.
    pub fn result(&self) -> Option<&TransactionResult> {
        match self {
            Self::Confirmation { result } => result.as_ref(),
            _ => None,
        }
    }

    /// Whether "continue" is enabled on the amount step.
    pub fn can_confirm_amount(&self) -> bool {
        matches!(
            self,
            Self::AmountSelection {
                staged: Some(_),
                ..
            }
        )
    }

    /// Fails with `InvalidState` unless the flow is at `step`.
    pub fn ensure(&self, operation: Operation, step: Step) -> Result<()> {
        if self.step() == step {
            Ok(())
        } else {
            Err(self.reject(operation))
        }
    }

    /// Records the scanner's answer. A failed scan stays on the scan step and
    /// is handed back as [`RechargeError::Scan`].
    pub fn apply_scan(&mut self, outcome: std::result::Result<CardReading, ScanFailure>) -> Result<()> {
        self.ensure(Operation::Scan, Step::AwaitingScan)?;
        match outcome {
            Ok(card) => {
                *self = Self::AmountSelection { card, staged: None };
                Ok(())
            }
            Err(failure) => {
                *self = Self::AwaitingScan {
                    last_failure: Some(failure.clone()),
                };
                Err(failure.into())
            }
        }
    }

    /// Clears a displayed scan failure so the operator can scan again.
    pub fn retry_scan(&mut self) -> Result<()> {
        self.ensure(Operation::RetryScan, Step::AwaitingScan)?;
        *self = Self::AwaitingScan { last_failure: None };
        Ok(())
    }

    /// Stages `value` if it is a valid amount. Out-of-range values clear the
    /// stage and return `Ok(None)`; only a wrong step is an error.
    pub fn select_amount(&mut self, value: u64) -> Result<Option<RechargeAmount>> {
        match self {
            Self::AmountSelection { staged, .. } => {
                *staged = RechargeAmount::new(value).ok();
                Ok(*staged)
            }
            _ => Err(self.reject(Operation::SelectAmount)),
        }
    }

    pub fn confirm_amount(&mut self) -> Result<()> {
        match std::mem::take(self) {
            Self::AmountSelection {
                card,
                staged: Some(amount),
            } => {
                *self = Self::PaymentSelection {
                    card,
                    amount,
                    last_failure: None,
                };
                Ok(())
            }
            other => self.restore(other, Operation::ConfirmAmount),
        }
    }

    /// Steps one page back. Not allowed once a payment has been submitted.
    pub fn back(&mut self) -> Result<()> {
        match std::mem::take(self) {
            Self::AmountSelection { .. } => {
                *self = Self::AwaitingScan { last_failure: None };
                Ok(())
            }
            Self::PaymentSelection { card, amount, .. } => {
                *self = Self::AmountSelection {
                    card,
                    staged: Some(amount),
                };
                Ok(())
            }
            other => self.restore(other, Operation::Back),
        }
    }

    /// Leaves payment selection for the amount step, keeping the amount staged.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure(Operation::Cancel, Step::PaymentSelection)?;
        self.back()
    }

    /// Moves to Processing and returns what must be charged.
    pub fn begin_payment(&mut self, method: PaymentMethod) -> Result<RechargeAmount> {
        match std::mem::take(self) {
            Self::PaymentSelection { card, amount, .. } => {
                *self = Self::Processing {
                    card,
                    amount,
                    method,
                };
                Ok(amount)
            }
            other => self.restore(other, Operation::SelectMethod),
        }
    }

    /// Records the gateway's answer. A failed charge returns to payment
    /// selection with card and amount intact and is handed back as
    /// [`RechargeError::Payment`].
    pub fn apply_payment(
        &mut self,
        outcome: std::result::Result<PaymentConfirmation, PaymentFailure>,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        match std::mem::take(self) {
            Self::Processing {
                card,
                amount,
                method,
            } => match outcome {
                Ok(confirmation) => {
                    let result = TransactionResult::new(
                        &card,
                        amount,
                        method,
                        confirmation.transaction_id,
                        timestamp,
                    );
                    *self = Self::Confirmation {
                        result: Some(result),
                    };
                    Ok(())
                }
                Err(failure) => {
                    *self = Self::PaymentSelection {
                        card,
                        amount,
                        last_failure: Some(failure.clone()),
                    };
                    Err(failure.into())
                }
            },
            other => self.restore(other, Operation::CompletePayment),
        }
    }

    /// Hands the completed transaction over. Succeeds once per attempt.
    pub fn report(&mut self) -> Result<TransactionResult> {
        match self {
            Self::Confirmation { result } => result
                .take()
                .ok_or(RechargeError::InvalidState {
                    operation: Operation::Report,
                    step: Step::Confirmation,
                }),
            _ => Err(self.reject(Operation::Report)),
        }
    }

    /// Drops everything and returns to the scan step. Valid from any step.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn reject(&self, operation: Operation) -> RechargeError {
        RechargeError::InvalidState {
            operation,
            step: self.step(),
        }
    }

    fn restore<T>(&mut self, previous: FlowState, operation: Operation) -> Result<T> {
        *self = previous;
        Err(self.reject(operation))
    }
}
