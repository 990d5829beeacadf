//! Line-oriented operator console.
//!
//! Each input line is one [`Command`]. The session applies it to the
//! [`RechargeStepFlow`], prints what happened, and keeps going on errors.

use crate::application::dashboard::Dashboard;
use crate::application::flow::RechargeStepFlow;
use crate::domain::card::CardId;
use crate::domain::payment::PaymentMethod;
use crate::error::{OutputError, RechargeError};
use crate::interfaces::receipt::{ReceiptFormat, write_receipt};
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Method(#[from] RechargeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Scan,
    Retry,
    Amount(u64),
    Confirm,
    Back,
    Cancel,
    Pay(PaymentMethod),
    Report,
    Reset,
    Status,
    Cards,
    Select(CardId),
    History,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        let command = match name.as_str() {
            "start" => Ok(Self::Start),
            "scan" => Ok(Self::Scan),
            "retry" => Ok(Self::Retry),
            "amount" => {
                let raw = argument.ok_or(CommandError::MissingArgument("amount"))?;
                raw.parse()
                    .map(Self::Amount)
                    .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
            }
            "confirm" => Ok(Self::Confirm),
            "back" => Ok(Self::Back),
            "cancel" => Ok(Self::Cancel),
            "pay" => {
                let raw = argument.ok_or(CommandError::MissingArgument("pay"))?;
                Ok(Self::Pay(raw.parse()?))
            }
            "select" => {
                let raw = argument.ok_or(CommandError::MissingArgument("select"))?;
                Ok(Self::Select(CardId::new(raw)))
            }
            "report" => Ok(Self::Report),
            "reset" => Ok(Self::Reset),
            "status" => Ok(Self::Status),
            "cards" => Ok(Self::Cards),
            "history" => Ok(Self::History),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }?;

        let takes_argument = matches!(
            command,
            Self::Amount(_) | Self::Pay(_) | Self::Select(_)
        );
        let extra = if takes_argument {
            words.next()
        } else {
            argument
        };
        match extra {
            Some(word) => Err(CommandError::UnexpectedArgument(word.to_string())),
            None => Ok(command),
        }
    }
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continue {
    Yes,
    No,
}

/// An operator session: one flow, the dashboard it reports to, and an output sink.
pub struct Session<W: Write> {
    flow: RechargeStepFlow,
    dashboard: Dashboard,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(flow: RechargeStepFlow, dashboard: Dashboard, out: W) -> Self {
        Self {
            flow,
            dashboard,
            out,
        }
    }

    pub fn flow(&self) -> &RechargeStepFlow {
        &self.flow
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Runs commands from `input` until it ends or a `quit` is read.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub async fn run<R: BufRead>(&mut self, input: R) -> Result<(), OutputError> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command).await? == Continue::No {
                        break;
                    }
                }
                Err(e) => writeln!(self.out, "error: {e}")?,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<Continue, OutputError> {
        debug!(?command, "executing");
        let outcome = match command {
            Command::Start => {
                self.flow.start();
                Ok(())
            }
            Command::Scan => self.flow.scan().await.map(|_| ()),
            Command::Retry => self.flow.retry_scan().await.map(|_| ()),
            Command::Amount(value) => match self.flow.select_amount(value) {
                Ok(Some(amount)) => {
                    writeln!(self.out, "amount {amount} staged")?;
                    Ok(())
                }
                Ok(None) => {
                    writeln!(self.out, "amount {value} rejected (allowed 50-5000)")?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Confirm => self.flow.confirm_amount(),
            Command::Back => self.flow.back(),
            Command::Cancel => self.flow.cancel(),
            Command::Pay(method) => match self.flow.select_method(method).await {
                Ok(result) => {
                    write_receipt(&mut self.out, result, ReceiptFormat::Text)?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Report => match self.flow.report() {
                Ok(result) => {
                    writeln!(
                        self.out,
                        "reported {} for card {}, balance {}",
                        result.transaction_id, result.card_id, result.final_balance
                    )?;
                    self.dashboard.record(result);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Reset => {
                self.flow.reset();
                Ok(())
            }
            Command::Status => Ok(()),
            Command::Cards => {
                self.write_cards()?;
                return Ok(Continue::Yes);
            }
            Command::Select(card_id) => {
                match self.dashboard.select(&card_id) {
                    Some(card) => writeln!(
                        self.out,
                        "selected {}  {}  {}",
                        card.card_id, card.name, card.balance
                    )?,
                    None => writeln!(self.out, "error: no card '{card_id}' on the dashboard")?,
                }
                return Ok(Continue::Yes);
            }
            Command::History => {
                self.write_history()?;
                return Ok(Continue::Yes);
            }
            Command::Quit => return Ok(Continue::No),
        };

        match outcome {
            Ok(()) => {}
            Err(RechargeError::Scan(reason)) => writeln!(self.out, "scan failed: {reason}")?,
            Err(RechargeError::Payment(reason)) => {
                writeln!(self.out, "payment failed: {reason}")?
            }
            Err(e) => writeln!(self.out, "error: {e}")?,
        }
        self.write_status()?;
        Ok(Continue::Yes)
    }

    fn write_status(&mut self) -> Result<(), OutputError> {
        let state = self.flow.state();
        let step = state.step();
        writeln!(
            self.out,
            "step {}/5 ({}, {}%): {}",
            step.position(),
            step.label(),
            step.progress(),
            step
        )?;
        if let Some(card) = state.card_reading() {
            writeln!(self.out, "  card {} balance {}", card.card_id(), card.balance())?;
        }
        if let Some(amount) = state.amount() {
            writeln!(self.out, "  amount {amount}")?;
        }
        Ok(())
    }

    fn write_cards(&mut self) -> Result<(), OutputError> {
        let selected = self.dashboard.selected().map(|card| card.card_id.clone());
        for card in self.dashboard.cards() {
            let marker = if selected.as_ref() == Some(&card.card_id) {
                "* "
            } else {
                ""
            };
            let flag = if card.is_low_balance() {
                " (low balance)"
            } else {
                ""
            };
            writeln!(
                self.out,
                "{}{}  {}  {}{}",
                marker, card.card_id, card.name, card.balance, flag
            )?;
        }
        let low = self.dashboard.low_balance_cards().count();
        if low > 0 {
            writeln!(self.out, "{low} card(s) low on balance")?;
        }
        Ok(())
    }

    fn write_history(&mut self) -> Result<(), OutputError> {
        if self.dashboard.history().is_empty() {
            writeln!(self.out, "no transactions yet")?;
        }
        for result in self.dashboard.recent(usize::MAX) {
            writeln!(
                self.out,
                "{}  {}  +{} -> {}  {}",
                result.transaction_id,
                result.card_id,
                result.recharge_amount,
                result.final_balance,
                result.payment_method
            )?;
        }
        Ok(())
    }
}
