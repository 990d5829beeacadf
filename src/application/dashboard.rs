use crate::domain::card::{Balance, CardId};
use crate::domain::transaction::TransactionResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Balances below this are flagged on the dashboard.
pub const LOW_BALANCE_THRESHOLD: Balance = Balance(100);

/// One card as shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub card_id: CardId,
    pub name: String,
    pub balance: Balance,
    pub last_used: Option<DateTime<Utc>>,
}

impl CardSummary {
    pub fn new(card_id: impl Into<String>, name: impl Into<String>, balance: u64) -> Self {
        Self {
            card_id: CardId::new(card_id),
            name: name.into(),
            balance: Balance::new(balance),
            last_used: None,
        }
    }

    pub fn is_low_balance(&self) -> bool {
        self.balance < LOW_BALANCE_THRESHOLD
    }
}

/// The caller of the recharge flow: known cards and everything reported so far.
///
/// Kept in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct Dashboard {
    cards: Vec<CardSummary>,
    history: Vec<TransactionResult>,
    selected: Option<CardId>,
}

impl Dashboard {
    pub fn new(cards: Vec<CardSummary>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }

    /// Sample cards for demos and the interactive session.
    pub fn demo() -> Self {
        Self::new(vec![
            CardSummary::new("card1", "Work Commute Card", 350),
            CardSummary::new("card2", "Weekend Card", 120),
            CardSummary::new("card3", "Family Card", 75),
        ])
    }

    pub fn cards(&self) -> &[CardSummary] {
        &self.cards
    }

    pub fn card(&self, card_id: &CardId) -> Option<&CardSummary> {
        self.cards.iter().find(|card| &card.card_id == card_id)
    }

    pub fn low_balance_cards(&self) -> impl Iterator<Item = &CardSummary> {
        self.cards.iter().filter(|card| card.is_low_balance())
    }

    /// Marks a known card as selected. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, card_id: &CardId) -> Option<&CardSummary> {
        let index = self.cards.iter().position(|card| &card.card_id == card_id)?;
        self.selected = Some(card_id.clone());
        self.cards.get(index)
    }

    pub fn selected(&self) -> Option<&CardSummary> {
        self.selected.as_ref().and_then(|id| self.card(id))
    }

    /// Takes ownership of a reported recharge: updates (or adds) the card and
    /// appends the transaction to the history.
    pub fn record(&mut self, result: TransactionResult) {
        match self
            .cards
            .iter_mut()
            .find(|card| card.card_id == result.card_id)
        {
            Some(card) => {
                card.balance = result.final_balance;
                card.last_used = Some(result.timestamp);
            }
            None => self.cards.push(CardSummary {
                card_id: result.card_id.clone(),
                name: "Scanned card".to_string(),
                balance: result.final_balance,
                last_used: Some(result.timestamp),
            }),
        }
        info!(
            card = %result.card_id,
            balance = %result.final_balance,
            "dashboard updated"
        );
        self.history.push(result);
    }

    /// All recorded transactions, oldest first.
    pub fn history(&self) -> &[TransactionResult] {
        &self.history
    }

    /// Up to `n` most recent transactions, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &TransactionResult> {
        self.history.iter().rev().take(n)
    }
}
