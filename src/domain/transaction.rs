use super::amount::RechargeAmount;
use super::card::{Balance, CardId, CardReading};
use super::payment::{PaymentMethod, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one completed recharge.
///
/// Only built after the gateway confirmed the charge, so a value of this type
/// always describes money that actually moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub card_id: CardId,
    pub initial_balance: Balance,
    pub recharge_amount: RechargeAmount,
    pub final_balance: Balance,
    pub payment_method: PaymentMethod,
    pub transaction_id: TransactionId,
    pub timestamp: DateTime<Utc>,
}

impl TransactionResult {
    pub fn new(
        card: &CardReading,
        amount: RechargeAmount,
        method: PaymentMethod,
        transaction_id: TransactionId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            card_id: card.card_id().clone(),
            initial_balance: card.balance(),
            recharge_amount: amount,
            final_balance: card.balance() + amount,
            payment_method: method,
            transaction_id,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_balance_is_exact_sum() {
        let card = CardReading::new("MRT9", 999).unwrap();
        for value in [50, 123, 1000, 5000] {
            let amount = RechargeAmount::new(value).unwrap();
            let result = TransactionResult::new(
                &card,
                amount,
                PaymentMethod::Card,
                TransactionId::new("TXN"),
                Utc::now(),
            );
            assert_eq!(result.final_balance.value(), 999 + value);
            assert_eq!(result.initial_balance, Balance::new(999));
        }
    }

    #[test]
    fn test_result_serializes_wire_names() {
        let card = CardReading::new("MRT123", 500).unwrap();
        let result = TransactionResult::new(
            &card,
            RechargeAmount::new(200).unwrap(),
            PaymentMethod::Card,
            TransactionId::new("TXN1"),
            DateTime::from_timestamp(0, 0).unwrap(),
        );
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["cardId"], "MRT123");
        assert_eq!(json["initialBalance"], 500);
        assert_eq!(json["rechargeAmount"], 200);
        assert_eq!(json["finalBalance"], 700);
        assert_eq!(json["paymentMethod"], "card");
        assert_eq!(json["transactionId"], "TXN1");
    }
}
