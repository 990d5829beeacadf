use crate::domain::transaction::TransactionResult;
use crate::error::OutputError;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReceiptRow<'a> {
    card_id: &'a str,
    initial_balance: u64,
    recharge_amount: u64,
    final_balance: u64,
    payment_method: &'static str,
    transaction_id: &'a str,
    timestamp: String,
}

impl<'a> From<&'a TransactionResult> for ReceiptRow<'a> {
    fn from(result: &'a TransactionResult) -> Self {
        Self {
            card_id: result.card_id.as_str(),
            initial_balance: result.initial_balance.value(),
            recharge_amount: result.recharge_amount.value(),
            final_balance: result.final_balance.value(),
            payment_method: result.payment_method.as_str(),
            transaction_id: result.transaction_id.as_str(),
            timestamp: result.timestamp.to_rfc3339(),
        }
    }
}

/// Writes recharge receipts as CSV rows, header first.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_receipts<'a>(
        &mut self,
        results: impl IntoIterator<Item = &'a TransactionResult>,
    ) -> Result<(), OutputError> {
        for result in results {
            self.writer.serialize(ReceiptRow::from(result))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
