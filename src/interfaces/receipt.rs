use super::csv::receipt_writer::ReceiptWriter;
use crate::domain::transaction::TransactionResult;
use crate::error::OutputError;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiptFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Renders one receipt in the requested format.
pub fn write_receipt<W: Write>(
    mut out: W,
    result: &TransactionResult,
    format: ReceiptFormat,
) -> Result<(), OutputError> {
    match format {
        ReceiptFormat::Text => write_text(&mut out, result),
        ReceiptFormat::Json => {
            serde_json::to_writer_pretty(&mut out, result)?;
            writeln!(out)?;
            Ok(())
        }
        ReceiptFormat::Csv => ReceiptWriter::new(out).write_receipts([result]),
    }
}

fn write_text<W: Write>(out: &mut W, result: &TransactionResult) -> Result<(), OutputError> {
    writeln!(out, "Recharge complete")?;
    writeln!(out, "Card ID:          {}", result.card_id)?;
    writeln!(out, "Previous balance: {}", result.initial_balance)?;
    writeln!(out, "Recharge amount:  {}", result.recharge_amount)?;
    writeln!(out, "New balance:      {}", result.final_balance)?;
    writeln!(out, "Payment method:   {}", result.payment_method)?;
    writeln!(out, "Transaction ID:   {}", result.transaction_id)?;
    writeln!(
        out,
        "Date:             {}",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::RechargeAmount;
    use crate::domain::card::CardReading;
    use crate::domain::payment::{PaymentMethod, TransactionId};
    use chrono::DateTime;

    fn sample() -> TransactionResult {
        TransactionResult::new(
            &CardReading::new("MRT123", 500).unwrap(),
            RechargeAmount::new(200).unwrap(),
            PaymentMethod::Card,
            TransactionId::new("TXN1"),
            DateTime::from_timestamp(0, 0).unwrap(),
        )
    }

    fn render(format: ReceiptFormat) -> String {
        let mut buffer = Vec::new();
        write_receipt(&mut buffer, &sample(), format).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_text_receipt() {
        let text = render(ReceiptFormat::Text);
        assert!(text.contains("New balance:      700"));
        assert!(text.contains("Transaction ID:   TXN1"));
        assert!(text.contains("Date:             1970-01-01 00:00:00 UTC"));
    }

    #[test]
    fn test_json_receipt_parses_back() {
        let json = render(ReceiptFormat::Json);
        let parsed: TransactionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_csv_receipt_has_one_row() {
        let csv = render(ReceiptFormat::Csv);
        assert_eq!(csv.lines().count(), 2);
    }
}
