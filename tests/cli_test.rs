use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;

mod common;

fn cli() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(common::INSTANT);
    cmd
}

/// Instant ports whose scans always succeed.
fn reliable() -> Command {
    let mut cmd = cli();
    cmd.args(["--scan-failure-rate", "0"]);
    cmd
}

#[test]
fn test_recharge_prints_json_receipt() {
    reliable()
        .args(["recharge", "--amount", "200", "--method", "mobile-wallet"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rechargeAmount": 200"#))
        .stdout(predicate::str::contains(r#""paymentMethod": "mobile-wallet""#))
        .stdout(predicate::str::contains(r#""transactionId": "TXN-"#));
}

#[test]
fn test_recharge_prints_csv_receipt() {
    reliable()
        .args(["recharge", "--amount", "500", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "card_id,initial_balance,recharge_amount,final_balance,payment_method,transaction_id,timestamp",
        ))
        .stdout(predicate::str::contains(",500,"))
        .stdout(predicate::str::contains(",card,TXN-"));
}

#[test]
fn test_recharge_text_receipt_by_default() {
    reliable()
        .args(["recharge", "--amount", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recharge complete"))
        .stdout(predicate::str::contains("Recharge amount:  100"));
}

#[test]
fn test_out_of_range_amount_is_rejected() {
    reliable()
        .args(["recharge", "--amount", "10"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("outside the allowed range"));
}

#[test]
fn test_unknown_method_is_rejected() {
    reliable()
        .args(["recharge", "--amount", "100", "--method", "cash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cash"));
}

#[test]
fn test_scan_gives_up_after_attempts() {
    cli()
        .args(["--scan-failure-rate", "1", "--no-nfc"])
        .args(["recharge", "--amount", "100", "--max-scan-attempts", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan failed, retrying"))
        .stderr(predicate::str::contains("card scan gave up"))
        .stderr(predicate::str::contains("NFC not available"));
}

#[test]
fn test_payment_decline_fails_the_run() {
    reliable()
        .args(["--payment-failure-rate", "1"])
        .args(["recharge", "--amount", "100", "--max-payment-attempts", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("payment failed, retrying"))
        .stderr(predicate::str::contains("payment gave up"));
}

#[test]
fn test_invalid_failure_rate_is_a_config_error() {
    cli()
        .args(["--scan-failure-rate", "2", "recharge", "--amount", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_session_from_stdin() {
    reliable()
        .arg("session")
        .write_stdin("cards\nscan\namount 500\nconfirm\npay qr\nreport\ncards\nhistory\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("card3  Family Card  75 (low balance)"))
        .stdout(predicate::str::contains("amount 500 staged"))
        .stdout(predicate::str::contains("Payment method:   other-qr"))
        .stdout(predicate::str::contains("reported TXN-"))
        .stdout(predicate::str::contains("Scanned card"));
}

#[test]
fn test_session_reports_misuse_and_continues() {
    reliable()
        .arg("session")
        .write_stdin("confirm\nfly away\nscan now\nscan\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "error: Cannot confirm the amount while awaiting a card scan",
        ))
        .stdout(predicate::str::contains("error: unknown command 'fly'"))
        .stdout(predicate::str::contains("error: unexpected argument 'now'"))
        .stdout(predicate::str::contains("step 2/5 (Amount, 40%): selecting an amount"));
}
