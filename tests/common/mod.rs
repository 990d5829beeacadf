use mrt_recharge::application::flow::RechargeStepFlow;
use mrt_recharge::domain::card::CardReading;
use mrt_recharge::domain::payment::PaymentConfirmation;
use mrt_recharge::error::{PaymentFailure, ScanFailure};
use mrt_recharge::infrastructure::scripted::{ScriptedCardScanner, ScriptedPaymentGateway};

/// Global flags that make the simulated ports instant and deterministic.
#[allow(dead_code)]
pub const INSTANT: [&str; 6] = [
    "--seed",
    "7",
    "--scan-delay-ms",
    "0",
    "--payment-delay-ms",
    "0",
];

#[allow(dead_code)]
pub fn card(id: &str, balance: u64) -> CardReading {
    CardReading::new(id, balance).expect("valid card reading")
}

/// Builds a flow whose ports replay the given outcomes, returning handles to both.
#[allow(dead_code)]
pub async fn scripted_flow(
    scans: Vec<Result<CardReading, ScanFailure>>,
    charges: Vec<Result<PaymentConfirmation, PaymentFailure>>,
) -> (RechargeStepFlow, ScriptedCardScanner, ScriptedPaymentGateway) {
    let scanner = ScriptedCardScanner::new();
    for outcome in scans {
        scanner.push(outcome).await;
    }
    let gateway = ScriptedPaymentGateway::new();
    for outcome in charges {
        gateway.push(outcome).await;
    }
    let flow = RechargeStepFlow::new(Box::new(scanner.clone()), Box::new(gateway.clone()));
    (flow, scanner, gateway)
}
