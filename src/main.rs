use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use mrt_recharge::application::dashboard::Dashboard;
use mrt_recharge::application::flow::RechargeStepFlow;
use mrt_recharge::domain::amount::RechargeAmount;
use mrt_recharge::domain::payment::PaymentMethod;
use mrt_recharge::error::RechargeError;
use mrt_recharge::infrastructure::simulated::{
    SimulatedCardScanner, SimulatedPaymentGateway, SimulationConfig,
};
use mrt_recharge::interfaces::console::Session;
use mrt_recharge::interfaces::receipt::{ReceiptFormat, write_receipt};
use std::io;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    simulation: SimulationArgs,

    #[command(subcommand)]
    command: Command,
}

/// Behaviour of the simulated card reader and payment gateway.
#[derive(Args)]
struct SimulationArgs {
    /// Seed for reproducible card readings and transaction ids
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// How long a card scan takes, in milliseconds
    #[arg(long, global = true, default_value_t = 4000)]
    scan_delay_ms: u64,

    /// How long the gateway takes to answer, in milliseconds
    #[arg(long, global = true, default_value_t = 3500)]
    payment_delay_ms: u64,

    /// Probability that a scan fails
    #[arg(long, global = true, default_value_t = 0.2)]
    scan_failure_rate: f64,

    /// Probability that a payment is declined
    #[arg(long, global = true, default_value_t = 0.0)]
    payment_failure_rate: f64,

    /// Simulate a device without NFC hardware
    #[arg(long, global = true)]
    no_nfc: bool,
}

impl From<&SimulationArgs> for SimulationConfig {
    fn from(args: &SimulationArgs) -> Self {
        Self {
            seed: args.seed,
            scan_delay: Duration::from_millis(args.scan_delay_ms),
            payment_delay: Duration::from_millis(args.payment_delay_ms),
            scan_failure_rate: args.scan_failure_rate,
            payment_failure_rate: args.payment_failure_rate,
            nfc_available: !args.no_nfc,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scan a card and recharge it in one go, printing the receipt
    Recharge {
        /// Amount to add (50 to 5000)
        #[arg(long)]
        amount: u64,

        /// Payment method: card, mobile-wallet or other-qr
        #[arg(long, default_value = "card")]
        method: PaymentMethod,

        /// Scans to attempt before giving up
        #[arg(long, default_value_t = 3)]
        max_scan_attempts: u32,

        /// Charges to attempt before giving up
        #[arg(long, default_value_t = 1)]
        max_payment_attempts: u32,

        /// Receipt format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Read operator commands from stdin, one per line
    Session,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

impl From<Format> for ReceiptFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => ReceiptFormat::Text,
            Format::Json => ReceiptFormat::Json,
            Format::Csv => ReceiptFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SimulationConfig::from(&cli.simulation);
    let flow = RechargeStepFlow::new(
        Box::new(SimulatedCardScanner::new(config.clone()).into_diagnostic()?),
        Box::new(SimulatedPaymentGateway::new(config).into_diagnostic()?),
    );

    match cli.command {
        Command::Recharge {
            amount,
            method,
            max_scan_attempts,
            max_payment_attempts,
            format,
        } => {
            recharge(
                flow,
                amount,
                method,
                max_scan_attempts,
                max_payment_attempts,
                format.into(),
            )
            .await
        }
        Command::Session => {
            let stdin = io::stdin();
            let mut session = Session::new(flow, Dashboard::demo(), io::stdout());
            session.run(stdin.lock()).await.into_diagnostic()
        }
    }
}

/// One unattended attempt. Retries stand in for an operator pressing "try again".
async fn recharge(
    mut flow: RechargeStepFlow,
    amount: u64,
    method: PaymentMethod,
    max_scan_attempts: u32,
    max_payment_attempts: u32,
    format: ReceiptFormat,
) -> Result<()> {
    // reject a bad amount before making anyone tap a card
    RechargeAmount::new(amount).into_diagnostic()?;

    flow.start();
    let mut scans = 1;
    let mut scanned = flow.scan().await.map(|_| ());
    while let Err(RechargeError::Scan(reason)) = &scanned {
        if scans >= max_scan_attempts {
            break;
        }
        warn!(%reason, attempt = scans, "scan failed, retrying");
        scans += 1;
        scanned = flow.retry_scan().await.map(|_| ());
    }
    scanned.map_err(|e| miette!("card scan gave up after {scans} attempt(s): {e}"))?;

    flow.select_amount(amount).into_diagnostic()?;
    flow.confirm_amount().into_diagnostic()?;

    let mut charges = 1;
    let mut charged = flow.select_method(method).await.map(|_| ());
    while let Err(RechargeError::Payment(reason)) = &charged {
        if charges >= max_payment_attempts {
            break;
        }
        warn!(%reason, attempt = charges, "payment failed, retrying");
        charges += 1;
        charged = flow.select_method(method).await.map(|_| ());
    }
    charged.map_err(|e| miette!("payment gave up after {charges} attempt(s): {e}"))?;

    let result = flow.report().into_diagnostic()?;
    write_receipt(io::stdout().lock(), &result, format).into_diagnostic()?;
    Ok(())
}
