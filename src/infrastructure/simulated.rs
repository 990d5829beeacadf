use crate::domain::amount::RechargeAmount;
use crate::domain::card::CardReading;
use crate::domain::payment::{PaymentConfirmation, PaymentMethod};
use crate::domain::ports::{CardScanner, PaymentGateway};
use crate::error::{PaymentFailure, RechargeError, Result, ScanFailure};
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Knobs for the simulated card reader and payment gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub scan_delay: Duration,
    pub payment_delay: Duration,
    /// Probability in `[0, 1]` that a scan fails.
    pub scan_failure_rate: f64,
    /// Probability in `[0, 1]` that a charge is declined.
    pub payment_failure_rate: f64,
    /// When false, every failed scan reports missing NFC hardware.
    pub nfc_available: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            scan_delay: Duration::from_millis(4000),
            payment_delay: Duration::from_millis(3500),
            scan_failure_rate: 0.2,
            payment_failure_rate: 0.0,
            nfc_available: true,
        }
    }
}

impl SimulationConfig {
    /// Checks that both failure rates are probabilities.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("scan failure rate", self.scan_failure_rate),
            ("payment failure rate", self.payment_failure_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(RechargeError::Config(format!(
                    "{name} must be between 0 and 1, got {rate}"
                )));
            }
        }
        Ok(())
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            // separate streams keep scanner and gateway independent under one seed
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Pretends to read an NFC card: waits, then either fails or invents a card.
#[derive(Clone)]
pub struct SimulatedCardScanner {
    config: SimulationConfig,
    rng: Arc<Mutex<StdRng>>,
}

impl SimulatedCardScanner {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.rng(0);
        Ok(Self {
            config,
            rng: Arc::new(Mutex::new(rng)),
        })
    }
}

#[async_trait]
impl CardScanner for SimulatedCardScanner {
    async fn scan(&self) -> std::result::Result<CardReading, ScanFailure> {
        tokio::time::sleep(self.config.scan_delay).await;

        let mut rng = self.rng.lock().await;
        if rng.gen_bool(self.config.scan_failure_rate) {
            debug!("simulated scan failure");
            return Err(if self.config.nfc_available {
                ScanFailure::Unreadable("Please try again.".to_string())
            } else {
                ScanFailure::HardwareUnavailable
            });
        }

        let card_id = format!("MRT{}", rng.gen_range(0..10_000));
        let balance = rng.gen_range(0..1_000);
        CardReading::new(card_id, balance)
    }
}

/// Pretends to charge a payment method and mints `TXN-XXXXXXXX` references.
#[derive(Clone)]
pub struct SimulatedPaymentGateway {
    config: SimulationConfig,
    rng: Arc<Mutex<StdRng>>,
}

impl SimulatedPaymentGateway {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.rng(1);
        Ok(Self {
            config,
            rng: Arc::new(Mutex::new(rng)),
        })
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(
        &self,
        amount: RechargeAmount,
        method: PaymentMethod,
    ) -> std::result::Result<PaymentConfirmation, PaymentFailure> {
        tokio::time::sleep(self.config.payment_delay).await;

        let mut rng = self.rng.lock().await;
        if rng.gen_bool(self.config.payment_failure_rate) {
            debug!(%amount, %method, "simulated payment decline");
            return Err(PaymentFailure::Declined(format!(
                "{method} payment of {amount} was declined"
            )));
        }

        let suffix: String = (&mut *rng)
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Ok(PaymentConfirmation::new(format!("TXN-{suffix}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            scan_delay: Duration::ZERO,
            payment_delay: Duration::ZERO,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_config_rejects_bad_rates() {
        let config = SimulationConfig {
            scan_failure_rate: 1.5,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(RechargeError::Config(_))));

        let config = SimulationConfig {
            payment_failure_rate: -0.1,
            ..SimulationConfig::default()
        };
        assert!(SimulatedPaymentGateway::new(config).is_err());
    }

    #[tokio::test]
    async fn test_scanner_produces_plausible_cards() {
        let scanner = SimulatedCardScanner::new(SimulationConfig {
            scan_failure_rate: 0.0,
            ..instant(7)
        })
        .unwrap();

        for _ in 0..50 {
            let card = scanner.scan().await.unwrap();
            assert!(card.card_id().as_str().starts_with("MRT"));
            assert!(card.balance().value() < 1_000);
        }
    }

    #[tokio::test]
    async fn test_scanner_always_fails_at_full_rate() {
        let scanner = SimulatedCardScanner::new(SimulationConfig {
            scan_failure_rate: 1.0,
            nfc_available: false,
            ..instant(7)
        })
        .unwrap();

        assert_eq!(scanner.scan().await, Err(ScanFailure::HardwareUnavailable));
    }

    #[tokio::test]
    async fn test_same_seed_same_cards() {
        let config = SimulationConfig {
            scan_failure_rate: 0.0,
            ..instant(42)
        };
        let a = SimulatedCardScanner::new(config.clone()).unwrap();
        let b = SimulatedCardScanner::new(config).unwrap();
        assert_eq!(a.scan().await, b.scan().await);
    }

    #[tokio::test]
    async fn test_gateway_mints_transaction_ids() {
        let gateway = SimulatedPaymentGateway::new(instant(3)).unwrap();
        let amount = RechargeAmount::new(500).unwrap();

        let confirmation = gateway.charge(amount, PaymentMethod::Card).await.unwrap();
        let id = confirmation.transaction_id.as_str();
        assert!(id.starts_with("TXN-"));
        assert_eq!(id.len(), 12);
        assert!(
            id[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[tokio::test]
    async fn test_gateway_declines_at_full_rate() {
        let gateway = SimulatedPaymentGateway::new(SimulationConfig {
            payment_failure_rate: 1.0,
            ..instant(3)
        })
        .unwrap();
        let amount = RechargeAmount::new(500).unwrap();

        assert!(matches!(
            gateway.charge(amount, PaymentMethod::OtherQr).await,
            Err(PaymentFailure::Declined(_))
        ));
    }
}
