//! Test Scoring Request Producer
//!
//! Generates and publishes synthetic loan scoring requests to NATS for
//! pipeline testing.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Request structure matching the pipeline's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoanRiskRequest {
    wallet_address: String,
    wallet_age_days: u32,
    total_transactions: u32,
    total_volume_usd: f64,
    defi_interactions: u32,
    loan_amount: f64,
    collateral_value_usd: f64,
    term_months: u32,
    previous_loans: u32,
    successful_repayments: u32,
    defaults: u32,
    reputation_score: u32,
}

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a creditworthy applicant profile
    fn generate_established(&mut self) -> LoanRiskRequest {
        self.request_counter += 1;
        let loan_amount = self.rng.gen_range(500.0..5000.0);

        LoanRiskRequest {
            wallet_address: format!("0x{:040x}", self.request_counter),
            wallet_age_days: self.rng.gen_range(180..2000),
            total_transactions: self.rng.gen_range(50..1000),
            total_volume_usd: self.rng.gen_range(10000.0..500000.0),
            defi_interactions: self.rng.gen_range(10..200),
            loan_amount,
            collateral_value_usd: loan_amount * self.rng.gen_range(1.2..2.5),
            term_months: self.rng.gen_range(1..=36),
            previous_loans: self.rng.gen_range(1..10),
            successful_repayments: self.rng.gen_range(1..10),
            defaults: 0,
            reputation_score: self.rng.gen_range(60..100),
        }
    }

    /// Generate a risky applicant profile
    fn generate_risky(&mut self) -> LoanRiskRequest {
        self.request_counter += 1;
        let loan_amount = self.rng.gen_range(2000.0..20000.0); // large ask

        LoanRiskRequest {
            wallet_address: format!("0x{:040x}", self.request_counter),
            wallet_age_days: self.rng.gen_range(0..30), // fresh wallet
            total_transactions: self.rng.gen_range(0..5),
            total_volume_usd: self.rng.gen_range(0.0..2000.0),
            defi_interactions: self.rng.gen_range(0..3),
            loan_amount,
            collateral_value_usd: loan_amount * self.rng.gen_range(0.1..0.9), // under-collateralized
            term_months: self.rng.gen_range(1..=36),
            previous_loans: self.rng.gen_range(0..4),
            successful_repayments: 0,
            defaults: self.rng.gen_range(1..4),
            reputation_score: self.rng.gen_range(0..40),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("score_request_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Scoring Request Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("credit.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let risky_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.2);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        risky_rate = risky_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, risky_rate, delay_ms).await;
        }
    };

    // Generate and publish requests
    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} requests...", count);

    let mut established_count = 0;
    let mut risky_count = 0;

    for i in 0..count {
        let request = if rng.gen_bool(risky_rate) {
            risky_count += 1;
            generator.generate_risky()
        } else {
            established_count += 1;
            generator.generate_established()
        };

        let payload = serde_json::to_vec(&request)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} requests ({} established, {} risky)",
                i + 1,
                count,
                established_count,
                risky_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} requests ({} established, {} risky)",
        count, established_count, risky_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, risky_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(risky_rate) {
            generator.generate_risky()
        } else {
            generator.generate_established()
        };

        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
