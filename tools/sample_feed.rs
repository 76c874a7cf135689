//! Sample Transaction Feed
//!
//! Serves synthetic transaction records at `/transactions` in the model
//! service's shape, so the dashboard can run without the model service.
//!
//! Usage: `sample-feed [bind_addr] [count] [suspicious_rate] [malformed_rate]`

use axum::{routing::get, Json, Router};
use chrono::{Duration, Utc};
use rand::Rng;
use risk_dashboard::types::{RiskBands, RiskLevel, TransactionRecord};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Record generator for local testing
struct FeedGenerator {
    rng: rand::rngs::ThreadRng,
    bands: RiskBands,
    counter: u64,
}

impl FeedGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            bands: RiskBands::default(),
            counter: 0,
        }
    }

    /// Generate an ordinary transaction from the last 45 days
    fn generate_routine(&mut self) -> TransactionRecord {
        let score = self.rng.gen_range(5..55);
        let amount = self.rng.gen_range(100.0..25_000.0);
        let minutes_ago = self.rng.gen_range(0..45 * 24 * 60);
        self.generate(score, amount, minutes_ago)
    }

    /// Generate a high-risk transaction, skewed toward today
    fn generate_suspicious(&mut self) -> TransactionRecord {
        let score = self.rng.gen_range(60..=100);
        let amount = self.rng.gen_range(50_000.0..500_000.0);
        let minutes_ago = self.rng.gen_range(0..3 * 24 * 60);
        self.generate(score, amount, minutes_ago)
    }

    fn generate(&mut self, score: i64, amount: f64, minutes_ago: i64) -> TransactionRecord {
        self.counter += 1;
        let date = (Utc::now() - Duration::minutes(minutes_ago))
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let customer = format!("Customer {}", self.counter % 50 + 1);
        let channel = self.random_choice(&["Debit", "Credit", "Transfer"]);

        TransactionRecord::new(format!("TXN{:04}", self.counter), date, customer, amount.round(), score)
            .with_channel(channel)
            .with_status(status_for(RiskLevel::from_score(score, &self.bands)))
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn status_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "Blocked",
        RiskLevel::Medium => "Under Review",
        RiskLevel::Low | RiskLevel::Unknown => "Cleared",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_feed=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let bind_addr = args.get(1).map(|s| s.as_str()).unwrap_or("127.0.0.1:5050");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(200);
    let suspicious_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.15);
    let malformed_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.02);

    info!(
        bind_addr = %bind_addr,
        count,
        suspicious_rate,
        malformed_rate,
        "Configuration loaded"
    );

    let mut generator = FeedGenerator::new();
    let mut rng = rand::thread_rng();
    let mut suspicious = 0;
    let mut malformed = 0;

    let records: Vec<TransactionRecord> = (0..count)
        .map(|_| {
            let mut record = if rng.gen_bool(suspicious_rate.clamp(0.0, 1.0)) {
                suspicious += 1;
                generator.generate_suspicious()
            } else {
                generator.generate_routine()
            };
            if rng.gen_bool(malformed_rate.clamp(0.0, 1.0)) {
                malformed += 1;
                record.date_text = "N/A".to_string();
            }
            record
        })
        .collect();

    info!(
        "Generated {} transactions ({} suspicious, {} with malformed dates)",
        count, suspicious, malformed
    );

    let records = Arc::new(records);
    let app = Router::new().route(
        "/transactions",
        get(move || {
            let records = records.clone();
            async move { Json(records.as_ref().clone()) }
        }),
    );

    let listener = TcpListener::bind(bind_addr).await?;
    info!("Serving sample feed at http://{}/transactions", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
