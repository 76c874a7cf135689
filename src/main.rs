//! Risk Dashboard - Main Entry Point
//!
//! Serves dashboard metrics computed from the model service's transaction
//! feed and relays scoring requests to it.

use anyhow::{Context, Result};
use risk_dashboard::{
    api::{self, AppState},
    config::AppConfig,
    engine::RiskAggregator,
    metrics::{MetricsReporter, ServiceMetrics},
    upstream::ModelServiceClient,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("risk_dashboard={}", config.logging.level).parse()?);
    if config.logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Risk Dashboard");
    info!(
        "Thresholds: alert_today>={}, flagged>={}, high_risk_client>={}, active window {} days",
        config.policy.alert_today_threshold,
        config.policy.flagged_suspicious_threshold,
        config.policy.high_risk_client_threshold,
        config.policy.active_window_days
    );
    if config.policy.include_future_records {
        info!("Future-dated records count toward active customers");
    }

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    // Initialize components
    let upstream = ModelServiceClient::new(&config.upstream)?;
    info!(url = %upstream.transactions_url(), "Transaction source configured");

    let aggregator = RiskAggregator::new(config.policy.clone());
    let state = AppState::new(upstream, aggregator, metrics.clone());

    let app = api::router(state).layer(api::cors_layer(&config.server)?);

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("Listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Print final summary
    info!("Risk Dashboard shutting down...");
    metrics.print_summary();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
