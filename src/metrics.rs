//! Request and aggregation statistics for the risk dashboard service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// HTTP endpoints tracked by [`ServiceMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    DashboardSummary,
    FraudMetrics,
    Transactions,
    FraudScore,
    LoanScore,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::DashboardSummary => "dashboard_summary",
            Endpoint::FraudMetrics => "fraud_metrics",
            Endpoint::Transactions => "transactions",
            Endpoint::FraudScore => "fraud_score",
            Endpoint::LoanScore => "loan_score",
        }
    }
}

/// Metrics collector shared by all request handlers
pub struct ServiceMetrics {
    /// Total requests handled
    pub requests_served: AtomicU64,
    /// Requests that failed because the model service failed
    pub upstream_failures: AtomicU64,
    /// Records passed through the aggregation engine
    pub records_aggregated: AtomicU64,
    /// Records whose date fell back to the sentinel
    pub sentinel_dates: AtomicU64,
    /// Requests by endpoint
    requests_by_endpoint: RwLock<HashMap<Endpoint, u64>>,
    /// Aggregation times (in microseconds)
    aggregation_times: RwLock<Vec<u64>>,
    /// Start time for uptime
    start_time: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            requests_served: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
            records_aggregated: AtomicU64::new(0),
            sentinel_dates: AtomicU64::new(0),
            requests_by_endpoint: RwLock::new(HashMap::new()),
            aggregation_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record an incoming request
    pub fn record_request(&self, endpoint: Endpoint) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_endpoint) = self.requests_by_endpoint.write() {
            *by_endpoint.entry(endpoint).or_insert(0) += 1;
        }
    }

    /// Record a model service failure
    pub fn record_upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one aggregation pass
    pub fn record_aggregation(&self, elapsed: Duration, records: usize, sentinel_dates: usize) {
        self.records_aggregated
            .fetch_add(records as u64, Ordering::Relaxed);
        self.sentinel_dates
            .fetch_add(sentinel_dates as u64, Ordering::Relaxed);

        if let Ok(mut times) = self.aggregation_times.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Aggregation time statistics
    pub fn get_aggregation_stats(&self) -> AggregationStats {
        let mut sorted = match self.aggregation_times.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return AggregationStats::default(),
        };
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        AggregationStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Requests served per endpoint
    pub fn get_requests_by_endpoint(&self) -> HashMap<Endpoint, u64> {
        self.requests_by_endpoint
            .read()
            .map(|by_endpoint| by_endpoint.clone())
            .unwrap_or_default()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let requests = self.requests_served.load(Ordering::Relaxed);
        let failures = self.upstream_failures.load(Ordering::Relaxed);
        let records = self.records_aggregated.load(Ordering::Relaxed);
        let sentinel = self.sentinel_dates.load(Ordering::Relaxed);
        let failure_rate = if requests > 0 {
            (failures as f64 / requests as f64) * 100.0
        } else {
            0.0
        };
        let stats = self.get_aggregation_stats();

        info!(
            uptime_secs = self.uptime().as_secs(),
            requests,
            upstream_failures = failures,
            failure_rate = format!("{failure_rate:.1}%"),
            records_aggregated = records,
            sentinel_dates = sentinel,
            "Service metrics"
        );
        info!(
            passes = stats.count,
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            max_us = stats.max_us,
            "Aggregation latency"
        );
        for (endpoint, count) in self.get_requests_by_endpoint() {
            info!(endpoint = endpoint.as_str(), count, "Requests by endpoint");
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregation time statistics
#[derive(Debug, Default, PartialEq)]
pub struct AggregationStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic metrics reporter
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
