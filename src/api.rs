//! HTTP surface: dashboard endpoints backed by the aggregation engine, plus
//! relays to the model service's scoring endpoints.

use crate::config::ServerConfig;
use crate::engine::{normalize, RiskAggregator};
use crate::metrics::{Endpoint, ServiceMetrics};
use crate::types::dashboard::{DashboardSummary, FraudMetrics};
use crate::types::scoring::{FraudScoreRequest, FraudScoreResponse, LoanScoreRequest, LoanScoreResponse};
use crate::types::transaction::TransactionRecord;
use crate::upstream::{ModelServiceClient, UpstreamError};
use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info_span};
use uuid::Uuid;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<ModelServiceClient>,
    pub aggregator: Arc<RiskAggregator>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(upstream: ModelServiceClient, aggregator: RiskAggregator, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            upstream: Arc::new(upstream),
            aggregator: Arc::new(aggregator),
            metrics,
        }
    }

    async fn fetch_transactions(&self, decode_message: &'static str) -> Result<Vec<TransactionRecord>, ApiError> {
        self.upstream
            .fetch_transactions()
            .await
            .map_err(|e| self.upstream_failed(e, decode_message))
    }

    fn upstream_failed(&self, err: UpstreamError, decode_message: &'static str) -> ApiError {
        self.metrics.record_upstream_failure();
        ApiError::from_upstream(err, decode_message)
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/dashboard/summary", get(get_dashboard_summary))
        .route("/api/fraud/metrics", get(get_fraud_metrics))
        .route("/api/fraud/transactions", get(get_transactions))
        .route("/api/fraud/score", post(post_fraud_score))
        .route("/api/loan/score", post(post_loan_score))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
            )
        }))
        .with_state(state)
}

/// CORS layer for the configured origins.
pub fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origin = if config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin {o:?}")))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "risk-dashboard",
    }))
}

/// Dashboard summary over the current transaction snapshot.
pub async fn get_dashboard_summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    state.metrics.record_request(Endpoint::DashboardSummary);
    let records = state.fetch_transactions("Error building dashboard summary").await?;

    let started = Instant::now();
    let reference = Utc::now();
    let normalized = normalize(&records, reference);
    let summary = state.aggregator.summarize(&normalized, reference);
    let sentinel_dates = normalized.iter().filter(|r| r.used_sentinel).count();
    state
        .metrics
        .record_aggregation(started.elapsed(), records.len(), sentinel_dates);

    Ok(Json(summary))
}

/// Fraud KPIs over the current transaction snapshot.
pub async fn get_fraud_metrics(State(state): State<AppState>) -> Result<Json<FraudMetrics>, ApiError> {
    state.metrics.record_request(Endpoint::FraudMetrics);
    let records = state.fetch_transactions("Error building fraud metrics").await?;

    let started = Instant::now();
    let normalized = normalize(&records, Utc::now());
    let metrics = state.aggregator.metrics(&normalized);
    let sentinel_dates = normalized.iter().filter(|r| r.used_sentinel).count();
    state
        .metrics
        .record_aggregation(started.elapsed(), records.len(), sentinel_dates);

    Ok(Json(metrics))
}

/// Transaction list with canonical field names.
pub async fn get_transactions(State(state): State<AppState>) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    state.metrics.record_request(Endpoint::Transactions);
    let records = state.fetch_transactions("Failed to parse transaction list").await?;
    Ok(Json(records))
}

pub async fn post_fraud_score(
    State(state): State<AppState>,
    Json(request): Json<FraudScoreRequest>,
) -> Result<Json<FraudScoreResponse>, ApiError> {
    state.metrics.record_request(Endpoint::FraudScore);
    state
        .upstream
        .score_fraud(&request)
        .await
        .map(Json)
        .map_err(|e| state.upstream_failed(e, "Failed to parse fraud model response"))
}

pub async fn post_loan_score(
    State(state): State<AppState>,
    Json(request): Json<LoanScoreRequest>,
) -> Result<Json<LoanScoreResponse>, ApiError> {
    state.metrics.record_request(Endpoint::LoanScore);
    state
        .upstream
        .score_loan(&request)
        .await
        .map(Json)
        .map_err(|e| state.upstream_failed(e, "Invalid response from ML service"))
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum ApiError {
    /// Upstream status and body, relayed unchanged
    Upstream { status: u16, body: String },
    /// Model service unreachable
    Unavailable(String),
    /// Model service answered with something we cannot use
    BadUpstreamBody(String),
}

impl ApiError {
    fn from_upstream(err: UpstreamError, decode_message: &'static str) -> Self {
        match err {
            UpstreamError::Status { status, body } => ApiError::Upstream { status, body },
            UpstreamError::Transport(e) => ApiError::Unavailable(e.to_string()),
            UpstreamError::Decode(e) => ApiError::BadUpstreamBody(format!("{decode_message}: {e}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream { status, body } => {
                error!(status, "Model service request failed");
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body).into_response()
            }
            ApiError::Unavailable(message) => {
                error!(error = %message, "Model service unreachable");
                let body = Json(json!({ "error": "Model service unavailable" }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            ApiError::BadUpstreamBody(message) => {
                error!(error = %message, "Model service response rejected");
                let body = Json(json!({ "error": message }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
