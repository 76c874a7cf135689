//! HTTP client for the model service: transaction feed and scoring endpoints.

use crate::config::UpstreamConfig;
use crate::types::scoring::{FraudScoreRequest, FraudScoreResponse, LoanScoreRequest, LoanScoreResponse};
use crate::types::transaction::TransactionRecord;
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Failure talking to the model service.
#[derive(Debug)]
pub enum UpstreamError {
    /// The service answered with a non-success status
    Status { status: u16, body: String },
    /// The request never produced a response
    Transport(reqwest::Error),
    /// The response body did not match the expected shape
    Decode(serde_json::Error),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Status { status, .. } => write!(f, "model service returned HTTP {status}"),
            UpstreamError::Transport(e) => write!(f, "model service unreachable: {e}"),
            UpstreamError::Decode(e) => write!(f, "unexpected model service response: {e}"),
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Status { .. } => None,
            UpstreamError::Transport(e) => Some(e),
            UpstreamError::Decode(e) => Some(e),
        }
    }
}

/// Client for the model service
pub struct ModelServiceClient {
    client: Client,
    transactions_url: Url,
    fraud_score_url: Url,
    loan_score_url: Url,
}

impl ModelServiceClient {
    /// Create a client from configuration, resolving every endpoint up front.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("risk-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).with_context(|| format!("Invalid upstream base URL {base:?}"))?;

        let join = |path: &str| {
            base.join(path.trim_start_matches('/'))
                .with_context(|| format!("Invalid upstream path {path:?}"))
        };

        Ok(Self {
            client,
            transactions_url: join(&config.transactions_path)?,
            fraud_score_url: join(&config.fraud_score_path)?,
            loan_score_url: join(&config.loan_score_path)?,
        })
    }

    pub fn transactions_url(&self) -> &Url {
        &self.transactions_url
    }

    /// Fetch the current transaction snapshot.
    pub async fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>, UpstreamError> {
        let response = self
            .client
            .get(self.transactions_url.clone())
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let body = success_body(response).await?;
        let records: Vec<TransactionRecord> = serde_json::from_str(&body).map_err(UpstreamError::Decode)?;

        debug!(count = records.len(), url = %self.transactions_url, "Fetched transactions");
        Ok(records)
    }

    /// Score a single transaction.
    pub async fn score_fraud(&self, request: &FraudScoreRequest) -> Result<FraudScoreResponse, UpstreamError> {
        self.post_json(&self.fraud_score_url, request).await
    }

    /// Score a loan application.
    pub async fn score_loan(&self, request: &LoanScoreRequest) -> Result<LoanScoreResponse, UpstreamError> {
        self.post_json(&self.loan_score_url, request).await
    }

    async fn post_json<Req, Resp>(&self, url: &Url, payload: &Req) -> Result<Resp, UpstreamError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let body = success_body(response).await?;
        serde_json::from_str(&body).map_err(UpstreamError::Decode)
    }
}

async fn success_body(response: reqwest::Response) -> Result<String, UpstreamError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await.map_err(UpstreamError::Transport)?;

    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "Model service returned an error");
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_against_base() {
        let config = UpstreamConfig {
            base_url: "http://models.internal:5050/api".to_string(),
            transactions_path: "/transactions".to_string(),
            ..UpstreamConfig::default()
        };

        let client = ModelServiceClient::new(&config).unwrap();
        assert_eq!(
            client.transactions_url().as_str(),
            "http://models.internal:5050/api/transactions"
        );
        assert_eq!(
            client.fraud_score_url.as_str(),
            "http://models.internal:5050/api/fraud/score"
        );
        assert_eq!(
            client.loan_score_url.as_str(),
            "http://models.internal:5050/api/loan/score"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = UpstreamConfig {
            base_url: "not a url".to_string(),
            ..UpstreamConfig::default()
        };

        assert!(ModelServiceClient::new(&config).is_err());
    }

    #[test]
    fn test_status_error_display() {
        let err = UpstreamError::Status {
            status: 503,
            body: "warming up".to_string(),
        };
        assert_eq!(err.to_string(), "model service returned HTTP 503");
    }
}
