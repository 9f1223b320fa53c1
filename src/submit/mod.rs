//! HTTP client for the external bulk-submit endpoint.
//!
//! The pipeline issues exactly one request per confirmed upload:
//! `POST <endpoint>` with a JSON body `{ "candidates": [...] }`. A non-2xx
//! response is reported with the server-supplied `message` when the body
//! carries one. Timeouts belong to the transport layer; the pipeline treats
//! "transport gave up" like any other transport failure.

use std::env;
use std::future::Future;

use crate::error::{SubmitError, SubmitResult};
use crate::models::{BulkSubmitRequest, BulkSubmitResponse, ErrorEnvelope};

/// Environment variable naming the bulk-submit endpoint URL.
pub const ENDPOINT_ENV: &str = "ROSTERLOAD_ENDPOINT";

/// The pipeline's seam to the submission endpoint.
///
/// The production implementation is [`HttpSubmitClient`]; tests drive the
/// orchestrator with in-memory fakes.
pub trait SubmitClient {
    /// Issue one bulk-submit request for the whole batch.
    fn submit(
        &self,
        request: &BulkSubmitRequest,
    ) -> impl Future<Output = SubmitResult<BulkSubmitResponse>> + Send;
}

/// reqwest-backed submit client.
#[derive(Debug, Clone)]
pub struct HttpSubmitClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSubmitClient {
    /// Create a client for an explicit endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the `ROSTERLOAD_ENDPOINT` environment variable.
    /// A `.env` file is honored if present.
    pub fn from_env() -> SubmitResult<Self> {
        let _ = dotenvy::dotenv();

        let endpoint = env::var(ENDPOINT_ENV).map_err(|_| SubmitError::MissingEndpoint)?;
        Ok(Self::new(endpoint))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmitClient for HttpSubmitClient {
    async fn submit(&self, request: &BulkSubmitRequest) -> SubmitResult<BulkSubmitResponse> {
        tracing::debug!(
            endpoint = %self.endpoint,
            candidates = request.candidates.len(),
            "issuing bulk submit"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            // The error envelope is optional; tolerate any body shape.
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message);
            tracing::warn!(status = status.as_u16(), "bulk submit rejected");
            return Err(SubmitError::Server { status: status.as_u16(), message });
        }

        let parsed: BulkSubmitResponse = serde_json::from_str(&body)
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;
        parsed
            .check_invariants()
            .map_err(SubmitError::InvalidResponse)?;

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_missing() {
        // Scoped: remove then restore, so parallel tests are unaffected.
        let saved = env::var(ENDPOINT_ENV).ok();
        env::remove_var(ENDPOINT_ENV);

        let result = HttpSubmitClient::from_env();
        assert!(matches!(result, Err(SubmitError::MissingEndpoint)));

        if let Some(value) = saved {
            env::set_var(ENDPOINT_ENV, value);
        }
    }

    #[test]
    fn test_new_keeps_endpoint() {
        let client = HttpSubmitClient::new("http://localhost:9000/candidate/bulk-upload");
        assert_eq!(client.endpoint(), "http://localhost:9000/candidate/bulk-upload");
    }

    #[test]
    fn test_error_envelope_tolerates_any_body() {
        let with_message: ErrorEnvelope =
            serde_json::from_str(r#"{ "message": "boom", "code": 500 }"#).unwrap();
        assert_eq!(with_message.message.as_deref(), Some("boom"));

        let without: ErrorEnvelope = serde_json::from_str("{}").unwrap();
        assert!(without.message.is_none());
    }
}
