use crate::error::AuditError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Request body for the text-generation endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Response body of the text-generation endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Anything that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a prompt once. Implementations do not retry.
    async fn submit(&self, prompt: &str) -> Result<String, AuditError>;
}

/// HTTP client for the text-generation endpoint.
///
/// Sends `POST {"prompt": ...}` and expects `{"text": ...}` back. No timeout
/// is configured here; a hung endpoint leaves the audit in `Loading`.
#[derive(Debug, Clone)]
pub struct AuditClient {
    client: Client,
    endpoint_url: String,
}

impl AuditClient {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint_url: endpoint_url.into(),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl TextGenerator for AuditClient {
    async fn submit(&self, prompt: &str) -> Result<String, AuditError> {
        info!(
            "Submitting audit prompt to {} ({} chars)",
            self.endpoint_url,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&GenerateRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                error!("Audit request failed: {}", e);
                if e.is_connect() {
                    AuditError::network(format!("Connection failed: {}", e))
                } else {
                    AuditError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuditError::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("Generation endpoint returned {}: {}", status, body);
            return Err(AuditError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AuditError::ParseFailure {
                detail: format!("Unexpected response envelope: {}", e),
                raw: body.clone(),
            })?;

        match envelope {
            GenerateResponse {
                text: Some(text), ..
            } => Ok(text),
            GenerateResponse {
                error: Some(message),
                ..
            } => {
                error!("Generation endpoint reported an error: {}", message);
                Err(AuditError::HttpError {
                    status: status.as_u16(),
                    body: message,
                })
            }
            GenerateResponse { .. } => Err(AuditError::ParseFailure {
                detail: "Response has neither `text` nor `error`".to_string(),
                raw: body,
            }),
        }
    }
}
