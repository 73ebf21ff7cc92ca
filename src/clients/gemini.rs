use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::clients::models::requests::GenerateContentRequest;
use crate::clients::models::responses::GenerateContentResponse;
use crate::config::Config;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected Gemini response: {0}")]
    MalformedEnvelope(String),
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    url: Url,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(config.gemini_timeout_secs))
                .build()?,
            url: Url::parse(&config.gemini_api_url)?,
            api_key: config.gemini_api_key.clone(),
        })
    }

    /// Sends one prompt and returns the text of the first candidate.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .http
            .post(self.url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!(status = %status, "gemini.request_failed");
            return Err(GatewayError::Status { status, body });
        }

        let body = response.text().await?;
        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, response = %body, "gemini.envelope_unreadable");
            GatewayError::MalformedEnvelope(e.to_string())
        })?;

        let finish_reason = envelope.finish_reason().map(str::to_string);
        envelope.first_text().ok_or_else(|| {
            tracing::warn!(finish_reason = ?finish_reason, "gemini.empty_candidate");
            GatewayError::MalformedEnvelope(format!(
                "no text in first candidate (finish reason: {})",
                finish_reason.as_deref().unwrap_or("none")
            ))
        })
    }
}
