//! Gemini generateContent client
//!
//! Sends the image inline with the analysis prompt and asks for JSON output
//! constrained by the response schema.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use vision3d_shared::constants::ANALYSIS_PROMPT;
use vision3d_shared::{AnalysisResult, response_schema};

use super::{AnalysisError, Analyzer, SourceImage, parse_analysis_json};
use crate::config::AnalysisConfig;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Analyzer backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AnalysisError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = config.api_key.clone().unwrap_or_default();
        if api_key.is_empty() {
            warn!("no API key configured; the analysis request will be rejected");
        }

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, image: &SourceImage) -> Result<AnalysisResult, AnalysisError> {
        debug!(endpoint = %self.endpoint, ?image, "sending analysis request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(image))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Transport("Request timed out".to_string())
                } else {
                    AnalysisError::Transport(format!("Network error: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_response(&body)
    }
}

/// Map a non-2xx response to a transport error carrying the API's own
/// message, or `HTTP <status>` when the body has none.
fn status_error(status: StatusCode, body: &str) -> AnalysisError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|r| r.error.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));
    debug!(%status, %message, "analysis request rejected");
    AnalysisError::Transport(message)
}

/// Request body for one analysis call.
pub fn build_request_body(image: &SourceImage) -> Value {
    json!({
        "contents": [{
            "parts": [
                {
                    "inlineData": {
                        "mimeType": image.mime_type(),
                        "data": image.payload()
                    }
                },
                { "text": ANALYSIS_PROMPT }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Extract and parse the JSON answer from a successful response body.
pub fn parse_response(body: &str) -> Result<AnalysisResult, AnalysisError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        AnalysisError::SchemaViolation(format!("Invalid response format from AI: {}", e))
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::SchemaViolation(
            "Invalid response format from AI: empty response".to_string(),
        ));
    }

    parse_analysis_json(&text).inspect_err(|e| {
        if e.kind() == super::AnalysisErrorKind::SchemaViolation {
            warn!(text = %text, "failed to parse Gemini response");
        }
    })
}
