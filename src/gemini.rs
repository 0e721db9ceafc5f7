//! Outbound call to the generative-search service.
//!
//! This module owns the wire format of a `generateContent` call and the
//! [`GenerateContent`] seam the orchestrator talks to:
//! - [`GeminiClient`]: the real HTTP implementation over `reqwest`
//! - any test double implementing [`GenerateContent`]
//!
//! # Grounding vs. structured output
//!
//! Enabling the search-grounding tool rules out a response schema on the
//! same request. [`GenerateContentRequest`] therefore has no schema field at
//! all; answers come back as plain text and are scraped by
//! [`crate::parser`].
//!
//! # Response envelope
//!
//! Every field of the envelope is optional and defaults to empty, so a
//! sparse or odd-shaped body degrades to "no text, no citations" instead of
//! a decode error.

use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Boxed error used across the outbound path.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Anything that can answer a `generateContent` request.
pub trait GenerateContent {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, BoxError>;
}

/// Failures of the outbound call that carry no underlying library error.
#[derive(Debug)]
pub enum GenerateError {
    /// No API credential was configured.
    MissingCredential,
    /// The service answered with a non-success status.
    Status { status: u16, body: String },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::MissingCredential => write!(f, "no API key configured"),
            GenerateError::Status { status, body } => {
                write!(f, "generateContent returned HTTP {status}: {body}")
            }
        }
    }
}

impl Error for GenerateError {}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    /// Goes into the URL path, not the body.
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

impl GenerateContentRequest {
    /// A single-turn request with the search-grounding tool enabled.
    pub fn grounded(model: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(instruction)],
            }],
            tools: vec![Tool::google_search()],
        }
    }

    /// The concatenated text of all user parts.
    pub fn instruction(&self) -> String {
        self.contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    pub fn is_grounded(&self) -> bool {
        self.tools.iter().any(|t| t.google_search.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on reasoning parts, which are not part of the answer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    #[serde(rename = "google_search", skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleSearch {}

/// Response envelope; only the fields the pipeline reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Answer text of the first candidate, reasoning parts excluded.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| p.thought != Some(true))
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Citation fragments of the first candidate, empty when absent.
    pub fn grounding_chunks(&self) -> &[GroundingChunk] {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroundingMetadata {
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One citation fragment. Non-web fragments have `web == None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebChunk {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// `reqwest`-backed client for the Generative Language REST API.
///
/// Built once by the caller and handed to the orchestrator. No request
/// timeout is set here; the call fails or succeeds on the transport's terms.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// An empty `api_key` is accepted; calls will then fail with
    /// [`GenerateError::MissingCredential`].
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("india_realty_wire/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &if self.api_key.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

impl GenerateContent for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %request.model))]
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, BoxError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::MissingCredential.into());
        }

        debug!(
            grounded = request.is_grounded(),
            instruction_bytes = request.instruction().len(),
            "Sending generateContent"
        );
        let t0 = Instant::now();
        let resp = self
            .http
            .post(self.url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "generateContent failed"
            );
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            }
            .into());
        }

        let parsed = resp.json::<GenerateContentResponse>().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            candidates = parsed.candidates.len(),
            "generateContent succeeded"
        );
        Ok(parsed)
    }
}
