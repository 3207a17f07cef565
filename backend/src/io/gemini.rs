//! Gemini API client used for welcome messages, chat replies and task
//! suggestions.
//!
//! The client never surfaces an error to its callers. Every failure (missing
//! key, transport error, non-success status, unexpected body) is logged and
//! turned into a fixed apology, and a prompt blocked by the safety filter
//! becomes a notice that names the block reason.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Returned in place of generated text when the call fails
pub const SERVICE_ERROR_MESSAGE: &str = "Sorry, I encountered an error trying to process that request.";

/// Default model used for all prompts
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Text generation as seen by the rest of the backend.
/// Implementations always resolve to a displayable string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> String;
}

/// Ways a Gemini call can fail before it is turned into a fallback message
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response format from Gemini API")]
    InvalidFormat,
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Body of a `generateContent` response. Every level is optional because
/// blocked prompts and errors leave most of it out.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Option<serde_json::Value>,
}

/// What a well-formed response carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Text(String),
    Blocked(String),
}

impl GenerationOutcome {
    /// Text shown to the user for this outcome
    pub fn into_message(self) -> String {
        match self {
            GenerationOutcome::Text(text) => text,
            GenerationOutcome::Blocked(reason) => format!(
                "I'm sorry, I can't respond to that due to safety guidelines. Reason: {}.",
                reason
            ),
        }
    }
}

/// Pick the generated text out of a response, falling back to the block
/// reason. Anything else is an invalid format.
pub fn interpret_response(response: GenerateContentResponse) -> Result<GenerationOutcome, GeminiError> {
    let text = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text);

    if let Some(text) = text {
        return Ok(GenerationOutcome::Text(text));
    }

    match response.prompt_feedback {
        Some(PromptFeedback { block_reason: Some(reason), safety_ratings }) => {
            warn!("Gemini API prompt blocked: {} {:?}", reason, safety_ratings);
            Ok(GenerationOutcome::Blocked(reason))
        }
        _ => Err(GeminiError::InvalidFormat),
    }
}

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    generation_config: GenerationConfig,
}

impl GeminiClient {
    /// Create a client. Without an API key every call returns the fallback message.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            generation_config: GenerationConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Make the call and classify the result
    pub async fn try_generate(&self, prompt: &str) -> Result<GenerationOutcome, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent { parts: vec![RequestPart { text: prompt }] }],
            generation_config: self.generation_config,
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status { status: status.as_u16(), body });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|_| GeminiError::InvalidFormat)?;
        interpret_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(outcome) => outcome.into_message(),
            Err(e) => {
                error!("Gemini API error: {}", e);
                SERVICE_ERROR_MESSAGE.to_string()
            }
        }
    }
}
