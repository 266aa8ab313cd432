use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::{debug, info};

use super::prompt::{build_prompt, clean_generated_code, normalize_model, resolve_temperature};
use super::{GenerationRequest, GenerationResponse};
use crate::error::{Result, VerseError};
use crate::store::now_ms;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
const MAX_OUTPUT_TOKENS: u32 = 8192;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, api_key))
    }

    fn with_client(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the API key from `GEMINI_API_KEY` and an optional endpoint
    /// override from `GEMINI_BASE_URL`, loading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::var(API_KEY_VAR).ok(), env::var(BASE_URL_VAR).ok())
    }

    fn from_vars(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(VerseError::MissingApiKey)?;
        let client = Self::new(api_key)?;

        Ok(match base_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                debug!(base_url = %url, "using custom generation endpoint");
                client.with_base_url(url)
            }
            None => client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> Result<Url> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        Url::parse_with_params(&url, &[("key", self.api_key.as_str())])
            .map_err(|e| VerseError::InvalidConfig(format!("bad API URL '{}': {}", url, e)))
    }

    /// Generate Verse code for a request. No retries are attempted.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let model = normalize_model(request.model.as_deref());
        let temperature = resolve_temperature(request.temperature);
        let body = request_body(&build_prompt(request), temperature);

        info!(model = %model, temperature, "requesting code generation");
        let response = self.http.post(self.endpoint(&model)?).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().unwrap_or(Value::Null);
            return Err(VerseError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let json: Value = response.json()?;
        let text = extract_text(&json).ok_or(VerseError::EmptyResponse)?;
        debug!(chars = text.len(), "received generated code");

        Ok(GenerationResponse {
            content: clean_generated_code(text),
            title: request.prompt.clone(),
            timestamp: Some(now_ms()),
        })
    }
}

/// JSON body for `generateContent`
pub fn request_body(prompt: &str, temperature: f32) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "temperature": temperature,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "topP": 0.95,
            "topK": 40
        }
    })
}

/// Text of the first part of the first candidate
pub fn extract_text(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.trim().is_empty())
}

fn error_message(body: &Value) -> String {
    body["error"]["message"]
        .as_str()
        .unwrap_or("Unknown error")
        .to_string()
}
