//! Verse code generation through a hosted text-generation API.

mod client;
mod prompt;

pub use client::{extract_text, request_body, GeminiClient, DEFAULT_BASE_URL};
pub use prompt::{
    build_prompt, clean_generated_code, normalize_model, resolve_temperature, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, PROMPT_EXAMPLES,
};

use crate::store::SavedScript;

/// What to generate
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    /// 0.0 to 1.0
    pub temperature: Option<f32>,
    /// Existing code to extend
    pub continue_code: Option<String>,
    /// How to change `insert_code`
    pub edit_instructions: Option<String>,
    /// Code to integrate, or to edit when `edit_instructions` is set
    pub insert_code: Option<String>,
}

/// Cleaned generation result
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub content: String,
    pub title: String,
    pub timestamp: Option<i64>,
}

impl GenerationResponse {
    /// Library record for this result
    pub fn to_saved_script(&self, request: &GenerationRequest) -> SavedScript {
        let mut script = SavedScript::new(
            &self.title,
            &self.content,
            &request.prompt,
            &normalize_model(request.model.as_deref()),
            resolve_temperature(request.temperature),
        );
        if let Some(timestamp) = self.timestamp {
            script.timestamp = timestamp;
        }
        script
    }
}
