/// Errors from the script library, the community catalog, settings and
/// the generation client.
#[derive(Debug, thiserror::Error)]
pub enum VerseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not write settings: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No code was generated. Try again with a clearer prompt.")]
    EmptyResponse,

    #[error("API key is not set. Export GEMINI_API_KEY or add it to a .env file.")]
    MissingApiKey,

    #[error("No script matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one script")]
    Ambiguous(String),

    #[error("Script has no version {0}")]
    InvalidVersion(u32),

    #[error("Invalid setting: {0}")]
    InvalidConfig(String),

    #[error("Could not determine the {0} directory")]
    NoHomeDir(&'static str),
}

pub type Result<T> = std::result::Result<T, VerseError>;
