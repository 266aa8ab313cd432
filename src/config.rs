//! Configuration persistence for versecraft settings.
//!
//! Settings are stored in `~/.config/versecraft/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, VerseError};
use crate::highlighting::{Lexicon, DEFAULT_THEME};

pub const MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro"];

/// Persisted user preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ai_model: String,
    pub temperature: f32,
    pub syntax_highlighting: bool,
    pub syntax_theme: String,
    pub auto_save: bool,
    pub show_line_numbers: bool,
    // Lexicon additions
    pub extra_keywords: Vec<String>,
    pub extra_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai_model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            syntax_highlighting: true,
            syntax_theme: DEFAULT_THEME.to_string(),
            auto_save: true,
            show_line_numbers: true,
            extra_keywords: Vec::new(),
            extra_types: Vec::new(),
        }
    }
}

impl Config {
    /// Tokenizer table with the configured extra words
    pub fn lexicon(&self) -> Lexicon {
        Lexicon::with_extras(&self.extra_keywords, &self.extra_types)
    }

    /// Update one setting from its textual form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "ai_model" => {
                if !MODELS.contains(&value) {
                    return Err(invalid(format!(
                        "ai_model must be one of {}",
                        MODELS.join(", ")
                    )));
                }
                self.ai_model = value.to_string();
            }
            "temperature" => {
                let temperature: f32 = value
                    .parse()
                    .map_err(|_| invalid(format!("'{}' is not a number", value)))?;
                if !(0.0..=1.0).contains(&temperature) {
                    return Err(invalid("temperature must be between 0.0 and 1.0".into()));
                }
                self.temperature = temperature;
            }
            "syntax_highlighting" => self.syntax_highlighting = parse_bool(value)?,
            "syntax_theme" => self.syntax_theme = value.to_string(),
            "auto_save" => self.auto_save = parse_bool(value)?,
            "show_line_numbers" => self.show_line_numbers = parse_bool(value)?,
            "extra_keywords" => self.extra_keywords = parse_list(value),
            "extra_types" => self.extra_types = parse_list(value),
            _ => return Err(invalid(format!("unknown key '{}'", key))),
        }
        Ok(())
    }
}

fn invalid(message: String) -> VerseError {
    VerseError::InvalidConfig(message)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(format!("'{}' is not a boolean", value))),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the path to the config file: `~/.config/versecraft/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("versecraft").join("config.toml"))
}

/// Load configuration from disk. Returns default if file is missing or invalid.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

pub fn load_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), "ignoring invalid config: {}", e);
            Config::default()
        }),
        Err(_) => {
            debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        }
    }
}

/// Save configuration to disk. Creates the config directory if needed.
pub fn save(config: &Config) -> Result<()> {
    let path = config_path().ok_or(VerseError::NoHomeDir("config"))?;
    save_to(config, &path)
}

pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}
