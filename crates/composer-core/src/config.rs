//! Configuration management for the mail composer

use serde::{Deserialize, Serialize};
use crate::constants::{
    API_KEY_ENV_VAR, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_SEND_DELAY_MS,
};
use crate::error::{ComposerError, Result};
use std::fmt;
use std::path::Path;

/// Raw configuration structure as found on disk; every section is optional
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, alias = "google_ai")]
    pub gemini: Option<GeminiConfig>,

    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposerConfig {
    pub gemini: GeminiConfig,
    pub transport: TransportConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default, alias = "apiKey")]
    pub api_key: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(alias = "api_url", default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: None,
        }
    }
}

// Keeps the key out of debug logs
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("GeminiConfig")
            .field("api_key", &key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: default_send_delay_ms(),
        }
    }
}

// Default functions
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_send_delay_ms() -> u64 {
    DEFAULT_SEND_DELAY_MS
}

impl ComposerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ComposerError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw_config: RawConfig = serde_json::from_str(json)
            .map_err(|e| ComposerError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self::from_raw_config(raw_config);
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then let the environment override the API key
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let config = config.with_api_key_override(std::env::var(API_KEY_ENV_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the API key when a non-blank override is supplied
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            log::debug!("Using Gemini API key from {}", API_KEY_ENV_VAR);
            self.gemini.api_key = key.trim().to_string();
        }
        self
    }

    fn from_raw_config(raw: RawConfig) -> Self {
        Self {
            gemini: raw.gemini.unwrap_or_default(),
            transport: raw.transport.unwrap_or_default(),
        }
    }

    /// Validate the configuration
    ///
    /// The API key is not checked here; the generation client reports a
    /// missing key on first use.
    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(ComposerError::Config("Gemini model is required".to_string()));
        }

        let base_url = self.gemini.base_url.trim();
        if base_url.is_empty() {
            return Err(ComposerError::Config("Gemini base_url is required".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ComposerError::Config(format!(
                "Gemini base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        if self.gemini.timeout_secs == Some(0) {
            return Err(ComposerError::Config("Gemini timeout_secs must be positive".to_string()));
        }

        Ok(())
    }
}
