//! Configuration for the Gemini translation adapter.
//!
//! [`TranslationConfig`] is the raw option record as a host translation app
//! stores it: every field is an optional string, keyed exactly like the host's
//! JSON (`apiKey`, `modelName`, ..., `apiBaseUrl`). Defaults, type conversions
//! and validation all happen in one place, [`ResolvedConfig::resolve`], so no
//! downstream code ever compares raw strings.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Model used when the configuration does not resolve to one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Canonical Gemini API base URL, exported so host configuration UIs can
/// prefill it. Resolution still requires an explicit base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raw configuration record, as stored by the host application.
///
/// All fields are optional strings; `apiKey` and `apiBaseUrl` are validated at
/// call time and fail fast when missing or empty.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationConfig {
    /// Gemini API key. Required.
    pub api_key: Option<String>,
    /// Model name, or the sentinel `"custom"` to use `custom_model_name`.
    pub model_name: Option<String>,
    /// Model used when `model_name` is `"custom"`.
    pub custom_model_name: Option<String>,
    /// System prompt template. Supports `$from`, `$to`, `$detect`.
    pub system_prompt: Option<String>,
    /// User prompt template. Supports `$from`, `$to`, `$detect`, `$text`.
    pub user_prompt: Option<String>,
    /// Thinking budget in tokens, as a decimal string.
    pub thinking_budget: Option<String>,
    /// Raw JSON object merged into `generationConfig`, replacing the
    /// thinking-budget block when it parses.
    pub request_arguments: Option<String>,
    /// Tri-state streaming flag: the literal string `"false"` disables
    /// streaming, any other value (or absence) enables it.
    pub use_stream: Option<String>,
    /// Sampling temperature as a decimal string. Default `"0"`.
    pub temperature: Option<String>,
    /// Nucleus sampling parameter as a decimal string. Default `"0.95"`.
    pub top_p: Option<String>,
    /// API base URL. Required. `https://` is prepended when no scheme is given.
    pub api_base_url: Option<String>,
}

impl std::fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationConfig")
            .field(
                "api_key_present",
                &self.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            )
            .field("model_name", &self.model_name)
            .field("custom_model_name", &self.custom_model_name)
            .field("use_stream", &self.use_stream)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Configuration after defaults and conversions, built once per call.
#[derive(Clone)]
pub(crate) struct ResolvedConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub use_stream: bool,
    pub temperature: f64,
    pub top_p: f64,
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
    pub thinking_budget: Option<String>,
    pub request_arguments: Option<String>,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field(
                "api_key_present",
                &(!self.api_key.expose_secret().is_empty()),
            )
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("use_stream", &self.use_stream)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .finish()
    }
}

impl ResolvedConfig {
    /// Validate the raw record and apply all defaults.
    ///
    /// Fails with [`TranslateError::Config`] when the API key or base URL is
    /// missing or empty; no network I/O has happened at that point.
    pub fn resolve(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TranslateError::Config("Please configure API Key first".into()))?;

        let raw_base_url = config
            .api_base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| TranslateError::Config("Please configure Request Path first".into()))?;

        let base_url = if raw_base_url.starts_with("http://") || raw_base_url.starts_with("https://")
        {
            raw_base_url.to_string()
        } else {
            format!("https://{raw_base_url}")
        };

        let model = match config.model_name.as_deref() {
            Some("custom") => config
                .custom_model_name
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_MODEL.to_string(),
        };

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            base_url,
            model,
            use_stream: config.use_stream.as_deref() != Some("false"),
            temperature: parse_numeric(config.temperature.as_deref(), 0.0),
            top_p: parse_numeric(config.top_p.as_deref(), 0.95),
            system_prompt: non_blank(config.system_prompt.as_deref()),
            user_prompt: non_blank(config.user_prompt.as_deref()),
            thinking_budget: non_blank(config.thinking_budget.as_deref()),
            request_arguments: non_blank(config.request_arguments.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

fn parse_numeric(raw: Option<&str>, default: f64) -> f64 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => float_prefix(s).unwrap_or_else(|| {
            tracing::warn!(value = s, default, "invalid numeric option, using default");
            default
        }),
        None => default,
    }
}

/// Longest float prefix of a lenient host-config value: `"0.7x"` is 0.7.
fn float_prefix(value: &str) -> Option<f64> {
    (1..=value.len())
        .rev()
        .find_map(|end| value.get(..end).and_then(|prefix| prefix.parse().ok()))
}
