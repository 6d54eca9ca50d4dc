//! Startup settings resolved from the process environment

use async_openai::config::OpenAIConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the OpenRouter credential
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Model used when a request does not name one
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// OpenRouter chat-completions endpoint
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Request timeout applied when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Settings for the OpenRouter chat client
///
/// Constructed once at process startup and passed by reference to every
/// consumer. The credential is optional: a missing `OPENROUTER_API_KEY`
/// resolves to `None`, and any authentication failure surfaces later on
/// the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub default_model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmSettings {
    /// Resolve settings from the process environment.
    ///
    /// Never fails: an unset `OPENROUTER_API_KEY` leaves the credential
    /// as `None`. Calling this more than once under the same environment
    /// yields equal settings.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_ENV).ok(),
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the default model
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Whether a credential was configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the client library configuration from these settings.
    ///
    /// An absent credential is passed through as the empty string; the
    /// gateway rejects unauthenticated requests when one is actually
    /// issued.
    pub fn client_config(&self) -> OpenAIConfig {
        OpenAIConfig::new()
            .with_api_base(&self.base_url)
            .with_api_key(self.api_key.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::config::Config;

    #[test]
    fn test_default_settings() {
        let settings = LlmSettings::default();
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.default_model, "google/gemini-2.5-flash");
        assert_eq!(settings.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(settings.timeout_secs, 180);
    }

    // Set, unset and idempotence checks share one test because they
    // mutate the same process-wide variable.
    #[test]
    fn test_from_env_resolves_api_key() {
        env::set_var(API_KEY_ENV, "abc123");
        let settings = LlmSettings::from_env();
        assert_eq!(settings.api_key.as_deref(), Some("abc123"));
        assert_eq!(settings.default_model, DEFAULT_MODEL);

        let again = LlmSettings::from_env();
        assert_eq!(settings, again);

        env::remove_var(API_KEY_ENV);
        let settings = LlmSettings::from_env();
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.default_model, DEFAULT_MODEL);
    }

    #[test]
    fn test_settings_builder() {
        let settings = LlmSettings::default()
            .with_api_key("test-key")
            .with_default_model("custom/model")
            .with_base_url("http://localhost:8000/v1");

        assert_eq!(settings.api_key.as_deref(), Some("test-key"));
        assert_eq!(settings.default_model, "custom/model");
        assert_eq!(settings.base_url, "http://localhost:8000/v1");
        assert!(settings.has_api_key());
    }

    #[test]
    fn test_client_config_carries_base_url() {
        let settings = LlmSettings::default().with_base_url("http://localhost:8000/v1");
        let config = settings.client_config();
        assert_eq!(config.api_base(), "http://localhost:8000/v1");
    }
}
