use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Deepgram's public API root
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.deepgram.com/v1";

/// Transcription API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// API credential, sent as `Authorization: Token <key>`
    pub api_key: SecretString,
    /// API root; the relay posts to `{base_url}/listen`
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Overall request timeout (e.g. "120s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// TCP connect timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: String,
}

impl UpstreamConfig {
    /// Configuration for the default endpoint with the given credential
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: default_base_url(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }

    /// Parsed overall request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        parse_duration("upstream.timeout", &self.timeout)
    }

    /// Parsed connect timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn connect_timeout_duration(&self) -> anyhow::Result<Duration> {
        parse_duration("upstream.connect_timeout", &self.connect_timeout)
    }

    /// Full URL of the transcription endpoint
    pub fn listen_url(&self) -> String {
        format!("{}/listen", self.base_url.as_str().trim_end_matches('/'))
    }
}

fn parse_duration(key: &str, value: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration for {key} '{value}': {e}"))
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_BASE_URL).expect("default base URL must be valid")
}

fn default_timeout() -> String {
    "120s".to_string()
}

fn default_connect_timeout() -> String {
    "10s".to_string()
}
