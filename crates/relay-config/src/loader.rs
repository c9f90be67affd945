use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::{Config, ServerConfig, TelemetryConfig, UpstreamConfig};

/// Environment variable holding the transcription API credential
pub const API_KEY_ENV: &str = "DEEPGRAM_API_KEY";

/// Lowercase spelling accepted for `.env` files written for older deployments
const LEGACY_API_KEY_ENV: &str = "deepgram_api_key";

/// Environment variable overriding the upstream API root
pub const BASE_URL_ENV: &str = "DEEPGRAM_BASE_URL";

/// Environment variable holding the listen address
pub const LISTEN_ENV: &str = "RELAY_LISTEN";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build configuration from environment variables alone
    ///
    /// Used when no config file is given. Only the credential is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing or a variable holds
    /// an unparsable value
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(LEGACY_API_KEY_ENV))
            .map_err(|_| anyhow::anyhow!("{API_KEY_ENV} must be set to the transcription API key"))?;

        let mut upstream = UpstreamConfig::new(SecretString::from(api_key));

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            upstream.base_url = base_url
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {BASE_URL_ENV} '{base_url}': {e}"))?;
        }

        let mut server = ServerConfig::default();

        if let Ok(listen) = std::env::var(LISTEN_ENV) {
            server.listen_address = Some(
                listen
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid {LISTEN_ENV} '{listen}': {e}"))?,
            );
        }

        let config = Self {
            server,
            upstream,
            telemetry: TelemetryConfig::default(),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is empty, a duration is invalid
    /// or zero, or the health path is malformed
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_upstream()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_upstream(&self) -> anyhow::Result<()> {
        if self.upstream.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("upstream.api_key must not be empty");
        }

        if self.upstream.timeout_duration()?.is_zero() {
            anyhow::bail!("upstream.timeout must be greater than 0");
        }

        if self.upstream.connect_timeout_duration()?.is_zero() {
            anyhow::bail!("upstream.connect_timeout must be greater than 0");
        }

        if !matches!(self.upstream.base_url.scheme(), "http" | "https") {
            anyhow::bail!("upstream.base_url must be an http(s) URL");
        }

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.server.body_limit == 0 {
            anyhow::bail!("server.body_limit must be greater than 0");
        }

        Ok(())
    }
}
