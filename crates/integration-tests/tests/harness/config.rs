//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use relay_config::{Config, CorsConfig, ServerConfig, TelemetryConfig, UpstreamConfig};
use secrecy::SecretString;

/// API key the mock upstream expects
pub const TEST_API_KEY: &str = "dg-test-key";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder whose upstream points at `base_url`
    pub fn new(base_url: &str) -> Self {
        let mut upstream = UpstreamConfig::new(SecretString::from(TEST_API_KEY));
        upstream.base_url = base_url.parse().expect("valid URL");
        upstream.timeout = "5s".to_owned();
        upstream.connect_timeout = "2s".to_owned();

        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                upstream,
                telemetry: TelemetryConfig::default(),
            },
        }
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    /// Set the inbound body limit
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.config.server.body_limit = limit;
        self
    }

    /// Set the overall upstream timeout
    pub fn with_upstream_timeout(mut self, timeout: &str) -> Self {
        self.config.upstream.timeout = timeout.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
