#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use loader::{API_KEY_ENV, BASE_URL_ENV, LISTEN_ENV};
pub use server::*;
pub use telemetry::{LogFormat, TelemetryConfig};
pub use upstream::*;

/// Top-level relay configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Transcription API the relay forwards to
    pub upstream: UpstreamConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
