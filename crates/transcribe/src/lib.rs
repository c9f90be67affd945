#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod form;
mod http_client;
mod provider;
mod server;
mod types;

use std::sync::Arc;

use axum::{Router, extract::State, response::Response, routing::post};

pub use error::{RelayError, Result};
pub use form::ExtractForm;
pub use server::{Server, TranscribeServerBuilder};
pub use types::TranscriptionForm;

/// Path the relay accepts submissions on
pub const RELAY_PATH: &str = "/api";

/// Build the relay from configuration
///
/// # Errors
///
/// Returns an error if the upstream client fails to initialize
pub fn build_server(config: &relay_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TranscribeServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize transcription relay: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for the relay
///
/// Only POST is routed; other methods get an empty 405.
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route(RELAY_PATH, post(relay))
}

/// Handle transcription submissions
async fn relay(State(server): State<Arc<Server>>, ExtractForm(form): ExtractForm) -> Result<Response> {
    tracing::debug!(
        has_file = form.file.is_some(),
        has_url = form.url.is_some(),
        "relay handler called"
    );

    server.relay(form).await
}
