use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;

use crate::{
    error::RelayError,
    http_client::http_client,
    provider::{TranscriptionProvider, deepgram::DeepgramProvider},
    types::{Envelope, TranscriptionForm},
};

/// Relay that forwards parsed forms to the transcription API
pub struct Server {
    provider: Box<dyn TranscriptionProvider>,
}

impl Server {
    /// Relay one form upstream and wrap the reply
    ///
    /// The upstream status is passed through unchanged, error statuses
    /// included. Every call reaches the upstream; nothing is cached.
    pub(crate) async fn relay(&self, form: TranscriptionForm) -> crate::error::Result<Response> {
        let request = form.upstream_request();

        tracing::debug!(provider = self.provider.name(), "forwarding transcription request");

        let reply = self.provider.relay(request).await?;

        tracing::debug!(status = %reply.status, "transcription reply received");

        let envelope = Envelope::new(form, reply.body);

        let body = serde_json::to_vec(&envelope).map_err(|e| {
            tracing::error!("Failed to serialize relay envelope: {e}");
            RelayError::InternalError
        })?;

        Ok((reply.status, [(CONTENT_TYPE, "application/json")], body).into_response())
    }
}

/// Builder for constructing the relay from configuration
pub struct TranscribeServerBuilder<'a> {
    config: &'a relay_config::Config,
}

impl<'a> TranscribeServerBuilder<'a> {
    pub const fn new(config: &'a relay_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let upstream = &self.config.upstream;

        let timeout = upstream
            .timeout_duration()
            .map_err(|e| RelayError::ConfigError(e.to_string()))?;
        let connect_timeout = upstream
            .connect_timeout_duration()
            .map_err(|e| RelayError::ConfigError(e.to_string()))?;

        let listen_url = upstream.listen_url();
        tracing::debug!(%listen_url, ?timeout, "initializing Deepgram relay");

        let provider = DeepgramProvider::new(
            "deepgram".to_string(),
            upstream.api_key.clone(),
            listen_url,
            http_client(timeout, connect_timeout)?,
        );

        Ok(Server {
            provider: Box::new(provider),
        })
    }
}
