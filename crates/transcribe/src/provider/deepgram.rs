use async_trait::async_trait;
use axum::http;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    error::RelayError,
    types::{UpstreamReply, UpstreamRequest},
};

use super::TranscriptionProvider;

/// Content type announced for uploaded audio
const AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// Deepgram pre-recorded transcription (`POST /v1/listen`)
pub(crate) struct DeepgramProvider {
    client: Client,
    listen_url: String,
    api_key: SecretString,
    name: String,
}

impl DeepgramProvider {
    pub fn new(name: String, api_key: SecretString, listen_url: String, client: Client) -> Self {
        Self {
            client,
            listen_url,
            api_key,
            name,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for DeepgramProvider {
    async fn relay(&self, request: UpstreamRequest) -> crate::error::Result<UpstreamReply> {
        let builder = self
            .client
            .post(&self.listen_url)
            .header(http::header::AUTHORIZATION, format!("Token {}", self.api_key.expose_secret()))
            .header(http::header::ACCEPT, "application/json");

        let builder = match request {
            UpstreamRequest::Audio { audio, query } => {
                tracing::debug!(bytes = audio.len(), params = query.len(), "relaying uploaded audio to Deepgram");

                builder
                    .query(&query)
                    .header(http::header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)
                    .body(audio)
            }
            UpstreamRequest::Json(body) => {
                tracing::debug!(url = ?body.url, model = ?body.model, "relaying audio URL to Deepgram");

                builder.json(&body)
            }
        };

        let response = builder.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();

        // Error and success bodies are both drained in full
        let bytes = response.bytes().await.map_err(|e| transport_error(&e))?;

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(%status, "Deepgram answered with an error status");
        }

        let body = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(%status, "Failed to parse Deepgram response: {e}");
            RelayError::MalformedUpstreamResponse {
                status: status.as_u16(),
                detail: e.to_string(),
            }
        })?;

        Ok(UpstreamReply { status, body })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn transport_error(error: &reqwest::Error) -> RelayError {
    if error.is_timeout() {
        tracing::error!("Deepgram request timed out: {error}");
        RelayError::UpstreamTimeout
    } else {
        tracing::error!("Deepgram request failed: {error}");
        RelayError::UpstreamUnavailable(error.to_string())
    }
}
