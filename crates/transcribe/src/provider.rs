pub(crate) mod deepgram;

use async_trait::async_trait;

use crate::types::{UpstreamReply, UpstreamRequest};

/// Transcription API the relay forwards to
#[async_trait]
pub(crate) trait TranscriptionProvider: Send + Sync {
    /// Send one request and return the upstream status with its parsed body
    ///
    /// Non-success statuses are not errors; they are relayed to the caller.
    async fn relay(&self, request: UpstreamRequest) -> crate::error::Result<UpstreamReply>;

    /// Get the provider name
    fn name(&self) -> &str;
}
