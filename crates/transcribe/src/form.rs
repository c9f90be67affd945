use axum::{
    body::Body,
    extract::{FromRequest, Multipart, multipart::MultipartError},
};
use http::StatusCode;
use serde_json::{Map, Value};

use crate::{error::RelayError, types::TranscriptionForm};

/// Extractor for the relay's multipart submission
///
/// Parsing is permissive: a missing or non-multipart body, a broken part,
/// or an unreadable field ends parsing with whatever was collected so far.
/// Only an oversized body rejects the request.
pub struct ExtractForm(pub TranscriptionForm);

impl<S> FromRequest<S> for ExtractForm
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(request: http::Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = match Multipart::from_request(request, state).await {
            Ok(multipart) => multipart,
            Err(e) => {
                tracing::warn!("request body is not readable multipart/form-data, relaying an empty form: {e}");
                return Ok(Self(TranscriptionForm::default()));
            }
        };

        let mut form = TranscriptionForm::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    stop_or_reject(&e)?;
                    break;
                }
            };

            let name = field.name().unwrap_or("").to_string();

            let result = match name.as_str() {
                "url" => field.text().await.map(|text| form.url = non_empty(&text)),
                "model" => field.text().await.map(|text| form.model = non_empty(&text)),
                "tier" => field.text().await.map(|text| form.tier = non_empty(&text)),
                "features" => field.text().await.map(|text| form.features = parse_features(&text)),
                "file" => field.bytes().await.map(|bytes| {
                    if bytes.is_empty() {
                        tracing::debug!("ignoring empty file part");
                    } else {
                        form.file = Some(bytes);
                    }
                }),
                _ => {
                    tracing::debug!(field = %name, "skipping unrecognized form field");
                    Ok(())
                }
            };

            if let Err(e) = result {
                stop_or_reject(&e)?;
                break;
            }
        }

        tracing::debug!(
            url = ?form.url,
            model = ?form.model,
            tier = ?form.tier,
            has_features = form.features.is_some(),
            file_bytes = form.file.as_ref().map_or(0, axum::body::Bytes::len),
            "parsed transcription form"
        );

        Ok(Self(form))
    }
}

/// Reject oversized bodies, log and tolerate every other stream error
fn stop_or_reject(error: &MultipartError) -> Result<(), RelayError> {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(RelayError::PayloadTooLarge);
    }

    tracing::warn!("multipart stream ended early, relaying the fields read so far: {error}");
    Ok(())
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Decode the `features` part as a JSON object
///
/// Anything else is logged and dropped so the request still goes through.
pub(crate) fn parse_features(text: &str) -> Option<Map<String, Value>> {
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::warn!("ignoring features field: expected a JSON object, got {other}");
            None
        }
        Err(e) => {
            tracing::warn!("ignoring features field: invalid JSON: {e}");
            None
        }
    }
}
