use axum::body::Bytes;
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

/// Envelope version reported to callers
pub const ENVELOPE_VERSION: &str = "1.0";

/// Fields recognized in an inbound multipart submission
///
/// Every field is optional; absent values are relayed as JSON null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionForm {
    /// Remote audio location for the upstream to fetch
    pub url: Option<String>,
    /// Model identifier (e.g. "nova-2")
    pub model: Option<String>,
    /// Model tier (e.g. "enhanced")
    pub tier: Option<String>,
    /// Extra upstream options, decoded from a JSON object
    pub features: Option<Map<String, Value>>,
    /// Uploaded audio, byte-exact
    pub file: Option<Bytes>,
}

impl TranscriptionForm {
    /// Shape the outbound request
    ///
    /// Uploaded audio takes priority over `url`. With audio, `model`, `tier`
    /// and each feature travel as query parameters since the body is taken
    /// by the raw bytes. A feature named `model` or `tier` is only sent when
    /// the form field of that name is absent.
    pub fn upstream_request(&self) -> UpstreamRequest {
        match &self.file {
            Some(audio) => UpstreamRequest::Audio {
                audio: audio.clone(),
                query: self.query_pairs(),
            },
            None => UpstreamRequest::Json(JsonRequest {
                model: self.model.clone(),
                url: self.url.clone(),
                tier: self.tier.clone(),
                features: self.features.clone(),
            }),
        }
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(model) = &self.model {
            pairs.push(("model".to_string(), model.clone()));
        }

        if let Some(tier) = &self.tier {
            pairs.push(("tier".to_string(), tier.clone()));
        }

        for (key, value) in self.features.iter().flatten() {
            // Form fields win over same-named features
            let shadowed = match key.as_str() {
                "model" => self.model.is_some(),
                "tier" => self.tier.is_some(),
                _ => false,
            };

            if shadowed {
                tracing::debug!(feature = %key, "ignoring feature shadowed by form field");
                continue;
            }

            push_feature(&mut pairs, key, value);
        }

        pairs
    }
}

/// Flatten one feature into query pairs
///
/// Arrays repeat the key, nulls are dropped, nested objects are sent as
/// JSON text.
fn push_feature(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(_) => pairs.push((key.to_string(), item.to_string())),
                    _ => push_feature(pairs, key, item),
                }
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => pairs.push((key.to_string(), value.to_string())),
    }
}

/// Request sent to the transcription API
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamRequest {
    /// Raw audio body (`audio/wav`) with options in the query string
    Audio { audio: Bytes, query: Vec<(String, String)> },
    /// JSON body pointing the upstream at a remote URL
    Json(JsonRequest),
}

/// JSON body for URL transcription
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRequest {
    pub model: Option<String>,
    pub url: Option<String>,
    pub tier: Option<String>,
    pub features: Option<Map<String, Value>>,
}

/// Parsed reply from the transcription API
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// Status the upstream answered with, relayed unchanged
    pub status: StatusCode,
    /// Response body, treated opaquely
    pub body: Value,
}

/// Relay response wrapping the upstream reply with the request parameters
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub model: Option<String>,
    pub version: &'static str,
    pub tier: Option<String>,
    #[serde(rename = "dgFeatures")]
    pub dg_features: Option<Map<String, Value>>,
    pub transcription: Value,
}

impl Envelope {
    /// Echo the request-time fields around the upstream body
    pub fn new(form: TranscriptionForm, transcription: Value) -> Self {
        Self {
            model: form.model,
            version: ENVELOPE_VERSION,
            tier: form.tier,
            dg_features: form.features,
            transcription,
        }
    }
}
