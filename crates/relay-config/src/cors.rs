use std::time::Duration;

use serde::Deserialize;

/// Methods advertised when no explicit list is configured
const DEFAULT_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "OPTIONS"];

/// Request headers advertised when no explicit list is configured
const DEFAULT_HEADERS: &[&str] = &["Origin", "X-Requested-With", "Content-Type", "Accept", "Authorization"];

/// CORS configuration
///
/// Defaults to a permissive policy: any origin, the common verbs and
/// the headers browsers send with form uploads.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (wildcard "*" or explicit list)
    #[serde(default)]
    pub origins: AnyOrArray,
    /// Allowed HTTP methods (wildcard "*" or explicit list)
    #[serde(default = "default_methods")]
    pub methods: AnyOrArray,
    /// Allowed headers (wildcard "*" or explicit list)
    #[serde(default = "default_headers")]
    pub headers: AnyOrArray,
    /// Headers to expose to the browser
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: AnyOrArray::Any,
            methods: default_methods(),
            headers: default_headers(),
            expose_headers: Vec::new(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

fn default_methods() -> AnyOrArray {
    AnyOrArray::from_strs(DEFAULT_METHODS)
}

fn default_headers() -> AnyOrArray {
    AnyOrArray::from_strs(DEFAULT_HEADERS)
}

/// Either a wildcard "*" or explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAnyOrArray")]
pub enum AnyOrArray {
    /// Match any value
    #[default]
    Any,
    /// Explicit list
    List(Vec<String>),
}

impl AnyOrArray {
    fn from_strs(values: &[&str]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }

    /// Render as a single header value (`*` or a comma-separated list)
    pub fn header_value(&self) -> String {
        match self {
            Self::Any => "*".to_string(),
            Self::List(values) => values.join(", "),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnyOrArray {
    One(String),
    Many(Vec<String>),
}

impl From<RawAnyOrArray> for AnyOrArray {
    fn from(raw: RawAnyOrArray) -> Self {
        let values = match raw {
            RawAnyOrArray::One(value) => vec![value],
            RawAnyOrArray::Many(values) => values,
        };

        // A "*" anywhere in the list widens it to a wildcard
        if values.iter().any(|v| v == "*") {
            Self::Any
        } else {
            Self::List(values)
        }
    }
}
