//! Mock Deepgram backend for integration tests
//!
//! Answers `POST /v1/listen` with a canned reply and records every request

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// One request as the upstream saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Parse the body as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("upstream body should be JSON")
    }

    /// First query value for `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Mock transcription backend with a fixed reply
pub struct MockDeepgram {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockDeepgram {
    /// Start a mock answering 200 with `body`
    pub async fn start(body: serde_json::Value) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, body.to_string(), None).await
    }

    /// Start a mock answering `status` with a raw body
    pub async fn start_with_raw(status: u16, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::from_u16(status)?, body.to_owned(), None).await
    }

    /// Start a mock that waits `delay` before answering
    pub async fn start_slow(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, "{}".to_owned(), Some(delay)).await
    }

    async fn start_inner(status: StatusCode, body: String, delay: Option<Duration>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            status,
            body,
            delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/listen", routing::post(handle_listen))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the relay's upstream
    ///
    /// Includes `/v1` since the relay appends `/listen`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The only request received, panicking if there were more or none
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockDeepgram {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_listen(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);

    let query = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    state.requests.lock().unwrap().push(RecordedRequest {
        content_type: header("content-type"),
        authorization: header("authorization"),
        accept: header("accept"),
        query,
        body,
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (state.status, state.body.clone())
}

/// Address nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    format!("http://{addr}/v1")
}
