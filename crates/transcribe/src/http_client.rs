use std::time::Duration;

use reqwest::Client;

use crate::error::RelayError;

/// Build the pooled client used for upstream calls
///
/// Both timeouts come from configuration; expiry surfaces as
/// [`RelayError::UpstreamTimeout`]. No hop-by-hop headers are set, as
/// the upstream may negotiate HTTP/2.
pub(crate) fn http_client(timeout: Duration, connect_timeout: Duration) -> crate::error::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()
        .map_err(|e| RelayError::ConfigError(format!("failed to build HTTP client: {e}")))
}
