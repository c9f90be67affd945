mod access_log;
mod cors;

use std::net::SocketAddr;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::StatusCode;
use relay_config::Config;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the relay's upstream client cannot be built
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address_or_default();

        let relay_state = transcribe::build_server(config)?;

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(
                &config.server.health.path,
                axum::routing::get(|| async { (StatusCode::OK, "ok") }),
            );
        }

        // Relay route
        app = app.merge(transcribe::endpoint_router().with_state(relay_state));

        // Apply middleware layers (innermost first)

        // Multipart bodies are buffered up to this size
        app = app.layer(DefaultBodyLimit::max(config.server.body_limit));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS, preflight answers included
        app = app.layer(cors::cors_layer(&config.server.cors));

        // Allowed methods/headers on every other response
        for layer in cors::advertise_layers(&config.server.cors) {
            app = app.layer(layer);
        }

        // Access log (outermost, so it sees the final status)
        app = app.layer(axum::middleware::from_fn(access_log::access_log_middleware));

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Replace the configured listen address
    #[must_use]
    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
