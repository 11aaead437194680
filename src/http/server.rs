//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Compose the request-processing stages in a fixed order
//! - Bind server to listener and drain on shutdown
//!
//! # Stage Order (outermost first)
//! ```text
//! request-id → trace → propagate request-id → CORS → CORS method/header lists
//!     → strip Set-Cookie → timeout → access gate → body limit → handlers
//! ```
//! CORS sits outside the gate so that preflights are answered before any
//! credential check and rejections still carry the policy headers. The
//! timeout wraps the gate so a stalled validator is bounded too.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatekeeperConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::StartupError;
use crate::security::headers::strip_set_cookie;
use crate::security::{
    access_gate_middleware, AccessGate, AllowList, CorsPolicy, CredentialValidator,
};

/// HTTP server fronted by the access gate.
pub struct HttpServer {
    router: Router,
    config: GatekeeperConfig,
    gate: Arc<AccessGate>,
}

impl HttpServer {
    /// Create a new HTTP server using the validator named in configuration.
    pub fn new(config: GatekeeperConfig) -> Result<Self, StartupError> {
        let gate = AccessGate::from_config(&config)?;
        Self::assemble(config, gate)
    }

    /// Create a new HTTP server with a caller-supplied credential validator.
    pub fn with_validator(
        config: GatekeeperConfig,
        validator: Arc<dyn CredentialValidator>,
    ) -> Result<Self, StartupError> {
        let allow_list = AllowList::from_patterns(&config.access.allow_list)?;
        Self::assemble(config, AccessGate::new(allow_list, validator))
    }

    fn assemble(config: GatekeeperConfig, gate: AccessGate) -> Result<Self, StartupError> {
        let cors = CorsPolicy::from_config(&config.cors)?;
        let gate = Arc::new(gate);

        let exempt: Vec<&str> = gate.allow_list().patterns().iter().map(|p| p.as_str()).collect();
        tracing::info!(
            allow_list = ?exempt,
            origins = ?cors.origins(),
            methods = ?cors.methods(),
            "Access gate compiled"
        );

        let router = Self::build_router(&config, gate.clone(), &cors);
        Ok(Self {
            router,
            config,
            gate,
        })
    }

    /// Build the Axum router with all middleware stages.
    #[allow(deprecated)]
    fn build_router(config: &GatekeeperConfig, gate: Arc<AccessGate>, cors: &CorsPolicy) -> Router {
        let stages = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        request_id = %req.request_id(),
                        method = %req.method(),
                        path = %req.uri().path(),
                    )
                }),
            )
            .layer(propagate_request_id_layer())
            .layer(cors.layer())
            .layer(cors.allow_methods_layer())
            .layer(cors.allow_headers_layer())
            .layer(middleware::map_response_with_state(
                config.security.strip_set_cookie,
                strip_set_cookie,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(gate, access_gate_middleware))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size));

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/whoami", get(handlers::whoami))
            .route("/v3/api-docs", get(handlers::api_docs))
            .fallback(handlers::not_found)
            .layer(stages)
    }

    /// The fully composed router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            exempt_patterns = self.gate.allow_list().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }
}
