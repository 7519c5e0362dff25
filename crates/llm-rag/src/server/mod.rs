//! HTTP server for the RAG system

pub mod routes;
pub mod state;

use axum::{
    body::HttpBody,
    extract::ConnectInfo,
    http::{header, Request, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::rag::build_rag_service;
use state::AppState;

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new RAG server, connecting the configured backend
    pub async fn new(config: RagConfig) -> Result<Self> {
        let rag = build_rag_service(&config).await?;
        Ok(Self {
            config,
            state: AppState::new(rag),
        })
    }

    /// Create from an already built state
    pub fn with_state(config: RagConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start the server and serve until shutdown
    ///
    /// The backend is closed after the listener stops.
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::config(format!("Invalid address: {}", e)))?;

        let router = router(self.state.clone());

        tracing::info!(log_type = "application", "Starting server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::config(format!("Failed to bind: {}", e)))?;

        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server error: {}", e)));

        self.state.rag().close().await;
        tracing::info!(log_type = "application", "Server stopped");
        served
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(routes::api_routes())
        .with_state(state);
    with_middleware(app)
}

/// Wrap a router with panic recovery and access logging
///
/// Access logging is outermost so recovered panics are logged as 500s.
pub fn with_middleware(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(panic_response)).layer(
        TraceLayer::new_for_http()
            .make_span_with(AccessSpan)
            .on_request(())
            .on_response(AccessLog)
            .on_failure(()),
    )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(log_type = "application", "Panic recovered: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Span carrying the request fields of the access log
#[derive(Clone, Copy)]
struct AccessSpan;

impl<B> MakeSpan<B> for AccessSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::info_span!(
            "request",
            log_type = "access",
            request_on = %chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            method = %request.method(),
            path = %request.uri().path(),
            params = request.uri().query().unwrap_or_default(),
            remote_addr = %remote_addr,
        )
    }
}

/// One access log line per response: ERROR for 5xx, INFO otherwise
#[derive(Clone, Copy)]
struct AccessLog;

impl<B: HttpBody> OnResponse<B> for AccessLog {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status().as_u16();
        let duration = latency.as_millis() as u64;
        let content_length = content_length(response);
        if response.status().is_server_error() {
            tracing::error!(log_type = "access", status, content_length, duration, "request failed");
        } else {
            tracing::info!(log_type = "access", status, content_length, duration, "request completed");
        }
    }
}

/// Response body size: the header when set, else the exact body size hint, else 0
fn content_length<B: HttpBody>(response: &Response<B>) -> u64 {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| response.body().size_hint().exact())
        .unwrap_or(0)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(log_type = "application", "Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(log_type = "application", "Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!(log_type = "application", "Shutdown signal received");
}
