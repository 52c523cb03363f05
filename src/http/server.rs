//! HTTP server setup and the forwarding handler.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (CORS attachment, tracing, timeout)
//! - Forward GET/POST/PUT/DELETE to the fixed upstream
//! - Answer OPTIONS preflight locally with 204, never contacting upstream
//! - Map transport failures to an explicit 502 Bad Gateway
//! - Observability (request logs, metrics)

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::cors;
use crate::http::forward::{self, ForwardError};
use crate::observability::metrics;

const DEFAULT_CONTENT_TYPE: HeaderValue = HeaderValue::from_static("application/json");

/// Application state injected into handlers.
///
/// Cloned per request; holds only the client handle and immutable
/// configuration, so requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream_base: String,
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            client,
            // Trailing slash trimmed so base + "/path" stays verbatim.
            upstream_base: config.upstream.base_url.trim_end_matches('/').to_string(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The CORS layer is outermost so every response carries the header
    /// set, including timeouts and method-not-allowed fallbacks.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let methods = || {
            get(proxy_handler)
                .post(proxy_handler)
                .put(proxy_handler)
                .delete(proxy_handler)
                .options(preflight_handler)
        };

        Router::new()
            .route("/{*path}", methods())
            .route("/", methods())
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::map_response(cors::attach_cors))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            "CORS proxy running on http://{} -> {}",
            addr,
            self.config.upstream.base_url
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler for GET/POST/PUT/DELETE.
///
/// Relays the upstream response whether its status is a success or an
/// HTTP-level error; only transport failures produce a local 502.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    // `routing::get` also matches HEAD, which is outside the supported
    // method set; reject it here so it is never forwarded.
    if request.method() == Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let start_time = Instant::now();
    let method = request.method().clone();
    let method_str = method.to_string();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    tracing::debug!(
        method = %method,
        path = %path_and_query,
        "forwarding request"
    );

    match forward_to_upstream(&state, request, &path_and_query).await {
        Ok(response) => {
            metrics::record_request(&method_str, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                method = %method,
                path = %path_and_query,
                error = %e,
                "upstream transfer failed"
            );
            metrics::record_request(&method_str, 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Transfer one request to the upstream and buffer the full response.
async fn forward_to_upstream(
    state: &AppState,
    request: Request<Body>,
    path_and_query: &str,
) -> Result<Response, ForwardError> {
    let (parts, body) = request.into_parts();

    let body_bytes = if forward::should_read_body(&parts.method, &parts.headers) {
        Some(
            axum::body::to_bytes(body, usize::MAX)
                .await
                .map_err(ForwardError::BodyRead)?,
        )
    } else {
        None
    };

    let outbound = forward::build_upstream_request(
        &state.upstream_base,
        parts.method,
        path_and_query,
        &parts.headers,
        body_bytes,
    )?;

    let upstream = state.client.request(outbound).await?;
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    let body = axum::body::to_bytes(Body::new(upstream.into_body()), usize::MAX)
        .await
        .map_err(ForwardError::BodyRead)?;

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))?;
    Ok(response)
}

/// Preflight handler: 204, empty body, no upstream call.
///
/// CORS headers are attached by the outer layer like every other response.
async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
