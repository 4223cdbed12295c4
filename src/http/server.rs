//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (audit outermost, then tracing, then timeout)
//! - Bind server to listener
//! - Forward requests to the upstream application

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{
        HeaderMap, HeaderValue,
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::audit::{audit_middleware, AuditSink, Auditor};
use crate::config::GatewayConfig;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
}

/// HTTP server for the audit gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server that logs audit records through `tracing`.
    pub fn new(config: GatewayConfig) -> Result<Self, InvalidUri> {
        let auditor = Auditor::from_config(&config.audit);
        Self::build(config, auditor)
    }

    /// Create a server that writes audit records to `sink`.
    pub fn with_sink(config: GatewayConfig, sink: Arc<dyn AuditSink>) -> Result<Self, InvalidUri> {
        let auditor = Auditor::new(&config.audit, sink);
        Self::build(config, auditor)
    }

    fn build(config: GatewayConfig, auditor: Auditor) -> Result<Self, InvalidUri> {
        let upstream = Authority::from_str(&config.upstream.address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState { client, upstream };
        let router = Self::build_router(&config, state, Arc::new(auditor));
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added last run first, so the auditor sees every exchange
    /// before any other handling.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState, auditor: Arc<Auditor>) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(auditor, audit_middleware))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Consume the server, returning its router.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Forward the request unchanged to the upstream.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build upstream URI");
            metrics::record_request(&method, 502, start);
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };
    parts.version = Version::HTTP_11;

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    if let Some(ip) = peer {
        append_forwarded_for(&mut parts.headers, &ip.to_string());
    }

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(upstream = %state.upstream, error = %e, "Upstream error");
            metrics::record_request(&method, 502, start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Append the peer IP to `X-Forwarded-For`, creating it if absent.
fn append_forwarded_for(headers: &mut HeaderMap, ip: &str) {
    let value = match headers.get("x-forwarded-for") {
        Some(existing) => match existing.to_str() {
            Ok(existing) => format!("{}, {}", existing, ip),
            Err(_) => ip.to_string(),
        },
        None => ip.to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert("x-forwarded-for", value);
    }
}
