/// HTTP endpoint for Prometheus scrapes
///
/// Renders whatever the metric store holds at request time. No caching.
///
/// Endpoints:
/// - GET /metrics - Gauges in the OpenMetrics text format
/// - GET /health - Service health check

use crate::monitor::MetricStore;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{error, info, warn};

pub const METRICS_PATH: &str = "/metrics";
pub const HEALTH_PATH: &str = "/health";

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Transport-independent response, converted to a tiny_http response at the
/// edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn json(status: u16, json: serde_json::Value) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            body: json.to_string(),
        }
    }
}

/// Route one request. The query string is ignored.
pub fn route(store: &MetricStore, method: &Method, url: &str) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    if *method != Method::Get {
        return Reply::json(
            405,
            serde_json::json!({ "error": "Method not allowed", "allowed": ["GET"] }),
        );
    }

    match path {
        METRICS_PATH => handle_metrics(store),
        HEALTH_PATH => handle_health(),
        _ => Reply::json(
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": [METRICS_PATH, HEALTH_PATH]
            }),
        ),
    }
}

/// Handle /metrics endpoint
fn handle_metrics(store: &MetricStore) -> Reply {
    match store.render() {
        Ok(body) => Reply {
            status: 200,
            content_type: OPENMETRICS_CONTENT_TYPE,
            body,
        },
        Err(e) => {
            error!(error = %e, "Rendering metrics failed");
            Reply {
                status: 500,
                content_type: TEXT_CONTENT_TYPE,
                body: e.to_string(),
            }
        }
    }
}

/// Handle /health endpoint
fn handle_health() -> Reply {
    Reply::json(
        200,
        serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

fn into_response(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    let response =
        Response::from_data(reply.body.into_bytes()).with_status_code(StatusCode(reply.status));

    match Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Bound HTTP listener serving the metric store.
pub struct Exporter {
    server: Server,
    store: Arc<MetricStore>,
}

impl Exporter {
    /// Bind `addr`. Port 0 picks a free port; see `local_addr`.
    pub fn bind(addr: SocketAddr, store: Arc<MetricStore>) -> Result<Self, ListenError> {
        let server = Server::http(addr).map_err(|source| ListenError::Bind { addr, source })?;

        Ok(Self { server, store })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Handle requests until the listener shuts down.
    pub fn serve(&self) {
        if let Some(addr) = self.local_addr() {
            info!(%addr, "Listening on http://{}{}", addr, METRICS_PATH);
        }

        for request in self.server.incoming_requests() {
            let reply = route(&self.store, request.method(), request.url());
            if reply.status >= 400 {
                warn!(method = %request.method(), url = request.url(), status = reply.status, "Request rejected");
            }

            if let Err(e) = request.respond(into_response(reply)) {
                warn!(error = %e, "Failed to send response");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
