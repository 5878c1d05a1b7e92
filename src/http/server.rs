//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health query and the fallback handler
//! - Wire up middleware (tracing, request ID)
//! - Serve over plain TCP or TLS until shutdown is signalled

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::health::SnapshotHandle;
use crate::http::response::deny_handler;

/// Grace period for in-flight TLS connections on shutdown.
const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotHandle,
}

/// HTTP server exposing the aggregated cluster state.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(snapshots: SnapshotHandle) -> Self {
        let router = Self::build_router(AppState { snapshots });
        Self { router }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(health_handler))
            .fallback(deny_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The configured router, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP on `listener` until shutdown.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until shutdown.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let stopper = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            stopper.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Serve the latest snapshot with the health code as HTTP status.
async fn health_handler(State(state): State<AppState>) -> Response {
    match state.snapshots.snapshot() {
        Ok(snapshot) => {
            let status = StatusCode::from_u16(snapshot.health_code).unwrap_or(StatusCode::OK);
            (status, Json(snapshot.as_ref())).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health query rejected");
            (
                StatusCode::NOT_IMPLEMENTED,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_swap::ArcSwap;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use std::sync::Arc;
    use tower::ServiceExt;
    use crate::health::state::{ClusterState, Measurement};
    use crate::health::verdict::Verdict;

    fn server_with(state: ClusterState, use_cached_results: bool) -> HttpServer {
        let current = Arc::new(ArcSwap::from_pointee(state));
        HttpServer::new(SnapshotHandle::new(current, use_cached_results))
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_status_matches_code() {
        let mut state = ClusterState::new(1);
        let mut m = Measurement::new(0, Some("db".to_string()));
        m.total = 1;
        m.failed = 1;
        m.verdict = Verdict::Failed;
        m.verdict_code = 500;
        state.merge(m).unwrap();
        state.health_code = 503;

        let response = server_with(state, true)
            .router()
            .oneshot(request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key("x-request-id"));
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let parsed: ClusterState = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.health_code, 503);
        assert_eq!(parsed.servers[0].as_ref().unwrap().verdict, Verdict::Failed);
    }

    #[tokio::test]
    async fn test_on_demand_returns_not_implemented() {
        let response = server_with(ClusterState::new(1), false)
            .router()
            .oneshot(request(Method::GET, "/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_unknown_get_redirects_home() {
        let response = server_with(ClusterState::new(1), true)
            .router()
            .oneshot(request(Method::GET, "/admin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_unknown_post_is_denied() {
        let response = server_with(ClusterState::new(1), true)
            .router()
            .oneshot(request(Method::POST, "/admin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().contains_key("x-powered-by"));
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .split(", ")
            .collect::<Vec<_>>();
        for name in ["Authorization", "Access-Key", "API-usr", "Token", "ref-key", "lu-key"] {
            assert!(allowed.contains(&name), "{name} not allowed");
        }
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"403: Access denied");
    }
}
