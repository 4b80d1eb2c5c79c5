//! JSON backend for the browser dashboard.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::Local;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::docker::DockerClient;
use crate::error::Result;
use crate::model::{MetricsHistory, MetricsSample};
use crate::stats;

pub use handlers::{error_to_status, ApiError};

#[derive(Clone)]
pub struct AppState {
    pub client: DockerClient,
    pub history: Arc<RwLock<MetricsHistory>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/containers/running", get(handlers::list_running))
        .route("/api/containers/stopped", get(handlers::list_stopped))
        .route("/api/containers/{id}/start", post(handlers::start_container))
        .route("/api/containers/{id}/stop", post(handlers::stop_container))
        .route("/api/containers/{id}", delete(handlers::remove_container))
        .route("/api/images", get(handlers::list_images))
        .route("/api/images/run", post(handlers::run_image))
        .route("/api/images/{*reference}", delete(handlers::remove_image))
        .route("/api/networks", get(handlers::list_networks).post(handlers::create_network))
        .route(
            "/api/networks/{name}",
            get(handlers::inspect_network).delete(handlers::remove_network),
        )
        .route("/api/volumes", get(handlers::list_volumes))
        .route("/api/compose/up", post(handlers::compose_up))
        .route("/api/metrics", get(handlers::metrics))
        .route("/api/metrics/history", get(handlers::metrics_history))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Push one aggregate sample per tick until the process exits.
async fn sample_metrics(
    client: DockerClient,
    history: Arc<RwLock<MetricsHistory>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match client.list_running().await {
            Ok(running) => {
                let aggregate = stats::aggregate(&running);
                history.write().await.push(MetricsSample {
                    time: Local::now().format("%H:%M:%S").to_string(),
                    cpu_percent: aggregate.cpu_percent,
                    memory_percent: aggregate.memory_percent,
                });
            }
            Err(e) => warn!(error = %e, "metrics sample failed"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, interval: Duration, history_capacity: usize) -> Result<()> {
    let client = DockerClient::connect()?;
    if !client.is_available().await {
        warn!("Docker daemon not reachable; requests will fail until it is");
    }

    let history = Arc::new(RwLock::new(MetricsHistory::new(history_capacity)));
    let sampler = tokio::spawn(sample_metrics(client.clone(), Arc::clone(&history), interval));

    let app = router(AppState { client, history });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "dockdash serve listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sampler.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    // The client connects lazily, so routing and body checks need no daemon.
    fn app() -> Router {
        router(AppState {
            client: DockerClient::connect().unwrap(),
            history: Arc::new(RwLock::new(MetricsHistory::new(3))),
        })
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn network_body_must_be_camel_case() {
        let req = json_request(Method::POST, "/api/networks", r#"{"network_name":"backend"}"#);
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn empty_image_is_rejected_before_the_engine() {
        let req = json_request(Method::POST, "/api/images/run", r#"{"image":"  "}"#);
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Please choose an image to run.");
    }

    #[tokio::test]
    async fn image_references_with_slashes_reach_the_handler() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/api/images/registry.local/team/app:1.0")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        // An unmatched route would answer with an empty body.
        assert!(!resp.status().is_success());
        assert!(body_json(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn history_starts_empty() {
        let req = Request::builder().uri("/api/metrics/history").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn history_reports_pushed_samples() {
        let history = Arc::new(RwLock::new(MetricsHistory::new(3)));
        history.write().await.push(MetricsSample {
            time: "12:00:00".into(),
            cpu_percent: 12.5,
            memory_percent: 40.0,
        });
        let app = router(AppState { client: DockerClient::connect().unwrap(), history });
        let req = Request::builder().uri("/api/metrics/history").body(Body::empty()).unwrap();
        let body = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(body[0]["time"], "12:00:00");
        assert_eq!(body[0]["cpu_percent"], 12.5);
    }
}
