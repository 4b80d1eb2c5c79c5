use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::DockerError;
use crate::model::{
    AggregateMetrics, ContainerInfo, ImageInfo, MetricsSample, NetworkInfo, StoppedContainerInfo,
    VolumeInfo,
};

use super::AppState;

/// Engine errors rendered as `{"error": ..}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub DockerError);

impl From<DockerError> for ApiError {
    fn from(err: DockerError) -> Self {
        ApiError(err)
    }
}

pub fn error_to_status(err: &DockerError) -> StatusCode {
    match err {
        DockerError::NotFound(_) => StatusCode::NOT_FOUND,
        DockerError::Conflict(_) => StatusCode::CONFLICT,
        DockerError::InvalidName(_) | DockerError::Validation(_) => StatusCode::BAD_REQUEST,
        DockerError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        DockerError::Compose(_) | DockerError::Engine(_) | DockerError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_to_status(&self.0);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Deserialize)]
pub struct RunImageBody {
    pub image: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkBody {
    pub network_name: String,
}

#[derive(Deserialize)]
pub struct ComposeUpBody {
    pub path: PathBuf,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub aggregate: AggregateMetrics,
    pub containers: Vec<ContainerInfo>,
}

/// `GET /healthz`
pub async fn healthz(State(state): State<AppState>) -> Response {
    match state.client.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(_) => ApiError(DockerError::Unavailable).into_response(),
    }
}

/// `GET /api/containers/running`
pub async fn list_running(State(state): State<AppState>) -> ApiResult<Vec<ContainerInfo>> {
    Ok(Json(state.client.list_running().await?))
}

/// `GET /api/containers/stopped`
pub async fn list_stopped(State(state): State<AppState>) -> ApiResult<Vec<StoppedContainerInfo>> {
    Ok(Json(state.client.list_stopped().await?))
}

/// `POST /api/containers/{id}/start`
pub async fn start_container(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    state.client.start_container(&id).await?;
    info!(container_id = %id, "started via api");
    Ok(Json(json!({ "id": id })))
}

/// `POST /api/containers/{id}/stop`
pub async fn stop_container(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    state.client.stop_container(&id).await?;
    info!(container_id = %id, "stopped via api");
    Ok(Json(json!({ "id": id })))
}

/// `DELETE /api/containers/{id}`
pub async fn remove_container(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    state.client.remove_container(&id).await?;
    info!(container_id = %id, "removed via api");
    Ok(Json(json!({ "id": id })))
}

/// `GET /api/images`
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Vec<ImageInfo>> {
    Ok(Json(state.client.list_images().await?))
}

/// `POST /api/images/run`
pub async fn run_image(State(state): State<AppState>, Json(body): Json<RunImageBody>) -> ApiResult<Value> {
    let image = body.image.trim();
    if image.is_empty() {
        return Err(DockerError::Validation("Please choose an image to run.".to_string()).into());
    }
    let id = state.client.run_image(image).await?;
    Ok(Json(json!({ "id": id })))
}

/// `DELETE /api/images/{*reference}`; references may contain `/`.
pub async fn remove_image(State(state): State<AppState>, Path(reference): Path<String>) -> ApiResult<Value> {
    state.client.remove_image(&reference).await?;
    Ok(Json(json!({ "image": reference })))
}

/// `GET /api/networks`
pub async fn list_networks(State(state): State<AppState>) -> ApiResult<Vec<NetworkInfo>> {
    Ok(Json(state.client.list_networks().await?))
}

/// `POST /api/networks`
pub async fn create_network(
    State(state): State<AppState>,
    Json(body): Json<CreateNetworkBody>,
) -> ApiResult<Value> {
    let hash = state.client.create_network(body.network_name.trim()).await?;
    Ok(Json(json!({ "hash": hash })))
}

/// `GET /api/networks/{name}`
pub async fn inspect_network(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<NetworkInfo> {
    Ok(Json(state.client.inspect_network(&name).await?))
}

/// `DELETE /api/networks/{name}`
pub async fn remove_network(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Value> {
    state.client.remove_network(&name).await?;
    Ok(Json(json!({ "hash": name })))
}

/// `GET /api/volumes`, each volume with the containers that mount it.
pub async fn list_volumes(State(state): State<AppState>) -> ApiResult<Vec<VolumeInfo>> {
    Ok(Json(state.client.list_volumes().await?))
}

/// `POST /api/compose/up`
pub async fn compose_up(
    State(state): State<AppState>,
    Json(body): Json<ComposeUpBody>,
) -> ApiResult<Vec<NetworkInfo>> {
    Ok(Json(state.client.compose_up(&body.path).await?))
}

/// `GET /api/metrics`
pub async fn metrics(State(state): State<AppState>) -> ApiResult<MetricsResponse> {
    let containers = state.client.list_running().await?;
    let aggregate = crate::stats::aggregate(&containers);
    Ok(Json(MetricsResponse { aggregate, containers }))
}

/// `GET /api/metrics/history`
pub async fn metrics_history(State(state): State<AppState>) -> Json<Vec<MetricsSample>> {
    let history = state.history.read().await;
    Json(history.samples.iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_statuses() {
        assert_eq!(error_to_status(&DockerError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(error_to_status(&DockerError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(error_to_status(&DockerError::InvalidName("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_status(&DockerError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_status(&DockerError::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            error_to_status(&DockerError::Compose("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn error_body_carries_message() {
        let resp = ApiError(DockerError::Validation("Please enter a network name.".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Please enter a network name.");
    }

    #[test]
    fn create_network_body_uses_camel_case() {
        let body: CreateNetworkBody = serde_json::from_str(r#"{"networkName":"backend"}"#).unwrap();
        assert_eq!(body.network_name, "backend");
        assert!(serde_json::from_str::<CreateNetworkBody>(r#"{"network_name":"x"}"#).is_err());
    }
}
