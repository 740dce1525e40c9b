//! System endpoints: health check and the breed-group catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::{breeds_in_group, ALL_BREED_GROUPS};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One breed group and its member breeds.
#[derive(Debug, Serialize, ToSchema)]
struct BreedGroupInfo {
    group: &'static str,
    breeds: Vec<&'static str>,
}

/// `GET /config/breed-groups` — The breed-group catalog the scorer uses.
#[utoipa::path(
    get,
    path = "/config/breed-groups",
    tag = "System",
    summary = "List breed groups",
    description = "Returns every breed group and its member breeds. Two different breeds in the same group earn a partial breed-compatibility bonus.",
    responses(
        (status = 200, description = "Breed group catalog", body = Vec<BreedGroupInfo>),
    )
)]
pub async fn breed_groups_handler() -> impl IntoResponse {
    let groups: Vec<BreedGroupInfo> = ALL_BREED_GROUPS
        .into_iter()
        .map(|group| BreedGroupInfo {
            group: group.as_str(),
            breeds: breeds_in_group(group),
        })
        .collect();
    (StatusCode::OK, Json(groups))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/breed-groups", get(breed_groups_handler))
}
