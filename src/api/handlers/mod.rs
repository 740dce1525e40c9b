//! REST endpoint handlers organized by resource.

pub mod dogs;
pub mod matches;
pub mod system;

use axum::Router;
use axum::http::HeaderMap;

use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::MatchError;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().merge(dogs::routes()).merge(matches::routes())
}

/// Resolves the acting user from the `x-actor-id` request header.
///
/// The service does not authenticate. The upstream gateway verifies the
/// session and injects the caller's user id into this header.
fn actor_from_headers(headers: &HeaderMap) -> Result<UserId, MatchError> {
    let raw = headers
        .get("x-actor-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| MatchError::Authorization("missing x-actor-id header".to_string()))?;
    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|_| MatchError::Authorization(format!("malformed x-actor-id header: {raw}")))?;
    Ok(UserId::from_uuid(uuid))
}
