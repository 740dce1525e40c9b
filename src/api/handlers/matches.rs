//! Match lifecycle handlers: create, list, inspect, transition, outcome.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateMatchRequest, MatchViewDto, MyMatchesResponse, SubmitOutcomeRequest, UpdateStatusRequest,
};
use crate::app_state::AppState;
use crate::domain::{DogId, MatchId, MatchStatus, OutcomeKind};
use crate::error::{ErrorResponse, MatchError};
use crate::service::OutcomeSubmission;

/// `POST /matches` — Create a match request between two dogs.
///
/// The actor must own the requester dog; the requested party is resolved
/// from the requested dog's owner.
///
/// # Errors
///
/// Returns [`MatchError::Validation`] on self-pairs, same-owner pairs,
/// hidden or incompatible targets, and duplicate open requests.
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    tag = "Matches",
    summary = "Create a match request",
    description = "Opens a pending match request from the actor's dog to another owner's dog. The pairing must score above zero and no open request may already exist between the two dogs in either direction.",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match request created", body = MatchViewDto),
        (status = 400, description = "Invalid pairing", body = ErrorResponse),
        (status = 403, description = "Actor does not own the requester dog", body = ErrorResponse),
        (status = 404, description = "Dog not found", body = ErrorResponse),
    )
)]
pub async fn create_match(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateMatchRequest>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;

    let view = state
        .match_service
        .create_match(
            actor,
            DogId::from_uuid(req.requester_dog_id),
            DogId::from_uuid(req.requested_dog_id),
            req.contact_id,
            req.notes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MatchViewDto::from(view))))
}

/// `GET /matches/mine` — The actor's matches, grouped and summarized.
///
/// # Errors
///
/// Returns [`MatchError::Authorization`] when the actor header is missing.
#[utoipa::path(
    get,
    path = "/api/v1/matches/mine",
    tag = "Matches",
    summary = "List my matches",
    description = "Returns every match involving the acting user, most recently changed first, grouped into pending, awaiting confirmation, and history, with status tallies.",
    responses(
        (status = 200, description = "Grouped matches", body = MyMatchesResponse),
        (status = 403, description = "Missing or malformed actor header", body = ErrorResponse),
    )
)]
pub async fn my_matches(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;

    let (groups, counts) = state.match_service.my_matches(actor).await?;

    Ok(Json(MyMatchesResponse::from_groups(groups, counts)))
}

/// `GET /matches/:id` — A single match from the actor's perspective.
///
/// # Errors
///
/// Returns [`MatchError::MatchNotFound`] when the match does not exist or
/// the actor is not a participant.
#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}",
    tag = "Matches",
    summary = "Get a match",
    description = "Participants only. Non-participants receive the same not-found response as for a missing match.",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    responses(
        (status = 200, description = "Match details", body = MatchViewDto),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn get_match(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;

    let view = state
        .match_service
        .match_view(actor, MatchId::from_uuid(id))
        .await?;

    Ok(Json(MatchViewDto::from(view)))
}

/// `POST /matches/:id/status` — Transition a match to a new status.
///
/// # Errors
///
/// Returns [`MatchError::InvalidStatus`] on an unrecognized status string,
/// [`MatchError::Authorization`] when the actor's role may not perform the
/// transition, and [`MatchError::StateConflict`] when the current status
/// does not permit it.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/status",
    tag = "Matches",
    summary = "Update match status",
    description = "Applies one lifecycle transition: the requested party accepts or declines a pending request, the requester cancels an open one, and either participant reports the meeting happened on an accepted one. Completed statuses are reserved for outcome submission.",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated match", body = MatchViewDto),
        (status = 400, description = "Unrecognized status string", body = ErrorResponse),
        (status = 403, description = "Actor may not perform this transition", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 409, description = "Current status does not permit the transition", body = ErrorResponse),
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;
    let target = parse_match_status(&req.status)?;

    let view = state
        .match_service
        .update_status(actor, MatchId::from_uuid(id), target, req.note)
        .await?;

    Ok(Json(MatchViewDto::from(view)))
}

/// `POST /matches/:id/outcome` — Record the verified outcome of a meeting.
///
/// # Errors
///
/// Returns [`MatchError::InvalidOutcome`] on an unrecognized outcome
/// string and [`MatchError::Authorization`] when the verifying dog is not
/// the actor's female participant.
#[utoipa::path(
    post,
    path = "/api/v1/matches/{id}/outcome",
    tag = "Matches",
    summary = "Submit a match outcome",
    description = "Finalizes a match that is awaiting confirmation. Only the owner of the female participant may submit, exactly once; success moves the match to completed_success and anything else to completed_failed.",
    params(
        ("id" = uuid::Uuid, Path, description = "Match UUID"),
    ),
    request_body = SubmitOutcomeRequest,
    responses(
        (status = 200, description = "Finalized match", body = MatchViewDto),
        (status = 400, description = "Unrecognized outcome string", body = ErrorResponse),
        (status = 403, description = "Actor may not verify this outcome", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 409, description = "Match is not awaiting confirmation", body = ErrorResponse),
    )
)]
pub async fn submit_outcome(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SubmitOutcomeRequest>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;
    let outcome = parse_outcome_kind(&req.outcome)?;

    let view = state
        .match_service
        .submit_outcome(
            actor,
            MatchId::from_uuid(id),
            OutcomeSubmission {
                verified_by_dog_id: DogId::from_uuid(req.verified_by_dog_id),
                outcome,
                litter_size: req.litter_size,
                notes: req.notes,
            },
        )
        .await?;

    Ok(Json(MatchViewDto::from(view)))
}

/// Match lifecycle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches", post(create_match))
        .route("/matches/mine", get(my_matches))
        .route("/matches/{id}", get(get_match))
        .route("/matches/{id}/status", post(update_status))
        .route("/matches/{id}/outcome", post(submit_outcome))
}

// ── Status Parsing Helpers ──────────────────────────────────────────────

/// Parses a lifecycle status string, case-insensitively.
fn parse_match_status(value: &str) -> Result<MatchStatus, MatchError> {
    MatchStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| MatchError::InvalidStatus(value.to_string()))
}

/// Parses an outcome string, case-insensitively.
fn parse_outcome_kind(value: &str) -> Result<OutcomeKind, MatchError> {
    [OutcomeKind::Success, OutcomeKind::Failed, OutcomeKind::NoShow]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| MatchError::InvalidOutcome(value.to_string()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn every_status_string_parses_back() {
        for status in MatchStatus::ALL {
            let Ok(parsed) = parse_match_status(status.as_str()) else {
                panic!("status {status:?} did not parse");
            };
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_parsing_ignores_case() {
        assert_eq!(
            parse_match_status("Awaiting_Confirmation").ok(),
            Some(MatchStatus::AwaitingConfirmation)
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = parse_match_status("paused");
        assert!(matches!(result, Err(MatchError::InvalidStatus(_))));
    }

    #[test]
    fn outcome_strings_parse_back() {
        assert_eq!(parse_outcome_kind("success").ok(), Some(OutcomeKind::Success));
        assert_eq!(parse_outcome_kind("failed").ok(), Some(OutcomeKind::Failed));
        assert_eq!(parse_outcome_kind("no_show").ok(), Some(OutcomeKind::NoShow));
    }

    #[test]
    fn unknown_outcome_is_rejected() {
        let result = parse_outcome_kind("maybe");
        assert!(matches!(result, Err(MatchError::InvalidOutcome(_))));
    }
}
