//! Dog profile handlers: register, list, get, visibility, candidates.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    CandidateDto, CandidateListResponse, CandidateQuery, DogListResponse, DogProfileDto,
    RegisterDogRequest, ScoreBreakdownDto, VisibilityRequest,
};
use crate::app_state::AppState;
use crate::domain::{DogAttributes, DogId, Gender, SizeClass, Temperament};
use crate::error::{ErrorResponse, MatchError};

/// `POST /dogs` — Register a new dog profile.
///
/// # Errors
///
/// Returns [`MatchError::Validation`] on a blank name, out-of-range age,
/// non-positive weight, or an unrecognized gender or size string.
#[utoipa::path(
    post,
    path = "/api/v1/dogs",
    tag = "Dogs",
    summary = "Register a dog",
    description = "Creates a breeding profile owned by the acting user. Only the name is required; attributes may be filled in later and missing ones simply contribute nothing to compatibility scores.",
    request_body = RegisterDogRequest,
    responses(
        (status = 201, description = "Dog registered", body = DogProfileDto),
        (status = 400, description = "Invalid attributes", body = ErrorResponse),
        (status = 403, description = "Missing or malformed actor header", body = ErrorResponse),
    )
)]
pub async fn register_dog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterDogRequest>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;
    let attributes = parse_dog_attributes(&req)?;

    let profile = state
        .dog_service
        .register_dog(actor, &req.name, attributes)
        .await?;

    Ok((StatusCode::CREATED, Json(DogProfileDto::from(&profile))))
}

/// `GET /dogs` — List the acting user's own dogs.
///
/// # Errors
///
/// Returns [`MatchError::Authorization`] when the actor header is missing.
#[utoipa::path(
    get,
    path = "/api/v1/dogs",
    tag = "Dogs",
    summary = "List my dogs",
    description = "Returns every profile owned by the acting user, oldest first.",
    responses(
        (status = 200, description = "The actor's dogs", body = DogListResponse),
        (status = 403, description = "Missing or malformed actor header", body = ErrorResponse),
    )
)]
pub async fn list_my_dogs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;

    let mut profiles = state.dog_service.list_my_dogs(actor).await;
    profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let data: Vec<DogProfileDto> = profiles.iter().map(DogProfileDto::from).collect();
    let total = data.len();

    Ok(Json(DogListResponse { data, total }))
}

/// `GET /dogs/:id` — Fetch a single profile.
///
/// Hidden profiles stay reachable for their owner and report not-found to
/// everyone else.
///
/// # Errors
///
/// Returns [`MatchError::DogNotFound`] if the dog does not exist or is
/// hidden from the actor.
#[utoipa::path(
    get,
    path = "/api/v1/dogs/{id}",
    tag = "Dogs",
    summary = "Get a dog profile",
    description = "Returns the full profile including breeding statistics. Hidden dogs are visible to their owner only.",
    params(
        ("id" = uuid::Uuid, Path, description = "Dog UUID"),
    ),
    responses(
        (status = 200, description = "Dog profile", body = DogProfileDto),
        (status = 404, description = "Dog not found", body = ErrorResponse),
    )
)]
pub async fn get_dog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;
    let dog_id = DogId::from_uuid(id);

    let profile = state.dog_service.get_dog(dog_id).await?;
    if !profile.visible && profile.owner_id != actor {
        return Err(MatchError::DogNotFound(dog_id));
    }

    Ok(Json(DogProfileDto::from(&profile)))
}

/// `PATCH /dogs/:id/visibility` — Show or hide a dog in candidate listings.
///
/// # Errors
///
/// Returns [`MatchError::Authorization`] when the actor does not own the
/// dog.
#[utoipa::path(
    patch,
    path = "/api/v1/dogs/{id}/visibility",
    tag = "Dogs",
    summary = "Toggle dog visibility",
    description = "Owner-only. Hidden dogs never appear in other owners' candidate listings and reject new match requests, but existing matches continue unaffected.",
    params(
        ("id" = uuid::Uuid, Path, description = "Dog UUID"),
    ),
    request_body = VisibilityRequest,
    responses(
        (status = 200, description = "Updated profile", body = DogProfileDto),
        (status = 403, description = "Actor does not own this dog", body = ErrorResponse),
        (status = 404, description = "Dog not found", body = ErrorResponse),
    )
)]
pub async fn set_visibility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<VisibilityRequest>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;

    let profile = state
        .dog_service
        .set_visibility(actor, DogId::from_uuid(id), req.visible)
        .await?;

    Ok(Json(DogProfileDto::from(&profile)))
}

/// `GET /dogs/:id/candidates` — Ranked breeding candidates for one of the
/// actor's dogs.
///
/// # Errors
///
/// Returns [`MatchError::Authorization`] when the reference dog belongs to
/// someone else.
#[utoipa::path(
    get,
    path = "/api/v1/dogs/{id}/candidates",
    tag = "Dogs",
    summary = "Browse breeding candidates",
    description = "Scores every visible opposite-gender dog of other owners against the reference dog and returns those above zero, best first. Dogs already in an open match with the reference dog are skipped unless `available_only=false`.",
    params(
        ("id" = uuid::Uuid, Path, description = "Reference dog UUID"),
        ("available_only" = Option<bool>, Query, description = "Skip dogs already engaged with the reference dog (default true)"),
    ),
    responses(
        (status = 200, description = "Ranked candidates", body = CandidateListResponse),
        (status = 403, description = "Reference dog belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Reference dog not found", body = ErrorResponse),
    )
)]
pub async fn list_candidates(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<CandidateQuery>,
) -> Result<impl IntoResponse, MatchError> {
    let actor = super::actor_from_headers(&headers)?;
    let dog_id = DogId::from_uuid(id);

    let candidates = state
        .match_service
        .candidates_for(actor, dog_id, query.available_only)
        .await?;

    let data: Vec<CandidateDto> = candidates
        .into_iter()
        .map(|candidate| CandidateDto {
            dog: DogProfileDto::from(&candidate.dog),
            compatibility_score: candidate.score,
            breakdown: ScoreBreakdownDto::from(candidate.breakdown),
        })
        .collect();
    let total = data.len();

    Ok(Json(CandidateListResponse {
        reference_dog_id: dog_id,
        data,
        total,
    }))
}

/// Dog profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dogs", post(register_dog).get(list_my_dogs))
        .route("/dogs/{id}", get(get_dog))
        .route("/dogs/{id}/visibility", patch(set_visibility))
        .route("/dogs/{id}/candidates", get(list_candidates))
}

// ── Attribute Parsing Helpers ───────────────────────────────────────────

/// Converts the stringly-typed registration body into domain attributes.
///
/// # Errors
///
/// Returns [`MatchError::Validation`] on an unrecognized gender or size
/// string.
fn parse_dog_attributes(req: &RegisterDogRequest) -> Result<DogAttributes, MatchError> {
    let gender = req.gender.as_deref().map(parse_gender).transpose()?;
    let size = req.size.as_deref().map(parse_size_class).transpose()?;

    Ok(DogAttributes {
        breed: req.breed.clone(),
        gender,
        age_years: req.age_years,
        size,
        weight_kg: req.weight_kg,
        coat_type: req.coat_type.clone(),
        color: req.color.clone(),
        temperament: req
            .temperament
            .clone()
            .map(Temperament::from)
            .unwrap_or_default(),
    })
}

/// Parses a gender string, case-insensitively.
fn parse_gender(value: &str) -> Result<Gender, MatchError> {
    match value.to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => Err(MatchError::Validation(format!(
            "unrecognized gender: {other}"
        ))),
    }
}

/// Parses a size class string, case-insensitively.
fn parse_size_class(value: &str) -> Result<SizeClass, MatchError> {
    match value.to_ascii_lowercase().as_str() {
        "small" => Ok(SizeClass::Small),
        "medium" => Ok(SizeClass::Medium),
        "large" => Ok(SizeClass::Large),
        "giant" => Ok(SizeClass::Giant),
        other => Err(MatchError::Validation(format!(
            "unrecognized size class: {other}"
        ))),
    }
}
