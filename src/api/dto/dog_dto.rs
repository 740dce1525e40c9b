//! Dog profile DTOs for registration, listing, and candidate browsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DogId, DogProfile, ScoreBreakdown, Temperament, UserId};

/// Temperament traits as free-form strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TemperamentDto {
    /// Activity level, e.g. `"high"`.
    #[serde(default)]
    pub activity_level: Option<String>,
    /// Sociability toward other dogs, e.g. `"friendly"`.
    #[serde(default)]
    pub sociability: Option<String>,
    /// Trainability, e.g. `"eager"`.
    #[serde(default)]
    pub trainability: Option<String>,
}

impl From<TemperamentDto> for Temperament {
    fn from(dto: TemperamentDto) -> Self {
        Self {
            activity_level: dto.activity_level,
            sociability: dto.sociability,
            trainability: dto.trainability,
        }
    }
}

impl From<Temperament> for TemperamentDto {
    fn from(temperament: Temperament) -> Self {
        Self {
            activity_level: temperament.activity_level,
            sociability: temperament.sociability,
            trainability: temperament.trainability,
        }
    }
}

/// Request body for `POST /dogs`.
///
/// Only `name` is required; every attribute may be omitted and filled in
/// later. `gender` and `size` are lowercase strings.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterDogRequest {
    /// Display name (non-blank).
    pub name: String,
    /// Breed name.
    #[serde(default)]
    pub breed: Option<String>,
    /// `"male"` or `"female"`.
    #[serde(default)]
    pub gender: Option<String>,
    /// Age in years (accepted breeding range is 2 to 7).
    #[serde(default)]
    pub age_years: Option<f64>,
    /// `"small"`, `"medium"`, `"large"`, or `"giant"`.
    #[serde(default)]
    pub size: Option<String>,
    /// Weight in kilograms (must be positive when present).
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Coat type, e.g. `"double"`.
    #[serde(default)]
    pub coat_type: Option<String>,
    /// Primary coat color.
    #[serde(default)]
    pub color: Option<String>,
    /// Temperament traits.
    #[serde(default)]
    pub temperament: Option<TemperamentDto>,
}

/// Lifetime breeding counters in profile responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BreedingStatsDto {
    /// Match requests this dog has appeared in, either side.
    pub match_requests_count: u32,
    /// Requests that reached the accepted state.
    pub match_accept_count: u32,
    /// Requests that reached a completed state.
    pub match_completed_count: u32,
    /// Completed requests that succeeded.
    pub match_success_count: u32,
    /// Completed requests that failed.
    pub match_failure_count: u32,
    /// Successful matings where this dog was the verified female.
    pub female_successful_matings: u32,
    /// Share of completed matches that succeeded, in `[0.0, 1.0]`.
    pub success_rate: f64,
}

/// Full dog profile for `GET /dogs/{id}` and list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DogProfileDto {
    /// Dog identifier.
    pub dog_id: DogId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Breed name.
    pub breed: Option<String>,
    /// Gender string.
    pub gender: Option<String>,
    /// Age in years.
    pub age_years: Option<f64>,
    /// Size class string.
    pub size: Option<String>,
    /// Weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Coat type.
    pub coat_type: Option<String>,
    /// Primary coat color.
    pub color: Option<String>,
    /// Temperament traits.
    pub temperament: TemperamentDto,
    /// Whether the dog appears in other owners' candidate listings.
    pub visible: bool,
    /// Lifetime breeding counters.
    pub stats: BreedingStatsDto,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: DateTime<Utc>,
}

impl From<&DogProfile> for DogProfileDto {
    fn from(profile: &DogProfile) -> Self {
        Self {
            dog_id: profile.id,
            owner_id: profile.owner_id,
            name: profile.name.clone(),
            breed: profile.attributes.breed.clone(),
            gender: profile.attributes.gender.map(|g| g.as_str().to_string()),
            age_years: profile.attributes.age_years,
            size: profile.attributes.size.map(|s| s.as_str().to_string()),
            weight_kg: profile.attributes.weight_kg,
            coat_type: profile.attributes.coat_type.clone(),
            color: profile.attributes.color.clone(),
            temperament: TemperamentDto::from(profile.attributes.temperament.clone()),
            visible: profile.visible,
            stats: BreedingStatsDto {
                match_requests_count: profile.stats.match_requests_count,
                match_accept_count: profile.stats.match_accept_count,
                match_completed_count: profile.stats.match_completed_count,
                match_success_count: profile.stats.match_success_count,
                match_failure_count: profile.stats.match_failure_count,
                female_successful_matings: profile.stats.female_successful_matings,
                success_rate: profile.stats.success_rate(),
            },
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Response body for `GET /dogs`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DogListResponse {
    /// The actor's dogs, registration order.
    pub data: Vec<DogProfileDto>,
    /// Number of dogs returned.
    pub total: usize,
}

/// Request body for `PATCH /dogs/{id}/visibility`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    /// Whether the dog should appear as a candidate for other owners.
    pub visible: bool,
}

/// Query parameters for `GET /dogs/{id}/candidates`.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateQuery {
    /// Skip dogs already engaged with the reference dog. Defaults to true.
    #[serde(default = "default_available_only")]
    pub available_only: bool,
}

fn default_available_only() -> bool {
    true
}

/// Per-factor score contributions in candidate responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoreBreakdownDto {
    /// Whether the opposite-gender requirement was met.
    pub gender_gate_passed: bool,
    /// Opposite-gender baseline.
    pub base: f64,
    /// Breed contribution (exact or group bonus).
    pub breed: f64,
    /// Age proximity contribution.
    pub age: f64,
    /// Size class contribution.
    pub size: f64,
    /// Weight proximity contribution.
    pub weight: f64,
    /// Coat type contribution.
    pub coat: f64,
    /// Color contribution.
    pub color: f64,
    /// Combined temperament contribution.
    pub temperament: f64,
    /// Final capped and rounded score.
    pub total: u8,
}

impl From<ScoreBreakdown> for ScoreBreakdownDto {
    fn from(breakdown: ScoreBreakdown) -> Self {
        Self {
            gender_gate_passed: breakdown.gender_gate_passed,
            base: breakdown.base,
            breed: breakdown.breed,
            age: breakdown.age,
            size: breakdown.size,
            weight: breakdown.weight,
            coat: breakdown.coat,
            color: breakdown.color,
            temperament: breakdown.temperament,
            total: breakdown.total,
        }
    }
}

/// One ranked candidate for `GET /dogs/{id}/candidates`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CandidateDto {
    /// The candidate's full profile.
    pub dog: DogProfileDto,
    /// Final compatibility score against the reference dog.
    pub compatibility_score: u8,
    /// Per-factor contributions behind the score.
    pub breakdown: ScoreBreakdownDto,
}

/// Response body for `GET /dogs/{id}/candidates`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CandidateListResponse {
    /// The viewer's reference dog.
    pub reference_dog_id: DogId,
    /// Candidates, best score first.
    pub data: Vec<CandidateDto>,
    /// Number of candidates returned.
    pub total: usize,
}
