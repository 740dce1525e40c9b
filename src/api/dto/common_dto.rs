//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DogId, DogSummary, UserId};

/// Compact dog identification embedded in match responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DogSummaryDto {
    /// Dog identifier.
    pub dog_id: DogId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Breed name, if recorded.
    pub breed: Option<String>,
    /// Gender string, if recorded.
    pub gender: Option<String>,
}

impl From<DogSummary> for DogSummaryDto {
    fn from(summary: DogSummary) -> Self {
        Self {
            dog_id: summary.id,
            owner_id: summary.owner_id,
            name: summary.name,
            breed: summary.breed,
            gender: summary.gender.map(|g| g.as_str().to_string()),
        }
    }
}
