//! Service layer: orchestration on top of the domain registries.

pub mod dog_service;
pub mod match_service;

pub use dog_service::DogService;
pub use match_service::{MatchService, OutcomeSubmission, ScoredCandidate};
