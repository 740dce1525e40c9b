//! Domain layer: core types, scoring, lifecycle, and event system.
//!
//! This module contains the server-side domain model including typed
//! identifiers, dog profiles with breeding statistics, the compatibility
//! scorer, the match request state machine with its viewer-relative
//! projections, the event bus for broadcasting lifecycle changes, and the
//! concurrent registries for dogs and matches.

pub mod dog;
pub mod dog_registry;
pub mod event_bus;
pub mod ids;
pub mod match_event;
pub mod match_registry;
pub mod match_request;
pub mod match_view;
pub mod scoring;

pub use dog::{BreedingStats, DogAttributes, DogProfile, DogSummary, Gender, SizeClass, Temperament};
pub use dog_registry::DogRegistry;
pub use event_bus::EventBus;
pub use ids::{DogId, MatchId, OutcomeId, UserId};
pub use match_event::{MatchEvent, MatchNotification};
pub use match_registry::MatchRegistry;
pub use match_request::{
    MatchOutcome, MatchRequest, MatchStatus, NewMatchRequest, OutcomeKind, PartyRole,
    StatusTimestamps,
};
pub use match_view::{MatchCounts, MatchDirection, MatchGroups, MatchView};
pub use scoring::{
    breeds_in_group, compatibility_score, score_breakdown, BreedGroup, ScoreBreakdown,
    ALL_BREED_GROUPS, SCORE_MAX,
};
