//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{DogService, MatchService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dog profile operations.
    pub dog_service: Arc<DogService>,
    /// Candidate scoring and match lifecycle operations.
    pub match_service: Arc<MatchService>,
    /// Event bus carrying match lifecycle notifications.
    pub event_bus: EventBus,
}
