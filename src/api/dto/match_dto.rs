//! Match lifecycle DTOs: creation, status updates, outcomes, and views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::DogSummaryDto;
use crate::domain::{
    DogId, MatchCounts, MatchGroups, MatchId, MatchOutcome, MatchView, OutcomeId, StatusTimestamps,
};

/// Request body for `POST /matches`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMatchRequest {
    /// The actor's own dog initiating the pairing.
    pub requester_dog_id: uuid::Uuid,
    /// The dog being requested.
    pub requested_dog_id: uuid::Uuid,
    /// Optional link to an external messaging thread.
    #[serde(default)]
    pub contact_id: Option<uuid::Uuid>,
    /// Free-text note shown to the other party.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /matches/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status string, e.g. `"accepted"`.
    pub status: String,
    /// Optional note; stored when the requested party responds.
    #[serde(default)]
    pub note: Option<String>,
}

/// Request body for `POST /matches/{id}/outcome`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitOutcomeRequest {
    /// The submitter's participating dog (the female side).
    pub verified_by_dog_id: uuid::Uuid,
    /// `"success"`, `"failed"`, or `"no_show"`.
    pub outcome: String,
    /// Litter size for successful matings.
    #[serde(default)]
    pub litter_size: Option<u32>,
    /// Free-text notes from the verifier.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Recorded outcome embedded in match responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OutcomeDto {
    /// Outcome identifier.
    pub outcome_id: OutcomeId,
    /// Outcome string.
    pub outcome: String,
    /// Litter size, successful matings only.
    pub litter_size: Option<u32>,
    /// Verifier's notes.
    pub notes: Option<String>,
    /// The dog whose owner verified the outcome.
    pub verified_by_dog_id: DogId,
    /// When the outcome was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl From<MatchOutcome> for OutcomeDto {
    fn from(outcome: MatchOutcome) -> Self {
        Self {
            outcome_id: outcome.id,
            outcome: outcome.outcome.as_str().to_string(),
            litter_size: outcome.litter_size,
            notes: outcome.notes,
            verified_by_dog_id: outcome.verified_by_dog_id,
            recorded_at: outcome.recorded_at,
        }
    }
}

/// Per-status timestamps in match responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimestampsDto {
    /// Creation time.
    pub requested_at: DateTime<Utc>,
    /// When the request was accepted.
    pub accepted_at: Option<DateTime<Utc>>,
    /// When the request was declined.
    pub declined_at: Option<DateTime<Utc>>,
    /// When the request was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When the parties reported the meeting happened.
    pub awaiting_confirmation_at: Option<DateTime<Utc>>,
    /// When the match reached a completed status.
    pub completed_at: Option<DateTime<Utc>>,
    /// Time of the most recent transition.
    pub last_status_changed_at: DateTime<Utc>,
}

impl From<StatusTimestamps> for TimestampsDto {
    fn from(timestamps: StatusTimestamps) -> Self {
        Self {
            requested_at: timestamps.requested_at,
            accepted_at: timestamps.accepted_at,
            declined_at: timestamps.declined_at,
            cancelled_at: timestamps.cancelled_at,
            awaiting_confirmation_at: timestamps.awaiting_confirmation_at,
            completed_at: timestamps.completed_at,
            last_status_changed_at: timestamps.last_status_changed_at,
        }
    }
}

/// One match as seen from the viewer's side.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchViewDto {
    /// Match identifier.
    pub match_id: MatchId,
    /// `"sent"` or `"received"`, relative to the viewer.
    pub direction: String,
    /// Current lifecycle status string.
    pub status: String,
    /// The viewer's participating dog.
    pub my_dog: DogSummaryDto,
    /// The other side's dog.
    pub partner_dog: DogSummaryDto,
    /// Compatibility score of the pairing at view time.
    pub compatibility_score: u8,
    /// The request is pending and it is the viewer's turn to respond.
    pub requires_response: bool,
    /// The viewer may cancel (requester side, non-terminal status).
    pub can_cancel: bool,
    /// The match awaits an outcome this viewer is eligible to submit.
    pub awaiting_my_outcome: bool,
    /// Note left by the requester at creation.
    pub requester_notes: Option<String>,
    /// Note left by the requested party when responding.
    pub responder_notes: Option<String>,
    /// Per-status timestamps.
    pub timestamps: TimestampsDto,
    /// The recorded outcome, once completed.
    pub outcome: Option<OutcomeDto>,
}

impl From<MatchView> for MatchViewDto {
    fn from(view: MatchView) -> Self {
        Self {
            match_id: view.match_id,
            direction: view.direction.as_str().to_string(),
            status: view.status.as_str().to_string(),
            my_dog: DogSummaryDto::from(view.my_dog),
            partner_dog: DogSummaryDto::from(view.partner_dog),
            compatibility_score: view.compatibility_score,
            requires_response: view.requires_response,
            can_cancel: view.can_cancel,
            awaiting_my_outcome: view.awaiting_my_outcome,
            requester_notes: view.requester_notes,
            responder_notes: view.responder_notes,
            timestamps: TimestampsDto::from(view.timestamps),
            outcome: view.outcome.map(OutcomeDto::from),
        }
    }
}

/// Status tallies across a user's matches.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchCountsDto {
    /// Every match involving the user.
    pub total: usize,
    /// Currently pending.
    pub pending: usize,
    /// Currently accepted.
    pub accepted: usize,
    /// Currently awaiting an outcome.
    pub awaiting_confirmation: usize,
    /// Completed successfully.
    pub successes: usize,
    /// Completed in failure.
    pub failures: usize,
    /// Declined or cancelled.
    pub declines: usize,
}

impl From<MatchCounts> for MatchCountsDto {
    fn from(counts: MatchCounts) -> Self {
        Self {
            total: counts.total,
            pending: counts.pending,
            accepted: counts.accepted,
            awaiting_confirmation: counts.awaiting_confirmation,
            successes: counts.successes,
            failures: counts.failures,
            declines: counts.declines,
        }
    }
}

/// Response body for `GET /matches/mine`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MyMatchesResponse {
    /// Matches still waiting for a response, most recent first.
    pub pending: Vec<MatchViewDto>,
    /// Matches waiting for an outcome.
    pub awaiting_confirmation: Vec<MatchViewDto>,
    /// Resolved matches.
    pub history: Vec<MatchViewDto>,
    /// Every match, regardless of status.
    pub all: Vec<MatchViewDto>,
    /// Status tallies over `all`.
    pub counts: MatchCountsDto,
}

impl MyMatchesResponse {
    /// Assembles the response from domain groupings and counts.
    #[must_use]
    pub fn from_groups(groups: MatchGroups, counts: MatchCounts) -> Self {
        Self {
            pending: groups.pending.into_iter().map(MatchViewDto::from).collect(),
            awaiting_confirmation: groups
                .awaiting_confirmation
                .into_iter()
                .map(MatchViewDto::from)
                .collect(),
            history: groups.history.into_iter().map(MatchViewDto::from).collect(),
            all: groups.all.into_iter().map(MatchViewDto::from).collect(),
            counts: MatchCountsDto::from(counts),
        }
    }
}
