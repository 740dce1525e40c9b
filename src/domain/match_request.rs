//! Match requests and their lifecycle state machine.
//!
//! A match request connects two dogs owned by two different users. It moves
//! through a fixed state machine in which every edge names the party
//! allowed to take it, and the completed states are reachable only through
//! outcome submission. Terminal states accept no further transitions;
//! cancellation is a status, never a deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DogId, MatchId, OutcomeId, UserId};
use crate::error::MatchError;

/// Status of a match request. Exactly one value at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Created, awaiting the requested party's response.
    Pending,
    /// Requested party agreed; the meeting is being arranged.
    Accepted,
    /// Requested party refused. Terminal.
    Declined,
    /// Requester withdrew. Terminal.
    Cancelled,
    /// Meeting happened; the outcome has not been recorded yet.
    AwaitingConfirmation,
    /// Outcome recorded as a successful mating. Terminal.
    CompletedSuccess,
    /// Outcome recorded as failed or no-show. Terminal.
    CompletedFailed,
}

impl MatchStatus {
    /// Every status value, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Accepted,
        Self::Declined,
        Self::Cancelled,
        Self::AwaitingConfirmation,
        Self::CompletedSuccess,
        Self::CompletedFailed,
    ];

    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::CompletedSuccess => "completed_success",
            Self::CompletedFailed => "completed_failed",
        }
    }

    /// Whether no further transition is accepted from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Declined | Self::Cancelled | Self::CompletedSuccess | Self::CompletedFailed
        )
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The recorded result of a consummated meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Mating succeeded; a litter is expected or confirmed.
    Success,
    /// Meeting happened but mating failed.
    Failed,
    /// One party never showed up.
    NoShow,
}

impl OutcomeKind {
    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::NoShow => "no_show",
        }
    }

    /// The terminal status this outcome finalizes the match into.
    #[must_use]
    pub const fn final_status(&self) -> MatchStatus {
        match self {
            Self::Success => MatchStatus::CompletedSuccess,
            Self::Failed | Self::NoShow => MatchStatus::CompletedFailed,
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verified match outcome. At most one per match, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Outcome identifier.
    pub id: OutcomeId,
    /// The match this outcome finalizes.
    pub match_id: MatchId,
    /// User who verified the outcome.
    pub verified_by_user_id: UserId,
    /// The verifier's participating dog. Must be the female side.
    pub verified_by_dog_id: DogId,
    /// What happened.
    pub outcome: OutcomeKind,
    /// Litter size. Retained only for successful outcomes.
    pub litter_size: Option<u32>,
    /// Free-text notes from the verifier.
    pub notes: Option<String>,
    /// When the outcome was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Per-status timestamps stamped by the state machine.
///
/// `requested_at` and `last_status_changed_at` are always set; the rest are
/// set once when the corresponding status is first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimestamps {
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
    /// Time of the most recent transition. Equals `requested_at` at creation.
    pub last_status_changed_at: DateTime<Utc>,
}

impl StatusTimestamps {
    fn at_creation(now: DateTime<Utc>) -> Self {
        Self {
            requested_at: now,
            accepted_at: None,
            declined_at: None,
            cancelled_at: None,
            awaiting_confirmation_at: None,
            completed_at: None,
            last_status_changed_at: now,
        }
    }
}

/// Which side of a match a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    /// The user who created the request.
    Requester,
    /// The user whose dog was requested.
    Requested,
}

/// Who may take a given transition edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionPermission {
    RequesterOnly,
    RequestedPartyOnly,
    EitherParty,
    OutcomeSubmissionOnly,
}

/// The transition table. `None` means the edge does not exist.
const fn edge_permission(from: MatchStatus, to: MatchStatus) -> Option<TransitionPermission> {
    use MatchStatus::{
        Accepted, AwaitingConfirmation, Cancelled, CompletedFailed, CompletedSuccess, Declined,
        Pending,
    };
    match (from, to) {
        (Pending, Accepted | Declined) => Some(TransitionPermission::RequestedPartyOnly),
        (Pending | Accepted | AwaitingConfirmation, Cancelled) => {
            Some(TransitionPermission::RequesterOnly)
        }
        (Accepted, AwaitingConfirmation) => Some(TransitionPermission::EitherParty),
        (AwaitingConfirmation, CompletedSuccess | CompletedFailed) => {
            Some(TransitionPermission::OutcomeSubmissionOnly)
        }
        _ => None,
    }
}

/// Parameters for creating a match request.
#[derive(Debug, Clone)]
pub struct NewMatchRequest {
    /// User creating the request.
    pub requester_user_id: UserId,
    /// Owner of the requested dog.
    pub requested_user_id: UserId,
    /// The requester's participating dog.
    pub requester_dog_id: DogId,
    /// The dog being requested.
    pub requested_dog_id: DogId,
    /// Optional link to an external messaging thread.
    pub contact_id: Option<uuid::Uuid>,
    /// Free-text note from the requester.
    pub requester_notes: Option<String>,
}

/// A match request between two dogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Unique identifier.
    pub id: MatchId,
    /// User who created the request.
    pub requester_user_id: UserId,
    /// Owner of the requested dog.
    pub requested_user_id: UserId,
    /// The requester's participating dog.
    pub requester_dog_id: DogId,
    /// The dog being requested.
    pub requested_dog_id: DogId,
    /// Optional link to an external messaging thread.
    pub contact_id: Option<uuid::Uuid>,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// Per-status timestamps.
    pub timestamps: StatusTimestamps,
    /// Free-text note from the requester, set at creation.
    pub requester_notes: Option<String>,
    /// Free-text note from the requested party, set when responding.
    pub responder_notes: Option<String>,
    /// The recorded outcome, present only in completed statuses.
    pub outcome: Option<MatchOutcome>,
}

impl MatchRequest {
    /// Creates a request in `Pending` with `requested_at` stamped.
    #[must_use]
    pub fn new(params: NewMatchRequest) -> Self {
        let now = Utc::now();
        Self {
            id: MatchId::new(),
            requester_user_id: params.requester_user_id,
            requested_user_id: params.requested_user_id,
            requester_dog_id: params.requester_dog_id,
            requested_dog_id: params.requested_dog_id,
            contact_id: params.contact_id,
            status: MatchStatus::Pending,
            timestamps: StatusTimestamps::at_creation(now),
            requester_notes: params.requester_notes,
            responder_notes: None,
            outcome: None,
        }
    }

    /// The side `user_id` is on, or `None` for a non-participant.
    #[must_use]
    pub fn role_of(&self, user_id: UserId) -> Option<PartyRole> {
        if user_id == self.requester_user_id {
            Some(PartyRole::Requester)
        } else if user_id == self.requested_user_id {
            Some(PartyRole::Requested)
        } else {
            None
        }
    }

    /// The participating dog on `role`'s side.
    #[must_use]
    pub const fn dog_of(&self, role: PartyRole) -> DogId {
        match role {
            PartyRole::Requester => self.requester_dog_id,
            PartyRole::Requested => self.requested_dog_id,
        }
    }

    /// Whether `dog_id` is one of the two dogs on this match.
    #[must_use]
    pub fn involves_dog(&self, dog_id: DogId) -> bool {
        dog_id == self.requester_dog_id || dog_id == self.requested_dog_id
    }

    /// Applies a status transition requested by `actor`.
    ///
    /// Stamps the status-specific timestamp and `last_status_changed_at` on
    /// success. The completed statuses are never reachable through this
    /// method; they are set by [`Self::record_outcome`] alone.
    ///
    /// # Errors
    ///
    /// [`MatchError::StateConflict`] when the edge does not exist in the
    /// transition table (including any move out of a terminal status), and
    /// [`MatchError::Authorization`] when the edge exists but `actor` is not
    /// the party allowed to take it.
    pub fn transition(&mut self, to: MatchStatus, actor: PartyRole) -> Result<(), MatchError> {
        let Some(permission) = edge_permission(self.status, to) else {
            return Err(MatchError::StateConflict {
                from: self.status,
                to,
            });
        };
        match permission {
            TransitionPermission::EitherParty => {}
            TransitionPermission::RequesterOnly => {
                if actor != PartyRole::Requester {
                    return Err(MatchError::Authorization(
                        "only the requester may cancel a match request".to_string(),
                    ));
                }
            }
            TransitionPermission::RequestedPartyOnly => {
                if actor != PartyRole::Requested {
                    return Err(MatchError::Authorization(
                        "only the requested party may respond to this request".to_string(),
                    ));
                }
            }
            TransitionPermission::OutcomeSubmissionOnly => {
                return Err(MatchError::Authorization(
                    "completed statuses are set by submitting an outcome, not directly"
                        .to_string(),
                ));
            }
        }
        self.apply(to, Utc::now());
        Ok(())
    }

    /// Records the one outcome for this match and finalizes it.
    ///
    /// The caller is responsible for verifying the submitter's eligibility;
    /// this method enforces only the state precondition, which also rules
    /// out a second outcome since a completed match never returns to
    /// `AwaitingConfirmation`.
    ///
    /// # Errors
    ///
    /// [`MatchError::StateConflict`] unless the match is currently in
    /// `AwaitingConfirmation`.
    pub fn record_outcome(&mut self, outcome: MatchOutcome) -> Result<(), MatchError> {
        if self.status != MatchStatus::AwaitingConfirmation {
            return Err(MatchError::StateConflict {
                from: self.status,
                to: outcome.outcome.final_status(),
            });
        }
        let final_status = outcome.outcome.final_status();
        self.outcome = Some(outcome);
        self.apply(final_status, Utc::now());
        Ok(())
    }

    fn apply(&mut self, to: MatchStatus, now: DateTime<Utc>) {
        match to {
            MatchStatus::Pending => {}
            MatchStatus::Accepted => self.timestamps.accepted_at = Some(now),
            MatchStatus::Declined => self.timestamps.declined_at = Some(now),
            MatchStatus::Cancelled => self.timestamps.cancelled_at = Some(now),
            MatchStatus::AwaitingConfirmation => {
                self.timestamps.awaiting_confirmation_at = Some(now);
            }
            MatchStatus::CompletedSuccess | MatchStatus::CompletedFailed => {
                self.timestamps.completed_at = Some(now);
            }
        }
        self.timestamps.last_status_changed_at = now;
        self.status = to;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_request() -> MatchRequest {
        MatchRequest::new(NewMatchRequest {
            requester_user_id: UserId::new(),
            requested_user_id: UserId::new(),
            requester_dog_id: DogId::new(),
            requested_dog_id: DogId::new(),
            contact_id: None,
            requester_notes: Some("our boy is a calm stud".to_string()),
        })
    }

    fn make_outcome(request: &MatchRequest, kind: OutcomeKind) -> MatchOutcome {
        MatchOutcome {
            id: OutcomeId::new(),
            match_id: request.id,
            verified_by_user_id: request.requested_user_id,
            verified_by_dog_id: request.requested_dog_id,
            outcome: kind,
            litter_size: None,
            notes: None,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn new_request_is_pending_with_creation_stamps() {
        let request = make_request();
        assert_eq!(request.status, MatchStatus::Pending);
        assert_eq!(
            request.timestamps.last_status_changed_at,
            request.timestamps.requested_at
        );
        assert!(request.outcome.is_none());
    }

    #[test]
    fn requested_party_accepts_and_stamps() {
        let mut request = make_request();
        let result = request.transition(MatchStatus::Accepted, PartyRole::Requested);
        assert!(result.is_ok());
        assert_eq!(request.status, MatchStatus::Accepted);
        assert!(request.timestamps.accepted_at.is_some());
        assert!(request.timestamps.last_status_changed_at >= request.timestamps.requested_at);
    }

    #[test]
    fn requester_cannot_accept_own_request() {
        let mut request = make_request();
        let result = request.transition(MatchStatus::Accepted, PartyRole::Requester);
        assert!(matches!(result, Err(MatchError::Authorization(_))));
        assert_eq!(request.status, MatchStatus::Pending);
    }

    #[test]
    fn requested_party_cannot_cancel() {
        let mut request = make_request();
        let result = request.transition(MatchStatus::Cancelled, PartyRole::Requested);
        assert!(matches!(result, Err(MatchError::Authorization(_))));
    }

    #[test]
    fn requester_cancels_while_pending_accepted_or_awaiting() {
        for setup in [
            vec![],
            vec![MatchStatus::Accepted],
            vec![MatchStatus::Accepted, MatchStatus::AwaitingConfirmation],
        ] {
            let mut request = make_request();
            for status in setup {
                let result = request.transition(status, PartyRole::Requested);
                assert!(result.is_ok());
            }
            let result = request.transition(MatchStatus::Cancelled, PartyRole::Requester);
            assert!(result.is_ok());
            assert_eq!(request.status, MatchStatus::Cancelled);
            assert!(request.timestamps.cancelled_at.is_some());
        }
    }

    #[test]
    fn either_party_moves_accepted_to_awaiting() {
        for actor in [PartyRole::Requester, PartyRole::Requested] {
            let mut request = make_request();
            let accepted = request.transition(MatchStatus::Accepted, PartyRole::Requested);
            assert!(accepted.is_ok());
            let result = request.transition(MatchStatus::AwaitingConfirmation, actor);
            assert!(result.is_ok());
            assert!(request.timestamps.awaiting_confirmation_at.is_some());
        }
    }

    #[test]
    fn decline_is_terminal() {
        let mut request = make_request();
        let declined = request.transition(MatchStatus::Declined, PartyRole::Requested);
        assert!(declined.is_ok());
        assert!(request.timestamps.declined_at.is_some());

        let result = request.transition(MatchStatus::Cancelled, PartyRole::Requester);
        assert!(matches!(result, Err(MatchError::StateConflict { .. })));
        assert_eq!(request.status, MatchStatus::Declined);
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        let terminals = [
            MatchStatus::Declined,
            MatchStatus::Cancelled,
            MatchStatus::CompletedSuccess,
            MatchStatus::CompletedFailed,
        ];
        for terminal in terminals {
            for target in MatchStatus::ALL {
                for actor in [PartyRole::Requester, PartyRole::Requested] {
                    let mut request = make_request();
                    request.status = terminal;
                    let result = request.transition(target, actor);
                    assert!(
                        matches!(result, Err(MatchError::StateConflict { .. })),
                        "{terminal} -> {target} should be a state conflict"
                    );
                }
            }
        }
    }

    #[test]
    fn self_transition_is_rejected() {
        let mut request = make_request();
        let result = request.transition(MatchStatus::Pending, PartyRole::Requester);
        assert!(matches!(result, Err(MatchError::StateConflict { .. })));
    }

    #[test]
    fn skipping_accepted_is_rejected() {
        let mut request = make_request();
        let result = request.transition(MatchStatus::AwaitingConfirmation, PartyRole::Requested);
        assert!(matches!(result, Err(MatchError::StateConflict { .. })));
    }

    #[test]
    fn direct_completed_update_is_rejected() {
        // From awaiting_confirmation the edge exists but belongs to outcome
        // submission, so the rejection is an authorization error.
        let mut request = make_request();
        let _ = request.transition(MatchStatus::Accepted, PartyRole::Requested);
        let _ = request.transition(MatchStatus::AwaitingConfirmation, PartyRole::Requested);
        for target in [MatchStatus::CompletedSuccess, MatchStatus::CompletedFailed] {
            let result = request.transition(target, PartyRole::Requested);
            assert!(matches!(result, Err(MatchError::Authorization(_))));
        }
        // From any other status the edge does not exist at all.
        let mut pending = make_request();
        let result = pending.transition(MatchStatus::CompletedSuccess, PartyRole::Requested);
        assert!(matches!(result, Err(MatchError::StateConflict { .. })));
    }

    #[test]
    fn outcome_finalizes_to_completed_success() {
        let mut request = make_request();
        let _ = request.transition(MatchStatus::Accepted, PartyRole::Requested);
        let _ = request.transition(MatchStatus::AwaitingConfirmation, PartyRole::Requested);

        let outcome = make_outcome(&request, OutcomeKind::Success);
        let result = request.record_outcome(outcome);
        assert!(result.is_ok());
        assert_eq!(request.status, MatchStatus::CompletedSuccess);
        assert!(request.timestamps.completed_at.is_some());
        assert!(request.outcome.is_some());
    }

    #[test]
    fn failed_and_no_show_finalize_to_completed_failed() {
        for kind in [OutcomeKind::Failed, OutcomeKind::NoShow] {
            let mut request = make_request();
            let _ = request.transition(MatchStatus::Accepted, PartyRole::Requested);
            let _ = request.transition(MatchStatus::AwaitingConfirmation, PartyRole::Requested);
            let result = request.record_outcome(make_outcome(&request, kind));
            assert!(result.is_ok());
            assert_eq!(request.status, MatchStatus::CompletedFailed);
        }
    }

    #[test]
    fn second_outcome_is_rejected() {
        let mut request = make_request();
        let _ = request.transition(MatchStatus::Accepted, PartyRole::Requested);
        let _ = request.transition(MatchStatus::AwaitingConfirmation, PartyRole::Requested);
        let first = make_outcome(&request, OutcomeKind::Success);
        assert!(request.record_outcome(first).is_ok());

        let second = make_outcome(&request, OutcomeKind::Failed);
        let result = request.record_outcome(second);
        assert!(matches!(result, Err(MatchError::StateConflict { .. })));
        assert_eq!(request.status, MatchStatus::CompletedSuccess);
    }

    #[test]
    fn outcome_requires_awaiting_confirmation() {
        let mut request = make_request();
        let outcome = make_outcome(&request, OutcomeKind::Success);
        let result = request.record_outcome(outcome);
        assert!(matches!(result, Err(MatchError::StateConflict { .. })));
        assert_eq!(request.status, MatchStatus::Pending);
    }

    #[test]
    fn role_of_resolves_both_parties() {
        let request = make_request();
        assert_eq!(
            request.role_of(request.requester_user_id),
            Some(PartyRole::Requester)
        );
        assert_eq!(
            request.role_of(request.requested_user_id),
            Some(PartyRole::Requested)
        );
        assert_eq!(request.role_of(UserId::new()), None);
    }

    #[test]
    fn dog_lookup_follows_role() {
        let request = make_request();
        assert_eq!(request.dog_of(PartyRole::Requester), request.requester_dog_id);
        assert_eq!(request.dog_of(PartyRole::Requested), request.requested_dog_id);
        assert!(request.involves_dog(request.requester_dog_id));
        assert!(request.involves_dog(request.requested_dog_id));
        assert!(!request.involves_dog(DogId::new()));
    }

    #[test]
    fn terminal_statuses_are_classified() {
        assert!(!MatchStatus::Pending.is_terminal());
        assert!(!MatchStatus::Accepted.is_terminal());
        assert!(!MatchStatus::AwaitingConfirmation.is_terminal());
        assert!(MatchStatus::Declined.is_terminal());
        assert!(MatchStatus::Cancelled.is_terminal());
        assert!(MatchStatus::CompletedSuccess.is_terminal());
        assert!(MatchStatus::CompletedFailed.is_terminal());
    }
}
