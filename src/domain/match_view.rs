//! Viewer-relative projections of match requests.
//!
//! Storage is symmetric (requester and requested columns); presentation is
//! not. Given a viewer, each match resolves to a direction, the viewer's
//! own dog versus the partner dog, and a set of derived action flags. None
//! of this is stored.

use serde::{Deserialize, Serialize};

use super::dog::{DogSummary, Gender};
use super::match_request::{MatchOutcome, MatchRequest, MatchStatus, PartyRole, StatusTimestamps};
use super::MatchId;

/// Whether the viewer initiated the match request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchDirection {
    /// The viewer is the requester.
    Sent,
    /// The viewer is the requested party.
    Received,
}

impl MatchDirection {
    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
        }
    }
}

impl From<PartyRole> for MatchDirection {
    fn from(role: PartyRole) -> Self {
        match role {
            PartyRole::Requester => Self::Sent,
            PartyRole::Requested => Self::Received,
        }
    }
}

/// A match request as seen from one participant's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    /// The underlying match.
    pub match_id: MatchId,
    /// Sent or received, relative to the viewer.
    pub direction: MatchDirection,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// The viewer's participating dog.
    pub my_dog: DogSummary,
    /// The other side's dog.
    pub partner_dog: DogSummary,
    /// Compatibility score of the pairing at view time.
    pub compatibility_score: u8,
    /// The request is pending and it is the viewer's turn to respond.
    pub requires_response: bool,
    /// The viewer may cancel (requester side, non-terminal status).
    pub can_cancel: bool,
    /// The match awaits an outcome that this viewer is eligible to submit.
    pub awaiting_my_outcome: bool,
    /// Per-status timestamps.
    pub timestamps: StatusTimestamps,
    /// Note left by the requester at creation.
    pub requester_notes: Option<String>,
    /// Note left by the requested party when responding.
    pub responder_notes: Option<String>,
    /// The recorded outcome, once completed.
    pub outcome: Option<MatchOutcome>,
}

impl MatchView {
    /// Projects `request` onto `role`'s side of the pairing.
    ///
    /// `my_dog` and `partner_dog` must be the summaries of the dogs on the
    /// corresponding sides; `score` is the pairing's compatibility score.
    #[must_use]
    pub fn project(
        request: &MatchRequest,
        role: PartyRole,
        my_dog: DogSummary,
        partner_dog: DogSummary,
        score: u8,
    ) -> Self {
        let requires_response =
            request.status == MatchStatus::Pending && role == PartyRole::Requested;
        let can_cancel = role == PartyRole::Requester && !request.status.is_terminal();
        let awaiting_my_outcome = request.status == MatchStatus::AwaitingConfirmation
            && my_dog.gender == Some(Gender::Female);
        Self {
            match_id: request.id,
            direction: MatchDirection::from(role),
            status: request.status,
            my_dog,
            partner_dog,
            compatibility_score: score,
            requires_response,
            can_cancel,
            awaiting_my_outcome,
            timestamps: request.timestamps,
            requester_notes: request.requester_notes.clone(),
            responder_notes: request.responder_notes.clone(),
            outcome: request.outcome.clone(),
        }
    }
}

/// The "my matches" groupings, derived from current status.
///
/// `pending` and `awaiting_confirmation` mirror their statuses, `history`
/// holds everything resolved (declined, cancelled, both completed states),
/// and `all` holds every match. Accepted matches appear only in `all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchGroups {
    /// Matches still waiting for a response.
    pub pending: Vec<MatchView>,
    /// Matches waiting for an outcome.
    pub awaiting_confirmation: Vec<MatchView>,
    /// Resolved matches.
    pub history: Vec<MatchView>,
    /// Every match, regardless of status.
    pub all: Vec<MatchView>,
}

impl MatchGroups {
    /// Partitions `views` into the four groupings, preserving input order.
    #[must_use]
    pub fn partition(views: Vec<MatchView>) -> Self {
        let mut groups = Self {
            pending: Vec::new(),
            awaiting_confirmation: Vec::new(),
            history: Vec::new(),
            all: Vec::new(),
        };
        for view in &views {
            match view.status {
                MatchStatus::Pending => groups.pending.push(view.clone()),
                MatchStatus::AwaitingConfirmation => {
                    groups.awaiting_confirmation.push(view.clone());
                }
                MatchStatus::Accepted => {}
                MatchStatus::Declined
                | MatchStatus::Cancelled
                | MatchStatus::CompletedSuccess
                | MatchStatus::CompletedFailed => groups.history.push(view.clone()),
            }
        }
        groups.all = views;
        groups
    }
}

/// Status counts over a user's matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
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

impl MatchCounts {
    /// Tallies counts over a slice of views.
    #[must_use]
    pub fn tally(views: &[MatchView]) -> Self {
        let mut counts = Self {
            total: views.len(),
            ..Self::default()
        };
        for view in views {
            match view.status {
                MatchStatus::Pending => counts.pending += 1,
                MatchStatus::Accepted => counts.accepted += 1,
                MatchStatus::AwaitingConfirmation => counts.awaiting_confirmation += 1,
                MatchStatus::CompletedSuccess => counts.successes += 1,
                MatchStatus::CompletedFailed => counts.failures += 1,
                MatchStatus::Declined | MatchStatus::Cancelled => counts.declines += 1,
            }
        }
        counts
    }
}
