//! Domain events reflecting match lifecycle mutations.
//!
//! Every lifecycle change emits a [`MatchEvent`] through the
//! [`super::EventBus`]. Events are optionally persisted to the PostgreSQL
//! event log, and each event can render the human-readable notifications
//! owed to the affected parties.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::match_request::{MatchStatus, OutcomeKind};
use super::{DogId, MatchId, OutcomeId, UserId};

/// Domain event emitted after every match lifecycle mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// Emitted when a new match request is created.
    MatchRequested {
        /// Match identifier.
        match_id: MatchId,
        /// User who created the request.
        requester_user_id: UserId,
        /// Owner of the requested dog.
        requested_user_id: UserId,
        /// The requester's participating dog.
        requester_dog_id: DogId,
        /// The dog being requested.
        requested_dog_id: DogId,
        /// Display name of the requester's dog.
        requester_dog_name: String,
        /// Display name of the requested dog.
        requested_dog_name: String,
        /// Compatibility score of the pairing at request time.
        compatibility_score: u8,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful status transition.
    MatchStatusChanged {
        /// Match identifier.
        match_id: MatchId,
        /// Status before the transition.
        from: MatchStatus,
        /// Status after the transition.
        to: MatchStatus,
        /// User who took the transition.
        actor_user_id: UserId,
        /// User who created the request.
        requester_user_id: UserId,
        /// Owner of the requested dog.
        requested_user_id: UserId,
        /// Transition timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an outcome is recorded and the match finalizes.
    OutcomeRecorded {
        /// Match identifier.
        match_id: MatchId,
        /// Outcome identifier.
        outcome_id: OutcomeId,
        /// User who verified the outcome.
        verified_by_user_id: UserId,
        /// The verifier's participating dog.
        verified_by_dog_id: DogId,
        /// User who created the request.
        requester_user_id: UserId,
        /// Owner of the requested dog.
        requested_user_id: UserId,
        /// What happened.
        outcome: OutcomeKind,
        /// Litter size, present for successful outcomes.
        litter_size: Option<u32>,
        /// Terminal status the match finalized into.
        final_status: MatchStatus,
        /// Recording timestamp.
        timestamp: DateTime<Utc>,
    },
}

/// A human-readable notice owed to one party after a lifecycle change.
///
/// Delivery (push, email, in-app) is the surrounding application's concern;
/// this type only carries enough to render the notice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchNotification {
    /// User the notice is addressed to.
    pub recipient: UserId,
    /// Short headline.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// The match the notice refers to.
    pub match_id: MatchId,
}

impl MatchEvent {
    /// Returns the match ID associated with this event.
    #[must_use]
    pub fn match_id(&self) -> MatchId {
        match self {
            Self::MatchRequested { match_id, .. }
            | Self::MatchStatusChanged { match_id, .. }
            | Self::OutcomeRecorded { match_id, .. } => *match_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::MatchRequested { .. } => "match_requested",
            Self::MatchStatusChanged { .. } => "match_status_changed",
            Self::OutcomeRecorded { .. } => "outcome_recorded",
        }
    }

    /// Renders the notifications this event owes.
    ///
    /// The party who acted never receives a notice about their own action;
    /// the other side of the match does.
    #[must_use]
    pub fn notifications(&self) -> Vec<MatchNotification> {
        match self {
            Self::MatchRequested {
                match_id,
                requested_user_id,
                requester_dog_name,
                requested_dog_name,
                ..
            } => vec![MatchNotification {
                recipient: *requested_user_id,
                title: "New match request".to_string(),
                message: format!(
                    "{requester_dog_name} would like to meet {requested_dog_name}."
                ),
                match_id: *match_id,
            }],
            Self::MatchStatusChanged {
                match_id,
                to,
                actor_user_id,
                requester_user_id,
                requested_user_id,
                ..
            } => {
                let recipient = if actor_user_id == requester_user_id {
                    *requested_user_id
                } else {
                    *requester_user_id
                };
                let (title, message) = match to {
                    MatchStatus::Accepted => (
                        "Match accepted",
                        "Your match request was accepted. Time to arrange the meeting."
                            .to_string(),
                    ),
                    MatchStatus::Declined => (
                        "Match declined",
                        "Your match request was declined.".to_string(),
                    ),
                    MatchStatus::Cancelled => (
                        "Match cancelled",
                        "The match request was cancelled by the requester.".to_string(),
                    ),
                    MatchStatus::AwaitingConfirmation => (
                        "Meeting reported",
                        "The meeting was reported as having taken place. The outcome can now be recorded."
                            .to_string(),
                    ),
                    other => ("Match updated", format!("The match status changed to {other}.")),
                };
                vec![MatchNotification {
                    recipient,
                    title: title.to_string(),
                    message,
                    match_id: *match_id,
                }]
            }
            Self::OutcomeRecorded {
                match_id,
                verified_by_user_id,
                requester_user_id,
                requested_user_id,
                outcome,
                litter_size,
                ..
            } => {
                let recipient = if verified_by_user_id == requester_user_id {
                    *requested_user_id
                } else {
                    *requester_user_id
                };
                let message = match (outcome, litter_size) {
                    (OutcomeKind::Success, Some(size)) => {
                        format!("The mating was recorded as successful with a litter of {size}.")
                    }
                    (OutcomeKind::Success, None) => {
                        "The mating was recorded as successful.".to_string()
                    }
                    (OutcomeKind::Failed, _) => {
                        "The mating was recorded as unsuccessful.".to_string()
                    }
                    (OutcomeKind::NoShow, _) => {
                        "The meeting was recorded as a no-show.".to_string()
                    }
                };
                vec![MatchNotification {
                    recipient,
                    title: "Outcome recorded".to_string(),
                    message,
                    match_id: *match_id,
                }]
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn requested_event(match_id: MatchId, requested_user_id: UserId) -> MatchEvent {
        MatchEvent::MatchRequested {
            match_id,
            requester_user_id: UserId::new(),
            requested_user_id,
            requester_dog_id: DogId::new(),
            requested_dog_id: DogId::new(),
            requester_dog_name: "Bruno".to_string(),
            requested_dog_name: "Luna".to_string(),
            compatibility_score: 72,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn match_requested_event_type() {
        let event = requested_event(MatchId::new(), UserId::new());
        assert_eq!(event.event_type_str(), "match_requested");
    }

    #[test]
    fn status_changed_serializes() {
        let event = MatchEvent::MatchStatusChanged {
            match_id: MatchId::new(),
            from: MatchStatus::Pending,
            to: MatchStatus::Accepted,
            actor_user_id: UserId::new(),
            requester_user_id: UserId::new(),
            requested_user_id: UserId::new(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("match_status_changed"));
        assert!(json_str.contains("accepted"));
    }

    #[test]
    fn match_id_accessor() {
        let id = MatchId::new();
        let event = requested_event(id, UserId::new());
        assert_eq!(event.match_id(), id);
    }

    #[test]
    fn new_request_notifies_the_requested_party() {
        let match_id = MatchId::new();
        let requested_user = UserId::new();
        let notices = requested_event(match_id, requested_user).notifications();
        assert_eq!(notices.len(), 1);
        let Some(notice) = notices.first() else {
            panic!("expected a notification");
        };
        assert_eq!(notice.recipient, requested_user);
        assert_eq!(notice.match_id, match_id);
        assert!(notice.message.contains("Bruno"));
        assert!(notice.message.contains("Luna"));
    }

    #[test]
    fn status_change_notifies_the_other_party() {
        let requester = UserId::new();
        let requested = UserId::new();
        let event = MatchEvent::MatchStatusChanged {
            match_id: MatchId::new(),
            from: MatchStatus::Pending,
            to: MatchStatus::Declined,
            actor_user_id: requested,
            requester_user_id: requester,
            requested_user_id: requested,
            timestamp: Utc::now(),
        };
        let notices = event.notifications();
        let Some(notice) = notices.first() else {
            panic!("expected a notification");
        };
        assert_eq!(notice.recipient, requester);
        assert!(notice.message.contains("declined"));
    }

    #[test]
    fn successful_outcome_notice_includes_litter_size() {
        let requester = UserId::new();
        let requested = UserId::new();
        let event = MatchEvent::OutcomeRecorded {
            match_id: MatchId::new(),
            outcome_id: OutcomeId::new(),
            verified_by_user_id: requested,
            verified_by_dog_id: DogId::new(),
            requester_user_id: requester,
            requested_user_id: requested,
            outcome: OutcomeKind::Success,
            litter_size: Some(4),
            final_status: MatchStatus::CompletedSuccess,
            timestamp: Utc::now(),
        };
        let notices = event.notifications();
        let Some(notice) = notices.first() else {
            panic!("expected a notification");
        };
        assert_eq!(notice.recipient, requester);
        assert!(notice.message.contains('4'));
    }
}
