//! Match service: candidate ranking and the request lifecycle.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    compatibility_score, score_breakdown, DogId, DogProfile, DogRegistry, DogSummary, EventBus,
    Gender, MatchCounts, MatchEvent, MatchGroups, MatchId, MatchOutcome, MatchRegistry,
    MatchRequest, MatchStatus, MatchView, NewMatchRequest, OutcomeId, OutcomeKind, PartyRole,
    ScoreBreakdown, UserId,
};
use crate::error::MatchError;

/// A candidate dog with its computed compatibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The candidate's full profile.
    pub dog: DogProfile,
    /// Final compatibility score against the reference dog.
    pub score: u8,
    /// Per-factor contributions behind the score.
    pub breakdown: ScoreBreakdown,
}

/// Parameters for recording a match outcome.
#[derive(Debug, Clone)]
pub struct OutcomeSubmission {
    /// The submitter's participating dog. Must be the female side.
    pub verified_by_dog_id: DogId,
    /// What happened.
    pub outcome: OutcomeKind,
    /// Litter size. Retained only for successful outcomes.
    pub litter_size: Option<u32>,
    /// Free-text notes from the verifier.
    pub notes: Option<String>,
}

/// Orchestration layer for candidate discovery and the match lifecycle.
///
/// Stateless coordinator: owns references to the two registries for state
/// and an [`EventBus`] for event emission. Every mutation method follows
/// the pattern: acquire lock → validate → apply the transition → update
/// counters → emit events → return the actor's view.
#[derive(Debug, Clone)]
pub struct MatchService {
    dogs: Arc<DogRegistry>,
    matches: Arc<MatchRegistry>,
    event_bus: EventBus,
}

impl MatchService {
    /// Creates a new `MatchService`.
    #[must_use]
    pub fn new(dogs: Arc<DogRegistry>, matches: Arc<MatchRegistry>, event_bus: EventBus) -> Self {
        Self {
            dogs,
            matches,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the dog registry.
    #[must_use]
    pub fn dogs(&self) -> &Arc<DogRegistry> {
        &self.dogs
    }

    /// Returns a reference to the match registry.
    #[must_use]
    pub fn matches(&self) -> &Arc<MatchRegistry> {
        &self.matches
    }

    /// Ranks breeding candidates for one of the viewer's dogs.
    ///
    /// Candidates are visible dogs of other owners scoring above zero
    /// against the reference dog, ordered by score descending (ties broken
    /// by dog ID for a stable order). With `available_only`, dogs already
    /// connected to the reference dog by an unresolved request are
    /// excluded.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DogNotFound`] for an unknown reference dog and
    /// [`MatchError::Authorization`] when the viewer does not own it.
    pub async fn candidates_for(
        &self,
        viewer: UserId,
        dog_id: DogId,
        available_only: bool,
    ) -> Result<Vec<ScoredCandidate>, MatchError> {
        let reference = self.profile(dog_id).await?;
        if reference.owner_id != viewer {
            return Err(MatchError::Authorization(
                "you may only browse candidates for your own dog".to_string(),
            ));
        }

        let pool = self.dogs.visible_candidates_for(viewer).await;
        let mut candidates = Vec::new();
        for candidate in pool {
            let breakdown = score_breakdown(&reference.attributes, &candidate.attributes);
            if breakdown.total == 0 {
                continue;
            }
            if available_only
                && self
                    .matches
                    .has_open_match_between(reference.id, candidate.id)
                    .await
            {
                continue;
            }
            candidates.push(ScoredCandidate {
                dog: candidate,
                score: breakdown.total,
                breakdown,
            });
        }
        candidates.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.dog.id.cmp(&b.dog.id)));
        Ok(candidates)
    }

    /// Creates a match request from the actor's dog toward another dog.
    ///
    /// The new request starts `pending` and bumps the request counter on
    /// both dogs. Returns the requester's view of the created match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DogNotFound`] for unknown dogs,
    /// [`MatchError::Authorization`] when the actor does not own the
    /// requesting dog, and [`MatchError::Validation`] for a self-pairing, a
    /// same-owner pairing, a hidden target, an incompatible (zero-score)
    /// pairing, or a pair already connected by an unresolved request.
    pub async fn create_match(
        &self,
        actor: UserId,
        requester_dog_id: DogId,
        requested_dog_id: DogId,
        contact_id: Option<uuid::Uuid>,
        notes: Option<String>,
    ) -> Result<MatchView, MatchError> {
        if requester_dog_id == requested_dog_id {
            return Err(MatchError::Validation(
                "a dog cannot be matched with itself".to_string(),
            ));
        }
        let requester_dog = self.profile(requester_dog_id).await?;
        if requester_dog.owner_id != actor {
            return Err(MatchError::Authorization(
                "you may only request matches for your own dog".to_string(),
            ));
        }
        let requested_dog = self.profile(requested_dog_id).await?;
        if requested_dog.owner_id == actor {
            return Err(MatchError::Validation(
                "both dogs belong to the same owner".to_string(),
            ));
        }
        if !requested_dog.visible {
            return Err(MatchError::Validation(
                "this dog is not accepting match requests".to_string(),
            ));
        }
        let breakdown = score_breakdown(&requester_dog.attributes, &requested_dog.attributes);
        if breakdown.total == 0 {
            return Err(MatchError::Validation(
                "these dogs are not a compatible pairing".to_string(),
            ));
        }
        if self
            .matches
            .has_open_match_between(requester_dog_id, requested_dog_id)
            .await
        {
            return Err(MatchError::Validation(
                "an open match request already exists between these dogs".to_string(),
            ));
        }

        let request = MatchRequest::new(NewMatchRequest {
            requester_user_id: actor,
            requested_user_id: requested_dog.owner_id,
            requester_dog_id,
            requested_dog_id,
            contact_id,
            requester_notes: notes,
        });
        let match_id = self.matches.insert(request.clone()).await?;

        self.update_dog_stats([requester_dog_id, requested_dog_id], |dog| {
            dog.stats.match_requests_count = dog.stats.match_requests_count.saturating_add(1);
        })
        .await;

        let _ = self.event_bus.publish(MatchEvent::MatchRequested {
            match_id,
            requester_user_id: actor,
            requested_user_id: requested_dog.owner_id,
            requester_dog_id,
            requested_dog_id,
            requester_dog_name: requester_dog.name.clone(),
            requested_dog_name: requested_dog.name.clone(),
            compatibility_score: breakdown.total,
            timestamp: Utc::now(),
        });

        tracing::info!(
            %match_id,
            %requester_dog_id,
            %requested_dog_id,
            score = breakdown.total,
            "match requested"
        );
        Ok(MatchView::project(
            &request,
            PartyRole::Requester,
            DogSummary::from(&requester_dog),
            DogSummary::from(&requested_dog),
            breakdown.total,
        ))
    }

    /// Applies a status transition on behalf of `actor`.
    ///
    /// When the requested party responds with a note, the note is stored
    /// alongside the response. Accepting bumps the accept counter on both
    /// dogs. Returns the actor's view of the updated match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] for an unknown match or a
    /// non-participant actor, [`MatchError::StateConflict`] for an edge the
    /// state machine does not allow, and [`MatchError::Authorization`] when
    /// the edge belongs to the other party (or to outcome submission).
    pub async fn update_status(
        &self,
        actor: UserId,
        match_id: MatchId,
        target: MatchStatus,
        note: Option<String>,
    ) -> Result<MatchView, MatchError> {
        let entry_lock = self.matches.get(match_id).await?;
        let mut request = entry_lock.write().await;
        let Some(role) = request.role_of(actor) else {
            return Err(MatchError::MatchNotFound(match_id));
        };

        let from = request.status;
        request.transition(target, role)?;
        if role == PartyRole::Requested && note.is_some() {
            request.responder_notes = note;
        }
        let snapshot = request.clone();
        drop(request);

        if target == MatchStatus::Accepted {
            self.update_dog_stats([snapshot.requester_dog_id, snapshot.requested_dog_id], |dog| {
                dog.stats.match_accept_count = dog.stats.match_accept_count.saturating_add(1);
            })
            .await;
        }

        let _ = self.event_bus.publish(MatchEvent::MatchStatusChanged {
            match_id,
            from,
            to: target,
            actor_user_id: actor,
            requester_user_id: snapshot.requester_user_id,
            requested_user_id: snapshot.requested_user_id,
            timestamp: Utc::now(),
        });

        tracing::info!(%match_id, %from, to = %target, "match status changed");
        self.project_for(&snapshot, role).await
    }

    /// Records the outcome of a match awaiting confirmation.
    ///
    /// The whole operation runs under the match's write lock: precondition
    /// checks, outcome insertion, and the finalizing transition are one
    /// atomic step, so two concurrent submissions cannot both succeed.
    /// Returns the submitter's view of the finalized match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] for an unknown match or a
    /// non-participant actor, [`MatchError::Validation`] when the verifying
    /// dog is not on the match, [`MatchError::Authorization`] when it is
    /// not the actor's own dog or not the female side, and
    /// [`MatchError::StateConflict`] unless the match is currently awaiting
    /// confirmation (which also rejects a second outcome).
    pub async fn submit_outcome(
        &self,
        actor: UserId,
        match_id: MatchId,
        submission: OutcomeSubmission,
    ) -> Result<MatchView, MatchError> {
        let entry_lock = self.matches.get(match_id).await?;
        let mut request = entry_lock.write().await;
        let Some(role) = request.role_of(actor) else {
            return Err(MatchError::MatchNotFound(match_id));
        };

        if !request.involves_dog(submission.verified_by_dog_id) {
            return Err(MatchError::Validation(
                "the verifying dog is not part of this match".to_string(),
            ));
        }
        if request.dog_of(role) != submission.verified_by_dog_id {
            return Err(MatchError::Authorization(
                "the verifying dog must be your own dog on this match".to_string(),
            ));
        }
        let verifier = self.profile(submission.verified_by_dog_id).await?;
        if verifier.attributes.gender != Some(Gender::Female) {
            return Err(MatchError::Authorization(
                "only the owner of the female dog may record the outcome".to_string(),
            ));
        }

        let litter_size = if submission.outcome == OutcomeKind::Success {
            submission.litter_size
        } else {
            None
        };
        request.record_outcome(MatchOutcome {
            id: OutcomeId::new(),
            match_id,
            verified_by_user_id: actor,
            verified_by_dog_id: submission.verified_by_dog_id,
            outcome: submission.outcome,
            litter_size,
            notes: submission.notes,
            recorded_at: Utc::now(),
        })?;
        let snapshot = request.clone();
        drop(request);

        self.bump_completion_counters(&snapshot).await;

        if let Some(recorded) = &snapshot.outcome {
            let _ = self.event_bus.publish(MatchEvent::OutcomeRecorded {
                match_id,
                outcome_id: recorded.id,
                verified_by_user_id: recorded.verified_by_user_id,
                verified_by_dog_id: recorded.verified_by_dog_id,
                requester_user_id: snapshot.requester_user_id,
                requested_user_id: snapshot.requested_user_id,
                outcome: recorded.outcome,
                litter_size: recorded.litter_size,
                final_status: snapshot.status,
                timestamp: Utc::now(),
            });
            tracing::info!(%match_id, outcome = %recorded.outcome, "match outcome recorded");
        }

        self.project_for(&snapshot, role).await
    }

    /// Returns the viewer's matches as groupings plus status counts.
    ///
    /// Views are ordered by the last status change, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DogNotFound`] if a participating dog has gone
    /// missing from the registry.
    pub async fn my_matches(
        &self,
        viewer: UserId,
    ) -> Result<(MatchGroups, MatchCounts), MatchError> {
        let mut requests = self.matches.list_for_user(viewer).await;
        requests.sort_by(|a, b| {
            b.timestamps
                .last_status_changed_at
                .cmp(&a.timestamps.last_status_changed_at)
        });

        let mut views = Vec::with_capacity(requests.len());
        for request in &requests {
            let Some(role) = request.role_of(viewer) else {
                continue;
            };
            views.push(self.project_for(request, role).await?);
        }
        let counts = MatchCounts::tally(&views);
        Ok((MatchGroups::partition(views), counts))
    }

    /// Returns one match projected onto the viewer's side.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] for an unknown match or a
    /// non-participant viewer.
    pub async fn match_view(
        &self,
        viewer: UserId,
        match_id: MatchId,
    ) -> Result<MatchView, MatchError> {
        let entry_lock = self.matches.get(match_id).await?;
        let request = entry_lock.read().await.clone();
        let Some(role) = request.role_of(viewer) else {
            return Err(MatchError::MatchNotFound(match_id));
        };
        self.project_for(&request, role).await
    }

    async fn profile(&self, dog_id: DogId) -> Result<DogProfile, MatchError> {
        let entry_lock = self.dogs.get(dog_id).await?;
        let profile = entry_lock.read().await;
        Ok(profile.clone())
    }

    async fn project_for(
        &self,
        request: &MatchRequest,
        role: PartyRole,
    ) -> Result<MatchView, MatchError> {
        let partner_role = match role {
            PartyRole::Requester => PartyRole::Requested,
            PartyRole::Requested => PartyRole::Requester,
        };
        let my_dog = self.profile(request.dog_of(role)).await?;
        let partner_dog = self.profile(request.dog_of(partner_role)).await?;
        let score = compatibility_score(&my_dog.attributes, &partner_dog.attributes);
        Ok(MatchView::project(
            request,
            role,
            DogSummary::from(&my_dog),
            DogSummary::from(&partner_dog),
            score,
        ))
    }

    /// Applies `mutate` to both dogs' stats, best effort.
    ///
    /// Counter updates run after the match transition has committed, so a
    /// missing dog is logged rather than turned into a failure.
    async fn update_dog_stats<F>(&self, dog_ids: [DogId; 2], mutate: F)
    where
        F: Fn(&mut DogProfile),
    {
        for dog_id in dog_ids {
            match self.dogs.get(dog_id).await {
                Ok(entry_lock) => {
                    let mut dog = entry_lock.write().await;
                    mutate(&mut dog);
                    dog.touch();
                }
                Err(_) => {
                    tracing::warn!(%dog_id, "dog missing during stats update");
                }
            }
        }
    }

    async fn bump_completion_counters(&self, request: &MatchRequest) {
        let Some(outcome) = request.outcome.clone() else {
            return;
        };
        self.update_dog_stats([request.requester_dog_id, request.requested_dog_id], |dog| {
            dog.stats.match_completed_count = dog.stats.match_completed_count.saturating_add(1);
            match outcome.outcome {
                OutcomeKind::Success => {
                    dog.stats.match_success_count = dog.stats.match_success_count.saturating_add(1);
                    if dog.id == outcome.verified_by_dog_id {
                        dog.stats.female_successful_matings =
                            dog.stats.female_successful_matings.saturating_add(1);
                    }
                }
                OutcomeKind::Failed | OutcomeKind::NoShow => {
                    dog.stats.match_failure_count = dog.stats.match_failure_count.saturating_add(1);
                }
            }
        })
        .await;
    }
}
