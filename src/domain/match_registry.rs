//! Concurrent match request storage with per-match fine-grained locking.
//!
//! [`MatchRegistry`] mirrors the layout of [`super::DogRegistry`]: an outer
//! `RwLock<HashMap>` with each request behind its own
//! [`tokio::sync::RwLock`]. Holding a request's write lock serializes
//! conflicting transitions on that match, which is what keeps outcome
//! submission atomic.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::match_request::MatchRequest;
use super::{DogId, MatchId, UserId};
use crate::error::MatchError;

/// Central store for all match requests.
///
/// Requests are never removed; terminal statuses are still part of a
/// user's history.
#[derive(Debug)]
pub struct MatchRegistry {
    matches: RwLock<HashMap<MatchId, Arc<RwLock<MatchRequest>>>>,
}

impl MatchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matches: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new match request into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Validation`] if a request with the same ID
    /// already exists (should never happen with UUID v4).
    pub async fn insert(&self, request: MatchRequest) -> Result<MatchId, MatchError> {
        let match_id = request.id;
        let mut map = self.matches.write().await;
        if map.contains_key(&match_id) {
            return Err(MatchError::Validation(format!(
                "match {match_id} already exists"
            )));
        }
        map.insert(match_id, Arc::new(RwLock::new(request)));
        Ok(match_id)
    }

    /// Returns a shared reference to the request behind a per-match lock.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] if no request with the given
    /// ID exists.
    pub async fn get(&self, match_id: MatchId) -> Result<Arc<RwLock<MatchRequest>>, MatchError> {
        let map = self.matches.read().await;
        map.get(&match_id)
            .cloned()
            .ok_or(MatchError::MatchNotFound(match_id))
    }

    /// Returns every request where `user_id` is one of the two parties.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<MatchRequest> {
        let map = self.matches.read().await;
        let mut requests = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if entry.role_of(user_id).is_some() {
                requests.push(entry.clone());
            }
        }
        requests
    }

    /// Whether an unresolved request already connects these two dogs.
    ///
    /// Direction does not matter: a pending, accepted, or
    /// awaiting-confirmation request in either orientation counts.
    pub async fn has_open_match_between(&self, dog_a: DogId, dog_b: DogId) -> bool {
        let map = self.matches.read().await;
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if !entry.status.is_terminal()
                && entry.involves_dog(dog_a)
                && entry.involves_dog(dog_b)
            {
                return true;
            }
        }
        false
    }

    /// Returns a snapshot of every stored request.
    pub async fn all(&self) -> Vec<MatchRequest> {
        let map = self.matches.read().await;
        let mut requests = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            requests.push(entry.clone());
        }
        requests
    }

    /// Returns the number of stored requests.
    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    /// Returns `true` if the registry contains no requests.
    pub async fn is_empty(&self) -> bool {
        self.matches.read().await.is_empty()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::match_request::{MatchStatus, NewMatchRequest, PartyRole};

    fn make_request(requester_dog: DogId, requested_dog: DogId) -> MatchRequest {
        MatchRequest::new(NewMatchRequest {
            requester_user_id: UserId::new(),
            requested_user_id: UserId::new(),
            requester_dog_id: requester_dog,
            requested_dog_id: requested_dog,
            contact_id: None,
            requester_notes: None,
        })
    }

    #[tokio::test]
    async fn insert_and_get() {
        let registry = MatchRegistry::new();
        let request = make_request(DogId::new(), DogId::new());
        let id = request.id;

        let result = registry.insert(request).await;
        assert!(result.is_ok());

        let fetched = registry.get(id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let registry = MatchRegistry::new();
        let result = registry.get(MatchId::new()).await;
        assert!(matches!(result, Err(MatchError::MatchNotFound(_))));
    }

    #[tokio::test]
    async fn list_for_user_returns_both_directions() {
        let registry = MatchRegistry::new();
        let user = UserId::new();

        let mut sent = make_request(DogId::new(), DogId::new());
        sent.requester_user_id = user;
        let mut received = make_request(DogId::new(), DogId::new());
        received.requested_user_id = user;
        let unrelated = make_request(DogId::new(), DogId::new());

        let _ = registry.insert(sent).await;
        let _ = registry.insert(received).await;
        let _ = registry.insert(unrelated).await;

        let listed = registry.list_for_user(user).await;
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn open_match_blocks_either_direction() {
        let registry = MatchRegistry::new();
        let dog_a = DogId::new();
        let dog_b = DogId::new();
        let _ = registry.insert(make_request(dog_a, dog_b)).await;

        assert!(registry.has_open_match_between(dog_a, dog_b).await);
        assert!(registry.has_open_match_between(dog_b, dog_a).await);
        assert!(!registry.has_open_match_between(dog_a, DogId::new()).await);
    }

    #[tokio::test]
    async fn resolved_match_no_longer_blocks() {
        let registry = MatchRegistry::new();
        let dog_a = DogId::new();
        let dog_b = DogId::new();
        let request = make_request(dog_a, dog_b);
        let id = request.id;
        let _ = registry.insert(request).await;

        let entry = registry.get(id).await;
        let Ok(entry) = entry else {
            panic!("match should exist");
        };
        {
            let mut request = entry.write().await;
            let declined = request.transition(MatchStatus::Declined, PartyRole::Requested);
            assert!(declined.is_ok());
        }

        assert!(!registry.has_open_match_between(dog_a, dog_b).await);
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = MatchRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let _ = registry.insert(make_request(DogId::new(), DogId::new())).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }
}
