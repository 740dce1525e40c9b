//! Concurrent dog profile storage with per-profile fine-grained locking.
//!
//! [`DogRegistry`] stores all registered profiles in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. This
//! allows concurrent reads on the same profile and concurrent writes on
//! different profiles.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::DogId;
use super::dog::DogProfile;
use super::UserId;
use crate::error::MatchError;

/// Central store for all registered dog profiles.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<DogProfile>>` for fine-grained per-dog locking.
///
/// # Concurrency
///
/// - Multiple tasks may read the same profile concurrently.
/// - Writes to different profiles are concurrent.
/// - Writes to the same profile are serialized.
#[derive(Debug)]
pub struct DogRegistry {
    dogs: RwLock<HashMap<DogId, Arc<RwLock<DogProfile>>>>,
}

impl DogRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dogs: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new profile into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Validation`] if a profile with the same ID
    /// already exists (should never happen with UUID v4).
    pub async fn insert(&self, profile: DogProfile) -> Result<DogId, MatchError> {
        let dog_id = profile.id;
        let mut map = self.dogs.write().await;
        if map.contains_key(&dog_id) {
            return Err(MatchError::Validation(format!(
                "dog {dog_id} already exists"
            )));
        }
        map.insert(dog_id, Arc::new(RwLock::new(profile)));
        Ok(dog_id)
    }

    /// Returns a shared reference to the profile behind a per-dog lock.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DogNotFound`] if no profile with the given ID
    /// exists.
    pub async fn get(&self, dog_id: DogId) -> Result<Arc<RwLock<DogProfile>>, MatchError> {
        let map = self.dogs.read().await;
        map.get(&dog_id)
            .cloned()
            .ok_or(MatchError::DogNotFound(dog_id))
    }

    /// Returns all profiles owned by `owner_id`.
    pub async fn list_owned_by(&self, owner_id: UserId) -> Vec<DogProfile> {
        let map = self.dogs.read().await;
        let mut profiles = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if entry.owner_id == owner_id {
                profiles.push(entry.clone());
            }
        }
        profiles
    }

    /// Returns all visible profiles owned by someone other than `viewer`.
    ///
    /// This is the candidate base set: hidden profiles and the viewer's own
    /// dogs never appear.
    pub async fn visible_candidates_for(&self, viewer: UserId) -> Vec<DogProfile> {
        let map = self.dogs.read().await;
        let mut profiles = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if entry.visible && entry.owner_id != viewer {
                profiles.push(entry.clone());
            }
        }
        profiles
    }

    /// Returns a snapshot of every registered profile.
    pub async fn all(&self) -> Vec<DogProfile> {
        let map = self.dogs.read().await;
        let mut profiles = Vec::new();
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            profiles.push(entry.clone());
        }
        profiles
    }

    /// Returns the number of registered profiles.
    pub async fn len(&self) -> usize {
        self.dogs.read().await.len()
    }

    /// Returns `true` if the registry contains no profiles.
    pub async fn is_empty(&self) -> bool {
        self.dogs.read().await.is_empty()
    }
}

impl Default for DogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::dog::{DogAttributes, Gender};

    fn make_profile(owner_id: UserId) -> DogProfile {
        DogProfile::new(
            owner_id,
            "Rex".to_string(),
            DogAttributes {
                breed: Some("Boxer".to_string()),
                gender: Some(Gender::Male),
                ..DogAttributes::default()
            },
        )
    }

    #[tokio::test]
    async fn insert_and_get() {
        let registry = DogRegistry::new();
        let profile = make_profile(UserId::new());
        let id = profile.id;

        let result = registry.insert(profile).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap_or_default(), id);

        let fetched = registry.get(id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let registry = DogRegistry::new();
        let result = registry.get(DogId::new()).await;
        assert!(matches!(result, Err(MatchError::DogNotFound(_))));
    }

    #[tokio::test]
    async fn list_owned_by_filters_on_owner() {
        let registry = DogRegistry::new();
        let owner = UserId::new();
        let _ = registry.insert(make_profile(owner)).await;
        let _ = registry.insert(make_profile(owner)).await;
        let _ = registry.insert(make_profile(UserId::new())).await;

        let owned = registry.list_owned_by(owner).await;
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|p| p.owner_id == owner));
    }

    #[tokio::test]
    async fn candidates_exclude_hidden_and_own_dogs() {
        let registry = DogRegistry::new();
        let viewer = UserId::new();
        let _ = registry.insert(make_profile(viewer)).await;

        let other_owner = UserId::new();
        let visible = make_profile(other_owner);
        let visible_id = visible.id;
        let _ = registry.insert(visible).await;

        let mut hidden = make_profile(other_owner);
        hidden.visible = false;
        let _ = registry.insert(hidden).await;

        let candidates = registry.visible_candidates_for(viewer).await;
        assert_eq!(candidates.len(), 1);
        assert!(candidates.iter().any(|p| p.id == visible_id));
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = DogRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let _ = registry.insert(make_profile(UserId::new())).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }
}
