//! Dog profile service: registration, lookup, and visibility.

use std::sync::Arc;

use crate::domain::{DogAttributes, DogId, DogProfile, DogRegistry, UserId};
use crate::error::MatchError;

/// Minimum accepted age for a breeding profile, in years.
const MIN_BREEDING_AGE_YEARS: f64 = 2.0;
/// Maximum accepted age for a breeding profile, in years.
const MAX_BREEDING_AGE_YEARS: f64 = 7.0;

/// Orchestration layer for dog profile operations.
///
/// Profiles are append-only apart from visibility and the breeding
/// counters, which the match lifecycle maintains.
#[derive(Debug, Clone)]
pub struct DogService {
    registry: Arc<DogRegistry>,
}

impl DogService {
    /// Creates a new `DogService`.
    #[must_use]
    pub fn new(registry: Arc<DogRegistry>) -> Self {
        Self { registry }
    }

    /// Returns a reference to the inner [`DogRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<DogRegistry> {
        &self.registry
    }

    /// Registers a new dog profile owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Validation`] when the name is blank, the age
    /// falls outside the accepted breeding range, or the weight is not
    /// positive.
    pub async fn register_dog(
        &self,
        owner_id: UserId,
        name: &str,
        attributes: DogAttributes,
    ) -> Result<DogProfile, MatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchError::Validation("dog name must not be blank".to_string()));
        }
        if let Some(age) = attributes.age_years
            && !(MIN_BREEDING_AGE_YEARS..=MAX_BREEDING_AGE_YEARS).contains(&age)
        {
            return Err(MatchError::Validation(format!(
                "age must be between {MIN_BREEDING_AGE_YEARS} and {MAX_BREEDING_AGE_YEARS} years"
            )));
        }
        if let Some(weight) = attributes.weight_kg
            && weight <= 0.0
        {
            return Err(MatchError::Validation(
                "weight must be positive".to_string(),
            ));
        }

        let profile = DogProfile::new(owner_id, name.to_string(), attributes);
        let dog_id = self.registry.insert(profile.clone()).await?;

        tracing::info!(%dog_id, %owner_id, "dog registered");
        Ok(profile)
    }

    /// Returns a snapshot of the profile with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DogNotFound`] if no such profile exists.
    pub async fn get_dog(&self, dog_id: DogId) -> Result<DogProfile, MatchError> {
        let entry_lock = self.registry.get(dog_id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.clone())
    }

    /// Returns all profiles owned by `owner_id`.
    pub async fn list_my_dogs(&self, owner_id: UserId) -> Vec<DogProfile> {
        self.registry.list_owned_by(owner_id).await
    }

    /// Shows or hides a dog in other owners' candidate listings.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DogNotFound`] if no such profile exists and
    /// [`MatchError::Authorization`] when `actor` does not own it.
    pub async fn set_visibility(
        &self,
        actor: UserId,
        dog_id: DogId,
        visible: bool,
    ) -> Result<DogProfile, MatchError> {
        let entry_lock = self.registry.get(dog_id).await?;
        let mut entry = entry_lock.write().await;
        if entry.owner_id != actor {
            return Err(MatchError::Authorization(
                "only the owner may change a dog's visibility".to_string(),
            ));
        }
        entry.visible = visible;
        entry.touch();
        let profile = entry.clone();
        drop(entry);

        tracing::info!(%dog_id, visible, "dog visibility changed");
        Ok(profile)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    fn make_service() -> DogService {
        DogService::new(Arc::new(DogRegistry::new()))
    }

    fn attributes() -> DogAttributes {
        DogAttributes {
            breed: Some("Beagle".to_string()),
            gender: Some(Gender::Female),
            age_years: Some(3.0),
            weight_kg: Some(11.0),
            ..DogAttributes::default()
        }
    }

    #[tokio::test]
    async fn register_and_get() {
        let service = make_service();
        let owner = UserId::new();

        let registered = service.register_dog(owner, "Luna", attributes()).await;
        let Ok(registered) = registered else {
            panic!("registration failed");
        };
        assert!(registered.visible);

        let fetched = service.get_dog(registered.id).await;
        let Ok(fetched) = fetched else {
            panic!("lookup failed");
        };
        assert_eq!(fetched.name, "Luna");
        assert_eq!(fetched.owner_id, owner);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let service = make_service();
        let result = service.register_dog(UserId::new(), "   ", attributes()).await;
        assert!(matches!(result, Err(MatchError::Validation(_))));
    }

    #[tokio::test]
    async fn age_outside_breeding_range_is_rejected() {
        let service = make_service();
        for age in [1.0, 7.5, 12.0] {
            let mut attrs = attributes();
            attrs.age_years = Some(age);
            let result = service.register_dog(UserId::new(), "Luna", attrs).await;
            assert!(matches!(result, Err(MatchError::Validation(_))), "age {age}");
        }
    }

    #[tokio::test]
    async fn missing_age_is_accepted() {
        let service = make_service();
        let mut attrs = attributes();
        attrs.age_years = None;
        let result = service.register_dog(UserId::new(), "Luna", attrs).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_positive_weight_is_rejected() {
        let service = make_service();
        let mut attrs = attributes();
        attrs.weight_kg = Some(0.0);
        let result = service.register_dog(UserId::new(), "Luna", attrs).await;
        assert!(matches!(result, Err(MatchError::Validation(_))));
    }

    #[tokio::test]
    async fn list_my_dogs_returns_only_mine() {
        let service = make_service();
        let owner = UserId::new();
        let _ = service.register_dog(owner, "Luna", attributes()).await;
        let _ = service.register_dog(owner, "Nala", attributes()).await;
        let _ = service.register_dog(UserId::new(), "Rex", attributes()).await;

        let mine = service.list_my_dogs(owner).await;
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn owner_can_toggle_visibility() {
        let service = make_service();
        let owner = UserId::new();
        let Ok(dog) = service.register_dog(owner, "Luna", attributes()).await else {
            panic!("registration failed");
        };

        let hidden = service.set_visibility(owner, dog.id, false).await;
        let Ok(hidden) = hidden else {
            panic!("visibility change failed");
        };
        assert!(!hidden.visible);
        assert!(hidden.updated_at >= dog.updated_at);
    }

    #[tokio::test]
    async fn non_owner_cannot_toggle_visibility() {
        let service = make_service();
        let Ok(dog) = service
            .register_dog(UserId::new(), "Luna", attributes())
            .await
        else {
            panic!("registration failed");
        };

        let result = service.set_visibility(UserId::new(), dog.id, false).await;
        assert!(matches!(result, Err(MatchError::Authorization(_))));
    }
}
