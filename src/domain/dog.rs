//! Dog profiles and breeding statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DogId, UserId};

/// Biological sex of a dog, as far as breeding is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male dog (stud side of a pairing).
    Male,
    /// Female dog (dam side of a pairing).
    Female,
}

impl Gender {
    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse size class on a four-step ordinal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    /// Up to roughly 10 kg.
    Small,
    /// Roughly 10 to 25 kg.
    Medium,
    /// Roughly 25 to 45 kg.
    Large,
    /// Above roughly 45 kg.
    Giant,
}

impl SizeClass {
    /// Position on the ordinal scale, smallest first.
    #[must_use]
    pub const fn scale_position(&self) -> u8 {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
            Self::Giant => 3,
        }
    }

    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Giant => "giant",
        }
    }
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free-form temperament traits, compared case-insensitively when scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Temperament {
    /// Activity level, e.g. "high", "moderate", "low".
    pub activity_level: Option<String>,
    /// Sociability toward other dogs, e.g. "friendly", "reserved".
    pub sociability: Option<String>,
    /// Trainability, e.g. "eager", "independent".
    pub trainability: Option<String>,
}

/// Physical and behavioral attributes that feed the compatibility scorer.
///
/// Every field is optional. A missing attribute never disqualifies a dog;
/// it simply contributes nothing to the corresponding score component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DogAttributes {
    /// Breed name, matched case-insensitively against the breed group table.
    pub breed: Option<String>,
    /// Biological sex. Required in practice for any pairing to score above zero.
    pub gender: Option<Gender>,
    /// Age in years, fractional for dogs under a year.
    pub age_years: Option<f64>,
    /// Ordinal size class.
    pub size: Option<SizeClass>,
    /// Weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Coat type, e.g. "double", "wire", "curly".
    pub coat_type: Option<String>,
    /// Primary coat color.
    pub color: Option<String>,
    /// Temperament traits.
    #[serde(default)]
    pub temperament: Temperament,
}

/// Lifetime breeding counters maintained by the match lifecycle.
///
/// All counters start at zero when a profile is registered and only ever
/// increase. `female_successful_matings` stays zero for male dogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingStats {
    /// Match requests this dog has appeared in, either side.
    pub match_requests_count: u32,
    /// Requests involving this dog that reached the accepted state.
    pub match_accept_count: u32,
    /// Requests involving this dog that reached a completed state.
    pub match_completed_count: u32,
    /// Completed requests that ended in a confirmed successful mating.
    pub match_success_count: u32,
    /// Completed requests that ended in failure or no-show.
    pub match_failure_count: u32,
    /// Successful matings where this dog was the verified female.
    pub female_successful_matings: u32,
}

impl BreedingStats {
    /// Share of completed matches that succeeded, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` when no match has completed yet.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.match_completed_count == 0 {
            return 0.0;
        }
        f64::from(self.match_success_count) / f64::from(self.match_completed_count)
    }
}

/// A registered dog profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogProfile {
    /// Unique identifier, assigned at registration.
    pub id: DogId,
    /// Owner of the profile. Only the owner may act for this dog.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Scoring attributes.
    pub attributes: DogAttributes,
    /// Whether the dog appears in other owners' candidate listings.
    pub visible: bool,
    /// Lifetime breeding counters.
    pub stats: BreedingStats,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DogProfile {
    /// Creates a new profile with fresh id, zeroed stats, and `visible` on.
    #[must_use]
    pub fn new(owner_id: UserId, name: String, attributes: DogAttributes) -> Self {
        let now = Utc::now();
        Self {
            id: DogId::new(),
            owner_id,
            name,
            attributes,
            visible: true,
            stats: BreedingStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Compact dog card used in match views and candidate listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogSummary {
    /// Dog identifier.
    pub id: DogId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Breed name, if recorded.
    pub breed: Option<String>,
    /// Gender, if recorded.
    pub gender: Option<Gender>,
}

impl From<&DogProfile> for DogSummary {
    fn from(profile: &DogProfile) -> Self {
        Self {
            id: profile.id,
            owner_id: profile.owner_id,
            name: profile.name.clone(),
            breed: profile.attributes.breed.clone(),
            gender: profile.attributes.gender,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_profile() -> DogProfile {
        DogProfile::new(
            UserId::new(),
            "Rex".to_string(),
            DogAttributes {
                breed: Some("Labrador Retriever".to_string()),
                gender: Some(Gender::Male),
                age_years: Some(3.0),
                size: Some(SizeClass::Large),
                weight_kg: Some(30.0),
                ..DogAttributes::default()
            },
        )
    }

    #[test]
    fn new_profile_starts_visible_with_zeroed_stats() {
        let profile = make_profile();
        assert!(profile.visible);
        assert_eq!(profile.stats, BreedingStats::default());
        assert_eq!(profile.created_at, profile.updated_at);
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut profile = make_profile();
        let before = profile.updated_at;
        profile.touch();
        assert!(profile.updated_at >= before);
    }

    #[test]
    fn success_rate_is_zero_without_completions() {
        let stats = BreedingStats::default();
        assert!(stats.success_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn success_rate_divides_successes_by_completions() {
        let stats = BreedingStats {
            match_completed_count: 4,
            match_success_count: 3,
            ..BreedingStats::default()
        };
        assert!((stats.success_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_projects_card_fields() {
        let profile = make_profile();
        let summary = DogSummary::from(&profile);
        assert_eq!(summary.id, profile.id);
        assert_eq!(summary.owner_id, profile.owner_id);
        assert_eq!(summary.name, "Rex");
        assert_eq!(summary.breed.as_deref(), Some("Labrador Retriever"));
        assert_eq!(summary.gender, Some(Gender::Male));
    }

    #[test]
    fn size_class_positions_are_ordered() {
        assert!(SizeClass::Small.scale_position() < SizeClass::Medium.scale_position());
        assert!(SizeClass::Medium.scale_position() < SizeClass::Large.scale_position());
        assert!(SizeClass::Large.scale_position() < SizeClass::Giant.scale_position());
    }

    #[test]
    fn gender_serializes_lowercase() {
        let json = serde_json::to_string(&Gender::Female).ok();
        assert_eq!(json.as_deref(), Some("\"female\""));
    }
}
