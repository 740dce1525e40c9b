//! Breeding compatibility scoring.
//!
//! A pure, deterministic function over two sets of [`DogAttributes`]
//! producing an integer score in `0..=100`. A score of zero means the pair
//! is excluded from candidate listings entirely. The function never fails:
//! absent optional attributes degrade to their documented defaults instead
//! of erroring.
//!
//! Scores are additive. Opposite genders are the only hard requirement;
//! every other factor contributes points on top of the opposite-gender
//! baseline, capped at [`SCORE_MAX`].

use serde::Serialize;

use super::dog::{DogAttributes, SizeClass};

/// Maximum attainable compatibility score.
pub const SCORE_MAX: u8 = 100;

/// Baseline awarded once the opposite-gender gate passes.
const OPPOSITE_GENDER_BASE: f64 = 10.0;
/// Identical breed, compared case-insensitively.
const BREED_EXACT_BONUS: f64 = 20.0;
/// Different breeds that share a breed group.
const BREED_GROUP_BONUS: f64 = 10.0;
/// Age proximity ceiling; shrinks by [`AGE_PENALTY_PER_YEAR`].
const AGE_PROXIMITY_MAX: f64 = 15.0;
const AGE_PENALTY_PER_YEAR: f64 = 2.0;
/// Same size class.
const SIZE_SAME_BONUS: f64 = 15.0;
/// Adjacent size classes on the ordinal scale.
const SIZE_ADJACENT_BONUS: f64 = 7.0;
/// Weight proximity ceiling; shrinks by [`WEIGHT_PENALTY_PER_KG`].
const WEIGHT_PROXIMITY_MAX: f64 = 15.0;
const WEIGHT_PENALTY_PER_KG: f64 = 0.5;
/// Matching coat type.
const COAT_BONUS: f64 = 7.0;
/// Matching color.
const COLOR_BONUS: f64 = 3.0;
/// Matching activity level.
const ACTIVITY_BONUS: f64 = 7.0;
/// Matching sociability.
const SOCIABILITY_BONUS: f64 = 4.0;
/// Matching trainability.
const TRAINABILITY_BONUS: f64 = 4.0;

/// Kennel-club style breed group used for the partial breed bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreedGroup {
    /// Retrievers, spaniels, setters, pointers.
    Sporting,
    /// Scent and sight hounds.
    Hound,
    /// Guard, draft, and sled breeds.
    Working,
    /// Terriers.
    Terrier,
    /// Companion breeds under roughly 7 kg.
    Toy,
    /// Breeds that fit none of the historical working roles.
    NonSporting,
    /// Livestock herding breeds.
    Herding,
}

impl BreedGroup {
    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sporting => "sporting",
            Self::Hound => "hound",
            Self::Working => "working",
            Self::Terrier => "terrier",
            Self::Toy => "toy",
            Self::NonSporting => "non_sporting",
            Self::Herding => "herding",
        }
    }
}

impl std::fmt::Display for BreedGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All breed groups, in catalog order.
pub const ALL_BREED_GROUPS: [BreedGroup; 7] = [
    BreedGroup::Sporting,
    BreedGroup::Hound,
    BreedGroup::Working,
    BreedGroup::Terrier,
    BreedGroup::Toy,
    BreedGroup::NonSporting,
    BreedGroup::Herding,
];

/// Fixed breed-to-group assignment.
///
/// Breeds not listed here belong to no group and cannot earn the partial
/// breed bonus, however similar they may look to a listed breed.
static BREED_GROUP_TABLE: &[(&str, BreedGroup)] = &[
    ("labrador retriever", BreedGroup::Sporting),
    ("golden retriever", BreedGroup::Sporting),
    ("cocker spaniel", BreedGroup::Sporting),
    ("english springer spaniel", BreedGroup::Sporting),
    ("brittany", BreedGroup::Sporting),
    ("vizsla", BreedGroup::Sporting),
    ("weimaraner", BreedGroup::Sporting),
    ("irish setter", BreedGroup::Sporting),
    ("pointer", BreedGroup::Sporting),
    ("beagle", BreedGroup::Hound),
    ("dachshund", BreedGroup::Hound),
    ("basset hound", BreedGroup::Hound),
    ("bloodhound", BreedGroup::Hound),
    ("greyhound", BreedGroup::Hound),
    ("whippet", BreedGroup::Hound),
    ("rhodesian ridgeback", BreedGroup::Hound),
    ("irish wolfhound", BreedGroup::Hound),
    ("great dane", BreedGroup::Working),
    ("boxer", BreedGroup::Working),
    ("rottweiler", BreedGroup::Working),
    ("doberman pinscher", BreedGroup::Working),
    ("siberian husky", BreedGroup::Working),
    ("alaskan malamute", BreedGroup::Working),
    ("bernese mountain dog", BreedGroup::Working),
    ("saint bernard", BreedGroup::Working),
    ("newfoundland", BreedGroup::Working),
    ("mastiff", BreedGroup::Working),
    ("airedale terrier", BreedGroup::Terrier),
    ("bull terrier", BreedGroup::Terrier),
    ("jack russell terrier", BreedGroup::Terrier),
    ("scottish terrier", BreedGroup::Terrier),
    ("west highland white terrier", BreedGroup::Terrier),
    ("staffordshire bull terrier", BreedGroup::Terrier),
    ("chihuahua", BreedGroup::Toy),
    ("pomeranian", BreedGroup::Toy),
    ("pug", BreedGroup::Toy),
    ("papillon", BreedGroup::Toy),
    ("maltese", BreedGroup::Toy),
    ("shih tzu", BreedGroup::Toy),
    ("cavalier king charles spaniel", BreedGroup::Toy),
    ("yorkshire terrier", BreedGroup::Toy),
    ("bulldog", BreedGroup::NonSporting),
    ("french bulldog", BreedGroup::NonSporting),
    ("poodle", BreedGroup::NonSporting),
    ("dalmatian", BreedGroup::NonSporting),
    ("boston terrier", BreedGroup::NonSporting),
    ("chow chow", BreedGroup::NonSporting),
    ("shiba inu", BreedGroup::NonSporting),
    ("bichon frise", BreedGroup::NonSporting),
    ("german shepherd", BreedGroup::Herding),
    ("border collie", BreedGroup::Herding),
    ("australian shepherd", BreedGroup::Herding),
    ("belgian malinois", BreedGroup::Herding),
    ("shetland sheepdog", BreedGroup::Herding),
    ("pembroke welsh corgi", BreedGroup::Herding),
    ("collie", BreedGroup::Herding),
];

/// Looks up the breed group for a breed name, case-insensitively.
#[must_use]
pub fn breed_group(breed: &str) -> Option<BreedGroup> {
    let needle = breed.trim();
    BREED_GROUP_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|(_, group)| *group)
}

/// Breeds assigned to `group` in the lookup table, in table order.
#[must_use]
pub fn breeds_in_group(group: BreedGroup) -> Vec<&'static str> {
    BREED_GROUP_TABLE
        .iter()
        .filter(|(_, g)| *g == group)
        .map(|(name, _)| *name)
        .collect()
}

/// Per-factor contributions behind a compatibility score.
///
/// Returned alongside candidate listings so callers can explain a ranking.
/// When the gender gate fails, every contribution is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Whether the opposite-gender requirement was met.
    pub gender_gate_passed: bool,
    /// Opposite-gender baseline.
    pub base: f64,
    /// Breed contribution (exact or group bonus).
    pub breed: f64,
    /// Age proximity contribution.
    pub age: f64,
    /// Size class contribution.
    pub size: f64,
    /// Weight proximity contribution.
    pub weight: f64,
    /// Coat type contribution.
    pub coat: f64,
    /// Color contribution.
    pub color: f64,
    /// Combined temperament contribution.
    pub temperament: f64,
    /// Final capped and rounded score.
    pub total: u8,
}

/// Computes the compatibility score for a pair of dogs.
///
/// Symmetric: `compatibility_score(a, b) == compatibility_score(b, a)`.
#[must_use]
pub fn compatibility_score(a: &DogAttributes, b: &DogAttributes) -> u8 {
    score_breakdown(a, b).total
}

/// Computes the full per-factor breakdown for a pair of dogs.
///
/// Missing `age_years` or `weight_kg` substitute the value `0` into the
/// proximity formulas rather than skipping the term. One missing value
/// therefore usually zeroes the term through a large difference, while two
/// missing values earn full proximity points. Incomplete profiles ranking
/// oddly under this rule is accepted upstream behavior.
#[must_use]
pub fn score_breakdown(a: &DogAttributes, b: &DogAttributes) -> ScoreBreakdown {
    let (Some(gender_a), Some(gender_b)) = (a.gender, b.gender) else {
        return ScoreBreakdown::default();
    };
    if gender_a == gender_b {
        return ScoreBreakdown::default();
    }

    let base = OPPOSITE_GENDER_BASE;
    let breed = breed_component(a.breed.as_deref(), b.breed.as_deref());
    let age = proximity_component(
        a.age_years,
        b.age_years,
        AGE_PROXIMITY_MAX,
        AGE_PENALTY_PER_YEAR,
    );
    let size = size_component(a.size, b.size);
    let weight = proximity_component(
        a.weight_kg,
        b.weight_kg,
        WEIGHT_PROXIMITY_MAX,
        WEIGHT_PENALTY_PER_KG,
    );
    let coat = equality_bonus(a.coat_type.as_deref(), b.coat_type.as_deref(), COAT_BONUS);
    let color = equality_bonus(a.color.as_deref(), b.color.as_deref(), COLOR_BONUS);
    let temperament = equality_bonus(
        a.temperament.activity_level.as_deref(),
        b.temperament.activity_level.as_deref(),
        ACTIVITY_BONUS,
    ) + equality_bonus(
        a.temperament.sociability.as_deref(),
        b.temperament.sociability.as_deref(),
        SOCIABILITY_BONUS,
    ) + equality_bonus(
        a.temperament.trainability.as_deref(),
        b.temperament.trainability.as_deref(),
        TRAINABILITY_BONUS,
    );

    let sum = base + breed + age + size + weight + coat + color + temperament;
    let capped = sum.min(f64::from(SCORE_MAX));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = capped.round() as u8;

    ScoreBreakdown {
        gender_gate_passed: true,
        base,
        breed,
        age,
        size,
        weight,
        coat,
        color,
        temperament,
        total,
    }
}

fn breed_component(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a.trim().eq_ignore_ascii_case(b.trim()) {
        return BREED_EXACT_BONUS;
    }
    match (breed_group(a), breed_group(b)) {
        (Some(group_a), Some(group_b)) if group_a == group_b => BREED_GROUP_BONUS,
        _ => 0.0,
    }
}

/// Linear falloff from `max`, with absent values substituted by zero.
fn proximity_component(a: Option<f64>, b: Option<f64>, max: f64, penalty_per_unit: f64) -> f64 {
    let diff = (a.unwrap_or(0.0) - b.unwrap_or(0.0)).abs();
    (max - penalty_per_unit * diff).max(0.0)
}

fn size_component(a: Option<SizeClass>, b: Option<SizeClass>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    match a.scale_position().abs_diff(b.scale_position()) {
        0 => SIZE_SAME_BONUS,
        1 => SIZE_ADJACENT_BONUS,
        _ => 0.0,
    }
}

/// `bonus` when both values are present and equal, case-insensitively.
fn equality_bonus(a: Option<&str>, b: Option<&str>, bonus: f64) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.trim().eq_ignore_ascii_case(b.trim()) => bonus,
        _ => 0.0,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::dog::{Gender, Temperament};

    fn dog(gender: Option<Gender>) -> DogAttributes {
        DogAttributes {
            gender,
            ..DogAttributes::default()
        }
    }

    fn labrador_male() -> DogAttributes {
        DogAttributes {
            breed: Some("Labrador".to_string()),
            gender: Some(Gender::Male),
            age_years: Some(3.0),
            size: Some(SizeClass::Medium),
            weight_kg: Some(20.0),
            ..DogAttributes::default()
        }
    }

    fn labrador_female() -> DogAttributes {
        DogAttributes {
            breed: Some("Labrador".to_string()),
            gender: Some(Gender::Female),
            age_years: Some(4.0),
            size: Some(SizeClass::Medium),
            weight_kg: Some(22.0),
            ..DogAttributes::default()
        }
    }

    #[test]
    fn same_gender_scores_zero() {
        let a = dog(Some(Gender::Male));
        let b = dog(Some(Gender::Male));
        assert_eq!(compatibility_score(&a, &b), 0);

        let a = dog(Some(Gender::Female));
        let b = dog(Some(Gender::Female));
        assert_eq!(compatibility_score(&a, &b), 0);
    }

    #[test]
    fn missing_gender_scores_zero() {
        let a = dog(None);
        let b = dog(Some(Gender::Female));
        assert_eq!(compatibility_score(&a, &b), 0);
        assert_eq!(compatibility_score(&b, &a), 0);
        assert_eq!(compatibility_score(&a, &a), 0);
    }

    #[test]
    fn failed_gate_zeroes_every_factor() {
        let a = labrador_male();
        let mut b = labrador_female();
        b.gender = Some(Gender::Male);
        let breakdown = score_breakdown(&a, &b);
        assert!(!breakdown.gender_gate_passed);
        assert_eq!(breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn empty_profiles_still_earn_proximity_defaults() {
        // Absent age and weight substitute zero, so two blank profiles sit
        // at zero distance and collect both full proximity terms.
        let a = dog(Some(Gender::Male));
        let b = dog(Some(Gender::Female));
        let breakdown = score_breakdown(&a, &b);
        assert!((breakdown.base - 10.0).abs() < f64::EPSILON);
        assert!((breakdown.age - 15.0).abs() < f64::EPSILON);
        assert!((breakdown.weight - 15.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.total, 40);
    }

    #[test]
    fn labrador_pair_scores_seventy_two() {
        let a = labrador_male();
        let b = labrador_female();
        let breakdown = score_breakdown(&a, &b);
        assert!((breakdown.base - 10.0).abs() < f64::EPSILON);
        assert!((breakdown.breed - 20.0).abs() < f64::EPSILON);
        assert!((breakdown.age - 13.0).abs() < f64::EPSILON);
        assert!((breakdown.size - 15.0).abs() < f64::EPSILON);
        assert!((breakdown.weight - 14.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.total, 72);
    }

    #[test]
    fn score_is_symmetric() {
        let a = DogAttributes {
            breed: Some("Border Collie".to_string()),
            gender: Some(Gender::Male),
            age_years: Some(2.5),
            size: Some(SizeClass::Medium),
            weight_kg: Some(18.0),
            coat_type: Some("double".to_string()),
            color: Some("black".to_string()),
            temperament: Temperament {
                activity_level: Some("high".to_string()),
                sociability: Some("friendly".to_string()),
                trainability: Some("eager".to_string()),
            },
        };
        let b = DogAttributes {
            breed: Some("German Shepherd".to_string()),
            gender: Some(Gender::Female),
            age_years: Some(4.0),
            size: Some(SizeClass::Large),
            weight_kg: Some(30.0),
            coat_type: Some("double".to_string()),
            color: Some("sable".to_string()),
            temperament: Temperament {
                activity_level: Some("high".to_string()),
                sociability: Some("reserved".to_string()),
                trainability: Some("eager".to_string()),
            },
        };
        assert_eq!(compatibility_score(&a, &b), compatibility_score(&b, &a));
    }

    #[test]
    fn identical_attributes_hit_the_cap() {
        let mut a = DogAttributes {
            breed: Some("Poodle".to_string()),
            gender: Some(Gender::Male),
            age_years: Some(3.0),
            size: Some(SizeClass::Medium),
            weight_kg: Some(12.0),
            coat_type: Some("curly".to_string()),
            color: Some("apricot".to_string()),
            temperament: Temperament {
                activity_level: Some("moderate".to_string()),
                sociability: Some("friendly".to_string()),
                trainability: Some("eager".to_string()),
            },
        };
        let mut b = a.clone();
        b.gender = Some(Gender::Female);
        assert_eq!(compatibility_score(&a, &b), SCORE_MAX);

        // Still within bounds with every field cranked apart.
        a.age_years = Some(0.5);
        b.age_years = Some(20.0);
        let score = compatibility_score(&a, &b);
        assert!(score <= SCORE_MAX);
    }

    #[test]
    fn exact_breed_beats_unrelated_breed() {
        let a = labrador_male();
        let same_breed = labrador_female();
        let mut unrelated = labrador_female();
        unrelated.breed = Some("Chihuahua".to_string());
        assert!(compatibility_score(&a, &same_breed) > compatibility_score(&a, &unrelated));
        let breakdown = score_breakdown(&a, &unrelated);
        assert!(breakdown.breed.abs() < f64::EPSILON);
    }

    #[test]
    fn breed_match_is_case_insensitive() {
        let mut a = labrador_male();
        a.breed = Some("LABRADOR RETRIEVER".to_string());
        let mut b = labrador_female();
        b.breed = Some("labrador retriever".to_string());
        let breakdown = score_breakdown(&a, &b);
        assert!((breakdown.breed - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shared_group_earns_partial_breed_bonus() {
        let mut a = labrador_male();
        a.breed = Some("Labrador Retriever".to_string());
        let mut b = labrador_female();
        b.breed = Some("Golden Retriever".to_string());
        let breakdown = score_breakdown(&a, &b);
        assert!((breakdown.breed - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unlisted_breeds_earn_no_group_bonus() {
        let mut a = labrador_male();
        a.breed = Some("Pyrenean Shepherd".to_string());
        let mut b = labrador_female();
        b.breed = Some("Catalan Sheepdog".to_string());
        let breakdown = score_breakdown(&a, &b);
        assert!(breakdown.breed.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_breed_earns_nothing() {
        let mut a = labrador_male();
        a.breed = None;
        let mut b = labrador_female();
        b.breed = None;
        let breakdown = score_breakdown(&a, &b);
        assert!(breakdown.breed.abs() < f64::EPSILON);
    }

    #[test]
    fn age_penalty_never_increases_with_distance() {
        let reference = labrador_male();
        let mut previous = f64::from(SCORE_MAX);
        for diff in [0.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
            let mut candidate = labrador_female();
            candidate.age_years = Some(3.0 + diff);
            let term = score_breakdown(&reference, &candidate).age;
            assert!(term <= previous);
            previous = term;
        }
    }

    #[test]
    fn age_term_floors_at_zero() {
        let reference = labrador_male();
        let mut candidate = labrador_female();
        candidate.age_years = Some(3.0 + 7.5);
        assert!(score_breakdown(&reference, &candidate).age.abs() < f64::EPSILON);
        candidate.age_years = Some(3.0 + 12.0);
        assert!(score_breakdown(&reference, &candidate).age.abs() < f64::EPSILON);
    }

    #[test]
    fn adjacent_sizes_earn_partial_bonus() {
        let a = labrador_male();
        let mut b = labrador_female();
        b.size = Some(SizeClass::Large);
        assert!((score_breakdown(&a, &b).size - 7.0).abs() < f64::EPSILON);
        b.size = Some(SizeClass::Giant);
        assert!(score_breakdown(&a, &b).size.abs() < f64::EPSILON);
        b.size = None;
        assert!(score_breakdown(&a, &b).size.abs() < f64::EPSILON);
    }

    #[test]
    fn weight_term_falls_half_point_per_kilogram() {
        let a = labrador_male();
        let mut b = labrador_female();
        b.weight_kg = Some(20.0);
        assert!((score_breakdown(&a, &b).weight - 15.0).abs() < f64::EPSILON);
        b.weight_kg = Some(22.0);
        assert!((score_breakdown(&a, &b).weight - 14.0).abs() < f64::EPSILON);
        b.weight_kg = Some(50.0);
        assert!(score_breakdown(&a, &b).weight.abs() < f64::EPSILON);
    }

    #[test]
    fn coat_color_and_temperament_bonuses_stack() {
        let mut a = labrador_male();
        let mut b = labrador_female();
        a.coat_type = Some("Double".to_string());
        b.coat_type = Some("double".to_string());
        a.color = Some("Yellow".to_string());
        b.color = Some("yellow".to_string());
        a.temperament = Temperament {
            activity_level: Some("high".to_string()),
            sociability: Some("friendly".to_string()),
            trainability: Some("eager".to_string()),
        };
        b.temperament = a.temperament.clone();
        let breakdown = score_breakdown(&a, &b);
        assert!((breakdown.coat - 7.0).abs() < f64::EPSILON);
        assert!((breakdown.color - 3.0).abs() < f64::EPSILON);
        assert!((breakdown.temperament - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fractional_totals_round_half_up() {
        let mut a = dog(Some(Gender::Male));
        let mut b = dog(Some(Gender::Female));
        a.age_years = Some(2.0);
        b.age_years = Some(2.25);
        a.weight_kg = Some(10.0);
        b.weight_kg = Some(10.0);
        // 10 + 14.5 (age) + 15 (weight) = 39.5
        assert_eq!(compatibility_score(&a, &b), 40);
    }

    #[test]
    fn breed_group_lookup_matches_table() {
        assert_eq!(breed_group("Labrador Retriever"), Some(BreedGroup::Sporting));
        assert_eq!(breed_group("  golden retriever  "), Some(BreedGroup::Sporting));
        assert_eq!(breed_group("german shepherd"), Some(BreedGroup::Herding));
        assert_eq!(breed_group("Border Collie"), Some(BreedGroup::Herding));
        assert_eq!(breed_group("CHIHUAHUA"), Some(BreedGroup::Toy));
        assert_eq!(breed_group("great dane"), Some(BreedGroup::Working));
        assert_eq!(breed_group("street dog"), None);
    }

    #[test]
    fn every_group_has_members() {
        for group in ALL_BREED_GROUPS {
            assert!(!breeds_in_group(group).is_empty());
        }
    }
}
