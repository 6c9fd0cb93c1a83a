use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Matching input shape: the minimal slice of a profile the scorer needs.
/// Fetched from the profile service's internal eligible-pool endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchProfile {
    pub id: Uuid,
    pub first_name: String,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub nationality: Option<String>,
    pub medical_specialty: Option<String>,
    pub years_experience: Option<i32>,
    #[serde(default)]
    pub interests: Vec<Interest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    pub kind: String,
    pub value: String,
}

// --- Dimension weights, summing to 100 ---
// A dimension where either profile lacks data drops out of both the
// numerator and the denominator, so missing fields never count against
// the pair.
const W_SPECIALTY: u32 = 25;
const W_LOCATION: u32 = 20;
const W_AGE: u32 = 15;
const W_INTERESTS: u32 = 25;
const W_CAREER: u32 = 15;

/// Specialties considered professionally adjacent. Symmetric by lookup.
const RELATED_SPECIALTIES: &[(&str, &str)] = &[
    ("Cardiology", "Internal Medicine"),
    ("Neurology", "Psychiatry"),
    ("Pediatrics", "Family Medicine"),
    ("General Surgery", "Orthopedic Surgery"),
    ("Emergency Medicine", "Anesthesiology"),
    ("Oncology", "Hematology"),
    ("Radiology", "Nuclear Medicine"),
    ("Dermatology", "Allergy and Immunology"),
];

pub fn are_related_specialties(a: &str, b: &str) -> bool {
    RELATED_SPECIALTIES.iter().any(|(x, y)| {
        (x.eq_ignore_ascii_case(a) && y.eq_ignore_ascii_case(b))
            || (x.eq_ignore_ascii_case(b) && y.eq_ignore_ascii_case(a))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerStage {
    Early,
    Mid,
    Senior,
    Expert,
}

impl CareerStage {
    fn rank(self) -> u8 {
        match self {
            Self::Early => 0,
            Self::Mid => 1,
            Self::Senior => 2,
            Self::Expert => 3,
        }
    }
}

/// Derive a coarse career stage, preferring years of experience over age.
pub fn career_stage(profile: &MatchProfile) -> Option<CareerStage> {
    if let Some(years) = profile.years_experience {
        return Some(match years {
            i32::MIN..=4 => CareerStage::Early,
            5..=14 => CareerStage::Mid,
            15..=24 => CareerStage::Senior,
            _ => CareerStage::Expert,
        });
    }
    profile.age.map(|age| match age {
        i32::MIN..=29 => CareerStage::Early,
        30..=39 => CareerStage::Mid,
        40..=49 => CareerStage::Senior,
        _ => CareerStage::Expert,
    })
}

fn specialty_score(a: &MatchProfile, b: &MatchProfile) -> Option<u32> {
    let (sa, sb) = (a.medical_specialty.as_deref()?, b.medical_specialty.as_deref()?);
    if sa.eq_ignore_ascii_case(sb) {
        Some(W_SPECIALTY)
    } else if are_related_specialties(sa, sb) {
        Some(18)
    } else {
        Some(8)
    }
}

fn location_score(a: &MatchProfile, b: &MatchProfile) -> Option<u32> {
    let same = |x: &Option<String>, y: &Option<String>| match (x.as_deref(), y.as_deref()) {
        (Some(x), Some(y)) => Some(x.eq_ignore_ascii_case(y)),
        _ => None,
    };

    let city = same(&a.city, &b.city);
    let region = same(&a.region, &b.region);
    let nationality = same(&a.nationality, &b.nationality);

    // No comparable location field on both sides: dimension absent.
    if city.is_none() && region.is_none() && nationality.is_none() {
        return None;
    }

    if city == Some(true) {
        Some(W_LOCATION)
    } else if region == Some(true) {
        Some(15)
    } else if nationality == Some(true) {
        Some(10)
    } else {
        Some(5)
    }
}

fn age_score(a: &MatchProfile, b: &MatchProfile) -> Option<u32> {
    let diff = (a.age? - b.age?).abs();
    Some(match diff {
        0..=3 => W_AGE,
        4..=7 => 12,
        8..=12 => 9,
        13..=18 => 6,
        _ => 3,
    })
}

/// Count exact (kind, value) pairs shared by both interest lists,
/// case-insensitively.
pub fn shared_interest_count(a: &[Interest], b: &[Interest]) -> usize {
    let normalize =
        |i: &Interest| (i.kind.to_lowercase(), i.value.to_lowercase());
    let set_a: HashSet<_> = a.iter().map(normalize).collect();
    let set_b: HashSet<_> = b.iter().map(normalize).collect();
    set_a.intersection(&set_b).count()
}

fn interests_score(a: &MatchProfile, b: &MatchProfile) -> Option<u32> {
    // An empty list is treated as missing data, not zero overlap.
    if a.interests.is_empty() || b.interests.is_empty() {
        return None;
    }
    Some(match shared_interest_count(&a.interests, &b.interests) {
        n if n >= 5 => W_INTERESTS,
        n if n >= 3 => 20,
        2 => 15,
        1 => 10,
        _ => 0,
    })
}

fn career_score(a: &MatchProfile, b: &MatchProfile) -> Option<u32> {
    let (sa, sb) = (career_stage(a)?, career_stage(b)?);
    let gap = sa.rank().abs_diff(sb.rank());
    Some(match gap {
        0 => W_CAREER,
        1 => 10,
        _ => 5,
    })
}

/// Pairwise compatibility in [0, 100].
///
/// The score is a percentage of the achieved sub-scores over the weights of
/// the dimensions where both profiles carried data. With no mutually-present
/// dimension the result is 0. Never fails; symmetric in its arguments.
pub fn compatibility_score(a: &MatchProfile, b: &MatchProfile) -> u8 {
    let dimensions = [
        (specialty_score(a, b), W_SPECIALTY),
        (location_score(a, b), W_LOCATION),
        (age_score(a, b), W_AGE),
        (interests_score(a, b), W_INTERESTS),
        (career_score(a, b), W_CAREER),
    ];

    let mut achieved = 0u32;
    let mut possible = 0u32;
    for (sub, weight) in dimensions {
        if let Some(points) = sub {
            achieved += points;
            possible += weight;
        }
    }

    if possible == 0 {
        return 0;
    }

    ((achieved as f64 / possible as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(specialty: Option<&str>, city: Option<&str>, age: Option<i32>) -> MatchProfile {
        MatchProfile {
            id: Uuid::new_v4(),
            first_name: "Test".into(),
            age,
            city: city.map(String::from),
            region: None,
            nationality: None,
            medical_specialty: specialty.map(String::from),
            years_experience: None,
            interests: vec![],
        }
    }

    fn interest(kind: &str, value: &str) -> Interest {
        Interest {
            kind: kind.into(),
            value: value.into(),
        }
    }

    #[test]
    fn score_is_bounded() {
        let samples = [
            profile(Some("Cardiology"), Some("Boston"), Some(34)),
            profile(Some("Neurology"), Some("Denver"), Some(61)),
            profile(None, None, None),
            profile(Some("Pediatrics"), None, Some(25)),
        ];
        for a in &samples {
            for b in &samples {
                let score = compatibility_score(a, b);
                assert!(score <= 100, "score {score} out of bounds");
            }
        }
    }

    #[test]
    fn score_is_symmetric() {
        let mut a = profile(Some("Cardiology"), Some("Boston"), Some(34));
        let mut b = profile(Some("Internal Medicine"), Some("Chicago"), Some(52));
        a.interests = vec![interest("sport", "Running"), interest("music", "Jazz")];
        b.interests = vec![interest("Sport", "running"), interest("food", "Thai")];
        assert_eq!(compatibility_score(&a, &b), compatibility_score(&b, &a));
    }

    #[test]
    fn exact_specialty_match_takes_full_weight() {
        let a = profile(Some("Cardiology"), None, None);
        let b = profile(Some("cardiology"), None, None);
        assert_eq!(specialty_score(&a, &b), Some(25));
    }

    #[test]
    fn related_specialty_table_is_symmetric() {
        assert!(are_related_specialties("Cardiology", "Internal Medicine"));
        assert!(are_related_specialties("Internal Medicine", "Cardiology"));
        assert!(!are_related_specialties("Cardiology", "Dermatology"));
        let a = profile(Some("Neurology"), None, None);
        let b = profile(Some("Psychiatry"), None, None);
        assert_eq!(specialty_score(&a, &b), Some(18));
    }

    #[test]
    fn missing_age_drops_the_dimension() {
        // All other dimensions equal; only the age data differs in presence.
        let mut a = profile(Some("Cardiology"), Some("Boston"), None);
        let mut b = profile(Some("Cardiology"), Some("Boston"), Some(36));
        a.interests = vec![interest("sport", "Running"), interest("music", "Jazz")];
        b.interests = a.interests.clone();

        // specialty 25 + location 20 + interests 15 (two shared pairs).
        // Career stage is underivable for `a` (no age, no years), so that
        // dimension drops too: 60 achieved over 70 possible.
        assert_eq!(compatibility_score(&a, &b), 86);

        a.age = Some(34);
        // Now age (diff 2 -> 15) and career (Mid vs Mid -> 15) both count:
        // 90 over 100.
        assert_eq!(compatibility_score(&a, &b), 90);
    }

    #[test]
    fn no_mutual_data_scores_zero() {
        let a = profile(None, None, None);
        let b = profile(Some("Cardiology"), Some("Boston"), Some(40));
        assert_eq!(compatibility_score(&a, &b), 0);
    }

    #[test]
    fn pinned_cardiology_boston_scenario() {
        // Same specialty and city, ages 34/36, exactly two shared interest
        // pairs. Stage derivation: both Mid (30-39 by age).
        let mut a = profile(Some("Cardiology"), Some("Boston"), Some(34));
        let mut b = profile(Some("Cardiology"), Some("Boston"), Some(36));
        a.interests = vec![
            interest("sport", "Running"),
            interest("music", "Jazz"),
            interest("food", "Sushi"),
        ];
        b.interests = vec![
            interest("sport", "Running"),
            interest("music", "Jazz"),
            interest("food", "Tapas"),
        ];
        assert_eq!(career_stage(&a), Some(CareerStage::Mid));
        assert_eq!(career_stage(&b), Some(CareerStage::Mid));
        // (25 + 20 + 15 + 15 + 15) / 100
        assert_eq!(compatibility_score(&a, &b), 90);
    }

    #[test]
    fn years_experience_outranks_age_for_stage() {
        let mut p = profile(None, None, Some(34));
        assert_eq!(career_stage(&p), Some(CareerStage::Mid));
        p.years_experience = Some(20);
        assert_eq!(career_stage(&p), Some(CareerStage::Senior));
    }

    #[test]
    fn interest_matching_is_case_insensitive() {
        let a = vec![interest("Sport", "RUNNING"), interest("music", "Jazz")];
        let b = vec![interest("sport", "running"), interest("Music", "jazz")];
        assert_eq!(shared_interest_count(&a, &b), 2);
    }

    #[test]
    fn interest_thresholds() {
        let make = |n: usize| -> Vec<Interest> {
            (0..n).map(|i| interest("sport", &format!("s{i}"))).collect()
        };
        let base = profile(None, None, None);
        for (shared, expected) in [(0, 0), (1, 10), (2, 15), (3, 20), (4, 20), (5, 25)] {
            let mut a = base.clone();
            let mut b = base.clone();
            a.interests = make(shared.max(1));
            b.interests = make(shared);
            if shared == 0 {
                // one side non-empty, other non-empty but disjoint
                b.interests = vec![interest("food", "Thai")];
            }
            assert_eq!(
                interests_score(&a, &b),
                Some(expected),
                "shared = {shared}"
            );
        }
    }

    #[test]
    fn age_bands_decrease() {
        let at = |x: i32, y: i32| {
            age_score(&profile(None, None, Some(x)), &profile(None, None, Some(y)))
        };
        assert_eq!(at(30, 33), Some(15));
        assert_eq!(at(30, 37), Some(12));
        assert_eq!(at(30, 42), Some(9));
        assert_eq!(at(30, 48), Some(6));
        assert_eq!(at(30, 60), Some(3));
        assert_eq!(age_score(&profile(None, None, None), &profile(None, None, Some(30))), None);
    }

    #[test]
    fn location_falls_back_through_tiers() {
        let mut a = profile(None, Some("Boston"), None);
        let mut b = profile(None, Some("Boston"), None);
        assert_eq!(location_score(&a, &b), Some(20));

        b.city = Some("Cambridge".into());
        a.region = Some("MA".into());
        b.region = Some("MA".into());
        assert_eq!(location_score(&a, &b), Some(15));

        b.region = Some("NY".into());
        a.nationality = Some("US".into());
        b.nationality = Some("US".into());
        assert_eq!(location_score(&a, &b), Some(10));

        b.nationality = Some("CA".into());
        assert_eq!(location_score(&a, &b), Some(5));

        let blank = profile(None, None, None);
        assert_eq!(location_score(&blank, &b), None);
    }
}
