use uuid::Uuid;

use super::algorithm::{compatibility_score, MatchProfile};

pub const MIN_GROUP_SIZE: usize = 3;
pub const MAX_GROUP_SIZE: usize = 4;

/// Bucket for profiles without a declared specialty.
pub const DEFAULT_BUCKET: &str = "General";

#[derive(Debug, Clone)]
pub struct GroupMember {
    pub profile_id: Uuid,
    /// Mean of this member's pairwise scores against the rest of the group.
    pub compatibility_score: i32,
}

#[derive(Debug, Clone)]
pub struct AssembledGroup {
    pub specialty: String,
    pub name: String,
    /// Mean over all pairwise scores in the group.
    pub average_compatibility: i32,
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub groups: Vec<AssembledGroup>,
    /// Profiles left over after slicing (bucket remainders smaller than the
    /// minimum group size). They sit out this cycle.
    pub unmatched: Vec<Uuid>,
}

/// Partition an eligible pool into groups of 3-4 by specialty.
///
/// Bucketing is greedy and order-preserving: within a bucket, consecutive
/// slices of up to four are taken in original pool order, and a trailing
/// slice smaller than three is dropped. No intra-group optimization is
/// attempted beyond the specialty bucketing; that simplification is
/// deliberate. Deterministic for a given pool, which also means re-running
/// over an unchanged pool reproduces the same groups.
pub fn assemble_groups(pool: &[MatchProfile]) -> Assembly {
    // First-seen order keeps the whole run deterministic.
    let mut buckets: Vec<(String, Vec<&MatchProfile>)> = Vec::new();
    for profile in pool {
        let key = profile
            .medical_specialty
            .clone()
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(profile),
            None => buckets.push((key, vec![profile])),
        }
    }

    let mut groups = Vec::new();
    let mut unmatched = Vec::new();

    for (specialty, members) in buckets {
        let mut seq = 0;
        for slice in members.chunks(MAX_GROUP_SIZE) {
            if slice.len() < MIN_GROUP_SIZE {
                unmatched.extend(slice.iter().map(|p| p.id));
                continue;
            }
            seq += 1;
            groups.push(build_group(&specialty, seq, slice));
        }
    }

    Assembly { groups, unmatched }
}

fn build_group(specialty: &str, seq: usize, slice: &[&MatchProfile]) -> AssembledGroup {
    // Pairwise score matrix over the slice (3 or 4 members).
    let n = slice.len();
    let mut pair_scores = Vec::with_capacity(n * (n - 1) / 2);
    let mut per_member_sum = vec![0u32; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let score = compatibility_score(slice[i], slice[j]) as u32;
            pair_scores.push(score);
            per_member_sum[i] += score;
            per_member_sum[j] += score;
        }
    }

    let average_compatibility =
        (pair_scores.iter().sum::<u32>() as f64 / pair_scores.len() as f64).round() as i32;

    let members = slice
        .iter()
        .zip(per_member_sum)
        .map(|(profile, sum)| GroupMember {
            profile_id: profile.id,
            compatibility_score: (sum as f64 / (n - 1) as f64).round() as i32,
        })
        .collect();

    AssembledGroup {
        specialty: specialty.to_string(),
        name: format!("{specialty} Group {seq}"),
        average_compatibility,
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::algorithm::Interest;
    use std::collections::HashSet;

    fn profile(specialty: Option<&str>) -> MatchProfile {
        MatchProfile {
            id: Uuid::new_v4(),
            first_name: "Test".into(),
            age: Some(35),
            city: Some("Boston".into()),
            region: None,
            nationality: None,
            medical_specialty: specialty.map(String::from),
            years_experience: None,
            interests: vec![Interest {
                kind: "sport".into(),
                value: "Running".into(),
            }],
        }
    }

    fn pool(counts: &[(&str, usize)]) -> Vec<MatchProfile> {
        counts
            .iter()
            .flat_map(|&(s, n)| (0..n).map(move |_| profile(Some(s))))
            .collect()
    }

    #[test]
    fn groups_have_three_to_four_members() {
        let pool = pool(&[("Cardiology", 11), ("Neurology", 7), ("Oncology", 4)]);
        let assembly = assemble_groups(&pool);
        for group in &assembly.groups {
            assert!(
                (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&group.members.len()),
                "group {} has {} members",
                group.name,
                group.members.len()
            );
        }
    }

    #[test]
    fn no_profile_appears_in_two_groups() {
        let pool = pool(&[("Cardiology", 9), ("Neurology", 8)]);
        let assembly = assemble_groups(&pool);
        let mut seen = HashSet::new();
        for group in &assembly.groups {
            for member in &group.members {
                assert!(seen.insert(member.profile_id), "duplicate member");
            }
        }
    }

    #[test]
    fn pool_under_minimum_yields_no_groups() {
        let pool = pool(&[("Cardiology", 2)]);
        let assembly = assemble_groups(&pool);
        assert!(assembly.groups.is_empty());
        assert_eq!(assembly.unmatched.len(), 2);
    }

    #[test]
    fn small_bucket_is_dropped() {
        // 3 cardiologists form one group; 2 neurologists sit out.
        let pool = pool(&[("Cardiology", 3), ("Neurology", 2)]);
        let assembly = assemble_groups(&pool);
        assert_eq!(assembly.groups.len(), 1);
        assert_eq!(assembly.groups[0].specialty, "Cardiology");
        assert_eq!(assembly.groups[0].members.len(), 3);
        assert_eq!(assembly.unmatched.len(), 2);
    }

    #[test]
    fn trailing_remainder_under_three_sits_out() {
        // 6 in one bucket: a slice of 4, then a remainder of 2 dropped.
        let pool = pool(&[("Cardiology", 6)]);
        let assembly = assemble_groups(&pool);
        assert_eq!(assembly.groups.len(), 1);
        assert_eq!(assembly.groups[0].members.len(), 4);
        assert_eq!(assembly.unmatched.len(), 2);
    }

    #[test]
    fn missing_specialty_falls_into_default_bucket() {
        let mut p = pool(&[]);
        for _ in 0..3 {
            p.push(profile(None));
        }
        let assembly = assemble_groups(&p);
        assert_eq!(assembly.groups.len(), 1);
        assert_eq!(assembly.groups[0].specialty, DEFAULT_BUCKET);
        assert_eq!(assembly.groups[0].name, "General Group 1");
    }

    #[test]
    fn group_names_sequence_per_specialty() {
        let pool = pool(&[("Cardiology", 8), ("Neurology", 3)]);
        let assembly = assemble_groups(&pool);
        let names: Vec<_> = assembly.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Cardiology Group 1", "Cardiology Group 2", "Neurology Group 1"]
        );
    }

    #[test]
    fn assembly_is_deterministic_for_unchanged_pool() {
        // There is no idempotency key: a re-run over the same snapshot
        // reproduces the exact same groups, which at the persistence layer
        // means duplicates. This pins that behavior.
        let pool = pool(&[("Cardiology", 7), ("Psychiatry", 5)]);
        let first = assemble_groups(&pool);
        let second = assemble_groups(&pool);
        assert_eq!(first.groups.len(), second.groups.len());
        for (a, b) in first.groups.iter().zip(&second.groups) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.average_compatibility, b.average_compatibility);
            let ids_a: Vec<_> = a.members.iter().map(|m| m.profile_id).collect();
            let ids_b: Vec<_> = b.members.iter().map(|m| m.profile_id).collect();
            assert_eq!(ids_a, ids_b);
        }
    }

    #[test]
    fn scores_stay_in_range() {
        let pool = pool(&[("Cardiology", 4)]);
        let assembly = assemble_groups(&pool);
        let group = &assembly.groups[0];
        assert!((0..=100).contains(&group.average_compatibility));
        for member in &group.members {
            assert!((0..=100).contains(&member.compatibility_score));
        }
    }

    #[test]
    fn identical_profiles_score_a_perfect_average() {
        // All four members share specialty, city, age, stage, and five
        // interest pairs, so every pair scores 100.
        let mut pool = pool(&[("Cardiology", 4)]);
        for p in &mut pool {
            p.interests = (0..5)
                .map(|i| Interest {
                    kind: "sport".into(),
                    value: format!("s{i}"),
                })
                .collect();
        }
        let assembly = assemble_groups(&pool);
        assert_eq!(assembly.groups[0].average_compatibility, 100);
        for member in &assembly.groups[0].members {
            assert_eq!(member.compatibility_score, 100);
        }
    }
}
