use std::{collections::BTreeSet, slice::Iter};

use crate::{CandidateExercise, ExerciseID, Property};

const WARMUP_MIN: usize = 2;
const WARMUP_MAX: usize = 4;
const COOLDOWN_MIN: usize = 2;
const COOLDOWN_MAX: usize = 3;

/// Part of a course. Sections are ordered the way they are performed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Section {
    Warmup,
    Main,
    Cooldown,
}

impl Property for Section {
    fn iter() -> Iter<'static, Section> {
        static SECTIONS: [Section; 3] = [Section::Warmup, Section::Main, Section::Cooldown];
        SECTIONS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Section::Warmup => "Warmup",
            Section::Main => "Main",
            Section::Cooldown => "Cooldown",
        }
    }
}

/// One body part's candidates split into the three course sections, each
/// bucket sorted by priority, best first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SectionBuckets {
    pub warmup: Vec<CandidateExercise>,
    pub main: Vec<CandidateExercise>,
    pub cooldown: Vec<CandidateExercise>,
}

impl SectionBuckets {
    #[must_use]
    pub fn section(&self, section: Section) -> &[CandidateExercise] {
        match section {
            Section::Warmup => &self.warmup,
            Section::Main => &self.main,
            Section::Cooldown => &self.cooldown,
        }
    }
}

/// Splits a priority-sorted candidate pool into warmup, main and cooldown.
///
/// Low-intensity candidates open and close the course. The warmup takes the
/// best-ranked half of them, the cooldown takes the worst-ranked of the
/// rest, and whatever low-intensity candidates are left join the
/// high-intensity ones in the main section.
#[must_use]
pub fn classify(pool: Vec<CandidateExercise>) -> SectionBuckets {
    let (mut low, high): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .partition(|candidate| candidate.intensity.is_low());

    let warmup_count = (low.len() / 2).clamp(WARMUP_MIN, WARMUP_MAX).min(low.len());
    let mut remaining = low.split_off(warmup_count);
    let warmup = low;

    let cooldown_count = remaining
        .len()
        .clamp(COOLDOWN_MIN, COOLDOWN_MAX)
        .min(remaining.len());
    let cooldown = remaining.split_off(remaining.len() - cooldown_count);

    let mut main = high;
    main.extend(remaining);
    main.sort_by(|a, b| a.priority.total_cmp(&b.priority));

    let cooldown_ids: BTreeSet<ExerciseID> =
        cooldown.iter().map(|candidate| candidate.exercise_id).collect();
    main.retain(|candidate| !cooldown_ids.contains(&candidate.exercise_id));

    SectionBuckets {
        warmup,
        main,
        cooldown,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        BasePriority, BodyPartID, BodyPartSelection, DifficultyScore, IntensityLevel, Name,
        PainLevel, Prescription, PriorityScore,
    };

    fn candidate(id: u128, intensity: u8, rank: u32) -> CandidateExercise {
        let selection = BodyPartSelection {
            body_part_id: BodyPartID::from(1),
            name: Name::new("Lower Back").unwrap(),
            pain_level: PainLevel::new(2).unwrap(),
            selection_order: 0,
        };
        let intensity = IntensityLevel::new(intensity).unwrap();

        CandidateExercise {
            exercise_id: ExerciseID::from(id),
            name: Name::new(&format!("Drill {id}")).unwrap(),
            body_part_ids: BTreeSet::from([BodyPartID::from(1)]),
            priority: PriorityScore::compute(
                &selection,
                BasePriority::new(1).unwrap(),
                rank,
                intensity,
            ),
            intensity,
            difficulty: DifficultyScore::default(),
            prescription: Prescription::default(),
            caution: None,
        }
    }

    /// Candidates whose priority strictly increases in listed order, low
    /// intensity where `low` holds the index.
    fn pool(intensities: &[u8]) -> Vec<CandidateExercise> {
        intensities
            .iter()
            .enumerate()
            .map(|(index, intensity)| {
                candidate(index as u128 + 1, *intensity, index as u32 * 50)
            })
            .collect()
    }

    fn ids(bucket: &[CandidateExercise]) -> Vec<u128> {
        bucket
            .iter()
            .map(|candidate| {
                u128::from_be_bytes(*candidate.exercise_id.as_bytes())
            })
            .collect()
    }

    #[test]
    fn test_section_order() {
        assert!(Section::Warmup < Section::Main);
        assert!(Section::Main < Section::Cooldown);
    }

    #[rstest]
    #[case(Section::Warmup, "Warmup")]
    #[case(Section::Main, "Main")]
    #[case(Section::Cooldown, "Cooldown")]
    fn test_section_name(#[case] section: Section, #[case] expected: &str) {
        assert_eq!(section.name(), expected);
    }

    #[test]
    fn test_classify_empty_pool() {
        assert_eq!(classify(vec![]), SectionBuckets::default());
    }

    #[test]
    fn test_classify_without_low_intensity() {
        let buckets = classify(pool(&[3, 4, 3]));

        assert_eq!(ids(&buckets.warmup), Vec::<u128>::new());
        assert_eq!(ids(&buckets.main), vec![1, 2, 3]);
        assert_eq!(ids(&buckets.cooldown), Vec::<u128>::new());
    }

    #[test]
    fn test_classify_single_low_candidate() {
        let buckets = classify(pool(&[1, 3]));

        assert_eq!(ids(&buckets.warmup), vec![1]);
        assert_eq!(ids(&buckets.main), vec![2]);
        assert_eq!(ids(&buckets.cooldown), Vec::<u128>::new());
    }

    #[test]
    fn test_classify_small_low_pool_feeds_warmup_and_cooldown() {
        let buckets = classify(pool(&[1, 2, 1, 2, 3]));

        assert_eq!(ids(&buckets.warmup), vec![1, 2]);
        assert_eq!(ids(&buckets.cooldown), vec![3, 4]);
        assert_eq!(ids(&buckets.main), vec![5]);
    }

    #[test]
    fn test_classify_leftover_low_candidates_join_main() {
        let buckets = classify(pool(&[1, 1, 2, 2, 1, 2, 1, 1, 2, 3, 4]));

        assert_eq!(ids(&buckets.warmup), vec![1, 2, 3, 4]);
        assert_eq!(ids(&buckets.cooldown), vec![7, 8, 9]);
        assert_eq!(ids(&buckets.main), vec![5, 6, 10, 11]);
    }

    #[test]
    fn test_classify_reorders_main_by_priority() {
        let buckets = classify(pool(&[1, 3, 1, 1, 3, 1, 1, 1, 1, 1, 1]));

        assert_eq!(ids(&buckets.warmup), vec![1, 3, 4, 6]);
        assert_eq!(ids(&buckets.cooldown), vec![9, 10, 11]);
        assert_eq!(ids(&buckets.main), vec![2, 5, 7, 8]);
    }

    #[test]
    fn test_classify_keeps_cooldown_ids_out_of_main() {
        let mut candidates = pool(&[1, 1, 1, 1]);
        candidates.push(candidate(4, 3, 200));

        let buckets = classify(candidates);

        assert_eq!(ids(&buckets.warmup), vec![1, 2]);
        assert_eq!(ids(&buckets.cooldown), vec![3, 4]);
        assert_eq!(ids(&buckets.main), Vec::<u128>::new());
    }

    #[test]
    fn test_classify_loses_no_unique_candidate() {
        let candidates = pool(&[1, 2, 3, 1, 4, 2, 1, 2, 2, 1]);
        let input_ids: BTreeSet<ExerciseID> =
            candidates.iter().map(|c| c.exercise_id).collect();

        let buckets = classify(candidates);
        let output_ids: BTreeSet<ExerciseID> = buckets
            .warmup
            .iter()
            .chain(&buckets.main)
            .chain(&buckets.cooldown)
            .map(|c| c.exercise_id)
            .collect();

        assert_eq!(output_ids, input_ids);
        assert_eq!(
            buckets.warmup.len() + buckets.main.len() + buckets.cooldown.len(),
            input_ids.len()
        );
    }
}
