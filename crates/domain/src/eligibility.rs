use std::collections::BTreeSet;

use crate::{
    BodyPartID, BodyPartSelection, DifficultyScore, DifficultyWindow, Equipment, ExerciseID,
    IntensityLevel, Multipliers, Name, Prescription, PriorityScore, catalog::Catalog,
    contraindication,
};

/// Extra difficulty admitted on each side of the window when a body part
/// would otherwise end up without main-section candidates.
pub const BOUNDARY_TOLERANCE: u8 = 1;

/// Relaxation applied at most once per body part.
#[must_use]
pub fn relaxed_window(window: DifficultyWindow) -> DifficultyWindow {
    window.widened(BOUNDARY_TOLERANCE)
}

/// An exercise template admitted for one body-part selection, carrying
/// everything the later pipeline stages need.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateExercise {
    pub exercise_id: ExerciseID,
    pub name: Name,
    /// Selected body parts this exercise serves. Starts as the producing
    /// selection and grows when the merger folds duplicates together.
    pub body_part_ids: BTreeSet<BodyPartID>,
    pub priority: PriorityScore,
    pub intensity: IntensityLevel,
    pub difficulty: DifficultyScore,
    pub prescription: Prescription,
    pub caution: Option<String>,
}

impl CandidateExercise {
    #[must_use]
    pub fn adjusted(mut self, multipliers: &Multipliers) -> CandidateExercise {
        self.prescription = multipliers.apply(&self.prescription);
        self
    }
}

/// Admits every exercise mapped to the selected body part that is active,
/// open at the selection's pain level, performable with the available
/// equipment, inside the difficulty window and not strictly
/// contraindicated. The result is sorted by priority, best first.
///
/// Pure function of its inputs. Running it twice returns the same pool.
#[must_use]
pub fn eligible_candidates(
    catalog: &Catalog,
    selection: &BodyPartSelection,
    equipment: &BTreeSet<Equipment>,
    window: DifficultyWindow,
) -> Vec<CandidateExercise> {
    let mut candidates = Vec::new();

    for mapping in catalog.mappings_for(selection.body_part_id) {
        let Some(template) = catalog.exercise(mapping.exercise_id) else {
            continue;
        };

        if !template.active
            || !mapping.pain_gate.admits(selection.pain_level)
            || !template.performable_with(equipment)
            || !window.admits(template.difficulty)
        {
            continue;
        }

        let verdict = contraindication::check(
            catalog,
            template.id,
            selection.body_part_id,
            selection.pain_level,
        );
        if verdict.is_excluded() {
            continue;
        }

        let intensity = catalog.resolved_intensity(mapping);
        candidates.push(CandidateExercise {
            exercise_id: template.id,
            name: template.name.clone(),
            body_part_ids: BTreeSet::from([selection.body_part_id]),
            priority: PriorityScore::compute(
                selection,
                catalog.base_priority(selection.body_part_id),
                mapping.priority,
                intensity,
            ),
            intensity,
            difficulty: template.difficulty,
            prescription: template.prescription,
            caution: verdict.warning().map(str::to_string),
        });
    }

    candidates.sort_by(|a, b| a.priority.total_cmp(&b.priority));

    candidates
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        BasePriority, BodyPart, Contraindication, ExerciseTemplate, PainLevel, Severity,
        catalog::{BodyPartMapping, PainGate},
    };

    const LOWER_BACK: u128 = 1;
    const CAT_COW: u128 = 10;
    const BIRD_DOG: u128 = 11;
    const BAND_ROW: u128 = 12;
    const DEADLIFT: u128 = 13;
    const RETIRED: u128 = 14;
    const GENTLE_ONLY: u128 = 15;
    const PLANK: u128 = 16;
    const SIDE_BEND: u128 = 17;
    const WALL_SIT: u128 = 18;

    fn template(
        id: u128,
        name: &str,
        intensity: u8,
        difficulty: u8,
        equipment: &[Equipment],
        active: bool,
    ) -> ExerciseTemplate {
        ExerciseTemplate {
            id: ExerciseID::from(id),
            name: Name::new(name).unwrap(),
            intensity: IntensityLevel::new(intensity).unwrap(),
            difficulty: DifficultyScore::new(difficulty).unwrap(),
            prescription: Prescription::default(),
            equipment: equipment.iter().copied().collect(),
            active,
        }
    }

    fn mapping(exercise: u128, priority: u32) -> BodyPartMapping {
        BodyPartMapping {
            body_part_id: BodyPartID::from(LOWER_BACK),
            exercise_id: ExerciseID::from(exercise),
            priority,
            intensity: None,
            pain_gate: PainGate::Any,
        }
    }

    static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
        Catalog::new(
            vec![BodyPart {
                id: BodyPartID::from(LOWER_BACK),
                name: Name::new("Lower Back").unwrap(),
                base_priority: BasePriority::new(1).unwrap(),
            }],
            vec![
                template(CAT_COW, "Cat Cow", 1, 2, &[Equipment::None], true),
                template(BIRD_DOG, "Bird Dog", 2, 3, &[Equipment::None], true),
                template(
                    BAND_ROW,
                    "Band Row",
                    3,
                    5,
                    &[Equipment::ResistanceBand],
                    true,
                ),
                template(DEADLIFT, "Deadlift", 4, 9, &[Equipment::Dumbbell], true),
                template(RETIRED, "Retired Drill", 2, 3, &[Equipment::None], false),
                template(GENTLE_ONLY, "Knee Hug", 1, 1, &[Equipment::None], true),
                template(PLANK, "Plank", 3, 4, &[Equipment::None], true),
                template(SIDE_BEND, "Side Bend", 2, 4, &[Equipment::None], true),
                template(WALL_SIT, "Wall Sit", 1, 3, &[Equipment::None], true),
            ],
            vec![
                mapping(CAT_COW, 0),
                mapping(BIRD_DOG, 1),
                mapping(BAND_ROW, 2),
                mapping(DEADLIFT, 3),
                mapping(RETIRED, 4),
                BodyPartMapping {
                    pain_gate: PainGate::Between(
                        PainLevel::new(1).unwrap(),
                        PainLevel::new(2).unwrap(),
                    ),
                    ..mapping(GENTLE_ONLY, 5)
                },
                mapping(PLANK, 6),
                mapping(SIDE_BEND, 7),
                BodyPartMapping {
                    intensity: Some(IntensityLevel::new(3).unwrap()),
                    ..mapping(WALL_SIT, 8)
                },
            ],
            vec![
                Contraindication {
                    exercise_id: ExerciseID::from(PLANK),
                    body_part_id: BodyPartID::from(LOWER_BACK),
                    min_pain: Some(PainLevel::new(4).unwrap()),
                    severity: Severity::Strict,
                    reason: Some("spinal compression under load".to_string()),
                },
                Contraindication {
                    exercise_id: ExerciseID::from(SIDE_BEND),
                    body_part_id: BodyPartID::from(LOWER_BACK),
                    min_pain: None,
                    severity: Severity::Warning,
                    reason: None,
                },
            ],
        )
    });

    fn selection(pain: u8) -> BodyPartSelection {
        BodyPartSelection {
            body_part_id: BodyPartID::from(LOWER_BACK),
            name: Name::new("Lower Back").unwrap(),
            pain_level: PainLevel::new(pain).unwrap(),
            selection_order: 0,
        }
    }

    fn window(min: u8, max: u8) -> DifficultyWindow {
        DifficultyWindow {
            min: DifficultyScore::new(min).unwrap(),
            max: DifficultyScore::new(max).unwrap(),
        }
    }

    #[rstest]
    #[case::full_pool(
        2,
        &[Equipment::None, Equipment::Dumbbell, Equipment::ResistanceBand],
        (1, 10),
        &[DEADLIFT, BAND_ROW, PLANK, WALL_SIT, BIRD_DOG, SIDE_BEND, CAT_COW, GENTLE_ONLY],
    )]
    #[case::missing_equipment(
        2,
        &[Equipment::None, Equipment::ResistanceBand],
        (1, 10),
        &[BAND_ROW, PLANK, WALL_SIT, BIRD_DOG, SIDE_BEND, CAT_COW, GENTLE_ONLY],
    )]
    #[case::bodyweight_only(
        2,
        &[Equipment::None],
        (1, 10),
        &[PLANK, WALL_SIT, BIRD_DOG, SIDE_BEND, CAT_COW, GENTLE_ONLY],
    )]
    #[case::pain_gate_closes(
        3,
        &[Equipment::None, Equipment::ResistanceBand],
        (1, 10),
        &[BAND_ROW, PLANK, WALL_SIT, BIRD_DOG, SIDE_BEND, CAT_COW],
    )]
    #[case::strict_contraindication(
        4,
        &[Equipment::None, Equipment::ResistanceBand],
        (1, 10),
        &[BAND_ROW, WALL_SIT, BIRD_DOG, SIDE_BEND, CAT_COW],
    )]
    #[case::narrow_window(
        2,
        &[Equipment::None, Equipment::ResistanceBand],
        (1, 3),
        &[WALL_SIT, BIRD_DOG, CAT_COW, GENTLE_ONLY],
    )]
    #[case::widened_window(
        2,
        &[Equipment::None, Equipment::ResistanceBand],
        (1, 4),
        &[PLANK, WALL_SIT, BIRD_DOG, SIDE_BEND, CAT_COW, GENTLE_ONLY],
    )]
    fn test_eligible_candidates(
        #[case] pain: u8,
        #[case] available: &[Equipment],
        #[case] bounds: (u8, u8),
        #[case] expected: &[u128],
    ) {
        let candidates = eligible_candidates(
            &CATALOG,
            &selection(pain),
            &available.iter().copied().collect(),
            window(bounds.0, bounds.1),
        );

        assert_eq!(
            candidates
                .iter()
                .map(|c| c.exercise_id)
                .collect::<Vec<_>>(),
            expected
                .iter()
                .map(|id| ExerciseID::from(*id))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_eligible_candidates_resolves_mapping_intensity() {
        let candidates = eligible_candidates(
            &CATALOG,
            &selection(2),
            &[Equipment::None].into_iter().collect(),
            DifficultyWindow::FULL,
        );
        let wall_sit = candidates
            .iter()
            .find(|c| c.exercise_id == ExerciseID::from(WALL_SIT))
            .unwrap();

        assert_eq!(wall_sit.intensity, IntensityLevel::new(3).unwrap());
        assert_approx_eq!(f64::from(wall_sit.priority), 207.8);
        assert_eq!(
            wall_sit.body_part_ids,
            BTreeSet::from([BodyPartID::from(LOWER_BACK)])
        );
    }

    #[test]
    fn test_eligible_candidates_annotates_cautions() {
        let candidates = eligible_candidates(
            &CATALOG,
            &selection(2),
            &[Equipment::None].into_iter().collect(),
            DifficultyWindow::FULL,
        );
        let side_bend = candidates
            .iter()
            .find(|c| c.exercise_id == ExerciseID::from(SIDE_BEND))
            .unwrap();
        let plank = candidates
            .iter()
            .find(|c| c.exercise_id == ExerciseID::from(PLANK))
            .unwrap();

        assert_eq!(
            side_bend.caution,
            Some("Side Bend requires caution: flagged for this body part".to_string())
        );
        assert_eq!(plank.caution, None);
    }

    #[test]
    fn test_eligible_candidates_is_pure() {
        let available = [Equipment::None].into_iter().collect();

        assert_eq!(
            eligible_candidates(&CATALOG, &selection(3), &available, DifficultyWindow::FULL),
            eligible_candidates(&CATALOG, &selection(3), &available, DifficultyWindow::FULL)
        );
    }

    #[rstest]
    #[case::widens_both_sides((4, 7), (3, 8))]
    #[case::clamped_at_scale_ends((1, 10), (1, 10))]
    #[case::opens_the_next_tier((1, 3), (1, 4))]
    fn test_relaxed_window(#[case] bounds: (u8, u8), #[case] expected: (u8, u8)) {
        assert_eq!(
            relaxed_window(window(bounds.0, bounds.1)),
            window(expected.0, expected.1)
        );
    }

    #[test]
    fn test_adjusted_scales_only_the_prescription() {
        let candidates = eligible_candidates(
            &CATALOG,
            &selection(2),
            &[Equipment::None].into_iter().collect(),
            DifficultyWindow::FULL,
        );
        let candidate = candidates[0].clone();
        let multipliers = Multipliers {
            reps: 0.5,
            sets: 1.0,
            rest: 1.5,
            duration: 1.0,
        };

        let adjusted = candidate.clone().adjusted(&multipliers);

        assert_eq!(u32::from(adjusted.prescription.reps), 5);
        assert_eq!(u32::from(adjusted.prescription.rest), 45);
        assert_eq!(adjusted.priority, candidate.priority);
        assert_eq!(adjusted.intensity, candidate.intensity);
    }
}
