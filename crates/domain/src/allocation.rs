use std::collections::BTreeSet;

use crate::{
    BodyPartID, CandidateExercise, DifficultyScore, ExerciseID, IntensityLevel, Name, Property,
    Reps, RestTime, Section, SectionBuckets, Sets,
};

/// Minutes reserved for the warmup and for the cooldown, independent of the
/// session length.
pub const EDGE_SECTION_MINUTES: u32 = 10;

/// Smallest time slice worth scheduling an exercise for.
pub const MIN_ALLOCATION: u32 = 5;

/// Largest time slice a single exercise may occupy.
pub const MAX_ALLOCATION: u32 = 20;

/// Desired minimum number of distinct exercises in the main section.
pub const MIN_MAIN_VARIETY: usize = 2;

/// One scheduled exercise of a generated course.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedExercise {
    pub exercise_id: ExerciseID,
    pub name: Name,
    pub section: Section,
    /// Position within the section, starting at 1 without gaps.
    pub order_in_section: u32,
    pub body_part_ids: BTreeSet<BodyPartID>,
    pub intensity: IntensityLevel,
    pub difficulty: DifficultyScore,
    pub reps: Reps,
    pub sets: Sets,
    pub rest: RestTime,
    pub duration_minutes: u32,
    pub caution: Option<String>,
}

/// Fills the three sections from their priority-sorted candidate buckets.
///
/// The warmup and cooldown each get a fixed ten minutes, the main section
/// gets the rest of the session. Every section is filled greedily until its
/// budget is spent, the leftover is too small for another exercise, or the
/// bucket runs dry. A dry bucket with unspent budget and a main section
/// below the variety minimum each produce their own warning. Neither is an
/// error; a partial course is a valid course.
#[must_use]
pub fn allocate(buckets: &SectionBuckets, total_minutes: u32) -> (Vec<MergedExercise>, Vec<String>) {
    let mut exercises = Vec::new();
    let mut warnings = Vec::new();

    for section in Section::iter() {
        let budget = match section {
            Section::Warmup | Section::Cooldown => EDGE_SECTION_MINUTES,
            Section::Main => total_minutes.saturating_sub(2 * EDGE_SECTION_MINUTES),
        };
        fill(
            *section,
            buckets.section(*section),
            budget,
            &mut exercises,
            &mut warnings,
        );
    }

    let main_count = exercises
        .iter()
        .filter(|exercise| exercise.section == Section::Main)
        .count();
    if main_count < MIN_MAIN_VARIETY {
        warnings.push(format!(
            "Main section variety is low: {main_count} of at least {MIN_MAIN_VARIETY} exercises"
        ));
    }

    (exercises, warnings)
}

fn fill(
    section: Section,
    pool: &[CandidateExercise],
    budget: u32,
    exercises: &mut Vec<MergedExercise>,
    warnings: &mut Vec<String>,
) {
    let mut remaining = budget;
    let mut order_in_section = 0;
    let mut exhausted = true;

    for candidate in pool {
        if remaining < MIN_ALLOCATION {
            exhausted = false;
            break;
        }

        let cap = candidate
            .prescription
            .duration
            .minutes()
            .clamp(MIN_ALLOCATION, MAX_ALLOCATION);
        let allocated = cap.min(remaining);
        remaining -= allocated;
        order_in_section += 1;

        exercises.push(MergedExercise {
            exercise_id: candidate.exercise_id,
            name: candidate.name.clone(),
            section,
            order_in_section,
            body_part_ids: candidate.body_part_ids.clone(),
            intensity: candidate.intensity,
            difficulty: candidate.difficulty,
            reps: candidate.prescription.reps,
            sets: candidate.prescription.sets,
            rest: candidate.prescription.rest,
            duration_minutes: allocated,
            caution: candidate.caution.clone(),
        });
    }

    if exhausted && remaining > 0 {
        warnings.push(format!(
            "{} section is {remaining} minutes short",
            section.name()
        ));
    }
}
