use std::{
    collections::{BTreeMap, BTreeSet},
    slice::Iter,
};

use chrono::Duration;

use crate::{
    Adjustment, BodyPartID, BodyPartSelection, CandidateExercise, DifficultyPlan, DifficultyTier,
    DifficultyWindow, Equipment, ExerciseID, ExperienceLevel, IntensityLevel, MergedExercise,
    Multipliers, Name, PainLevel, Property, RehabPhase, Section, SectionBuckets, allocate,
    catalog::Catalog, classify, eligible_candidates, relaxed_window,
};

/// Supported course lengths. Malformed durations fail at the boundary,
/// not inside the engine.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SessionLength {
    OneHour,
    #[default]
    NinetyMinutes,
    TwoHours,
}

impl SessionLength {
    #[must_use]
    pub fn minutes(self) -> u32 {
        match self {
            SessionLength::OneHour => 60,
            SessionLength::NinetyMinutes => 90,
            SessionLength::TwoHours => 120,
        }
    }
}

impl Property for SessionLength {
    fn iter() -> Iter<'static, SessionLength> {
        static LENGTHS: [SessionLength; 3] = [
            SessionLength::OneHour,
            SessionLength::NinetyMinutes,
            SessionLength::TwoHours,
        ];
        LENGTHS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            SessionLength::OneHour => "60 minutes",
            SessionLength::NinetyMinutes => "90 minutes",
            SessionLength::TwoHours => "120 minutes",
        }
    }
}

impl TryFrom<u32> for SessionLength {
    type Error = SessionLengthError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            60 => Ok(SessionLength::OneHour),
            90 => Ok(SessionLength::NinetyMinutes),
            120 => Ok(SessionLength::TwoHours),
            _ => Err(SessionLengthError::Unsupported(value)),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionLengthError {
    #[error("Session length must be 60, 90 or 120 minutes, not {0}")]
    Unsupported(u32),
}

/// One course-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRequest {
    pub body_parts: Vec<BodyPartSelection>,
    /// Overall pain level the user reported for the session. Gates the
    /// difficulty plan; the per-part levels gate each body part's pool.
    pub pain_level: PainLevel,
    pub equipment: BTreeSet<Equipment>,
    pub experience: Option<ExperienceLevel>,
    pub phase: RehabPhase,
    pub duration: SessionLength,
}

impl MergeRequest {
    /// Checked before any filtering or scoring work starts.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.body_parts.is_empty() {
            return Err(RequestError::NoBodyParts);
        }

        let mut seen = BTreeSet::new();
        for selection in &self.body_parts {
            if !seen.insert(selection.body_part_id) {
                return Err(RequestError::DuplicateBodyPart(selection.name.to_string()));
            }
        }

        if let Some(max_pain) = self.body_parts.iter().map(|s| s.pain_level).max() {
            if self.pain_level > max_pain {
                return Err(RequestError::PainLevelInconsistent(
                    self.pain_level,
                    max_pain,
                ));
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("At least one body part must be selected")]
    NoBodyParts,
    #[error("Body part selected twice: {0}")]
    DuplicateBodyPart(String),
    #[error("Overall pain level {0} exceeds the highest body part pain level {1}")]
    PainLevelInconsistent(PainLevel, PainLevel),
}

/// Course-level counters of a merge result.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CourseStats {
    pub warmup: usize,
    pub main: usize,
    pub cooldown: usize,
    /// Exercises per selected body part, counting an exercise for every
    /// body part it satisfies. Body parts without exercises appear with a
    /// count of zero.
    pub by_body_part: BTreeMap<Name, usize>,
}

impl CourseStats {
    fn of(exercises: &[MergedExercise], selections: &[BodyPartSelection]) -> CourseStats {
        let of_section = |section: Section| {
            exercises
                .iter()
                .filter(|exercise| exercise.section == section)
                .count()
        };

        CourseStats {
            warmup: of_section(Section::Warmup),
            main: of_section(Section::Main),
            cooldown: of_section(Section::Cooldown),
            by_body_part: selections
                .iter()
                .map(|selection| {
                    let count = exercises
                        .iter()
                        .filter(|exercise| {
                            exercise.body_part_ids.contains(&selection.body_part_id)
                        })
                        .count();
                    (selection.name.clone(), count)
                })
                .collect(),
        }
    }
}

/// A generated course. An empty course is a valid result; everything that
/// went short along the way is in `warnings`, in pipeline order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// Sorted by section, warmup first, then by position in the section.
    pub exercises: Vec<MergedExercise>,
    pub total_minutes: u32,
    pub warnings: Vec<String>,
    pub stats: CourseStats,
    pub recommended_intensity: IntensityLevel,
    pub target_tier: Option<DifficultyTier>,
}

impl MergeResult {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.total_minutes))
    }
}

/// Generates a course for all selected body parts.
///
/// Each body part's eligible pool is adjusted, classified into sections
/// and merged with the other body parts' sections, then the session's
/// time budget is spread over the merged buckets.
pub fn merge(catalog: &Catalog, request: &MergeRequest) -> Result<MergeResult, RequestError> {
    request.validate()?;

    let plan = request
        .experience
        .map(|experience| DifficultyPlan::derive(experience, request.pain_level));
    let window = plan
        .as_ref()
        .map_or(DifficultyWindow::FULL, |plan| plan.window);
    let target_tier = plan.as_ref().map(|plan| plan.target);
    let plan_warnings = plan.map(|plan| plan.warnings).unwrap_or_default();

    let pain_levels: Vec<PainLevel> = request
        .body_parts
        .iter()
        .map(|selection| selection.pain_level)
        .collect();
    let Adjustment {
        multipliers,
        recommended_intensity,
        warnings: adjustment_warnings,
    } = Adjustment::derive(request.phase, &pain_levels);

    let mut empty_warnings = Vec::new();
    let mut parts = Vec::new();
    for selection in &request.body_parts {
        let buckets = body_part_buckets(catalog, selection, request, window, &multipliers);
        if buckets.warmup.is_empty() && buckets.main.is_empty() && buckets.cooldown.is_empty() {
            empty_warnings.push(format!(
                "No suitable exercises found for {}",
                selection.name
            ));
        }
        parts.push(buckets);
    }

    let buckets = merged_buckets(parts);
    let (exercises, allocation_warnings) = allocate(&buckets, request.duration.minutes());

    let mut warnings = plan_warnings;
    warnings.extend(adjustment_warnings);
    warnings.extend(
        exercises
            .iter()
            .filter_map(|exercise| exercise.caution.clone()),
    );
    warnings.extend(empty_warnings);
    warnings.extend(allocation_warnings);
    if exercises.is_empty() {
        warnings.push("No suitable exercises found for any selected body part".to_string());
    }

    let stats = CourseStats::of(&exercises, &request.body_parts);
    let total_minutes = exercises
        .iter()
        .map(|exercise| exercise.duration_minutes)
        .sum();

    Ok(MergeResult {
        exercises,
        total_minutes,
        warnings,
        stats,
        recommended_intensity,
        target_tier,
    })
}

/// One body part's classified sections. When the first pass leaves the
/// main section empty, the pool is rebuilt once with a wider difficulty
/// window.
fn body_part_buckets(
    catalog: &Catalog,
    selection: &BodyPartSelection,
    request: &MergeRequest,
    window: DifficultyWindow,
    multipliers: &Multipliers,
) -> SectionBuckets {
    let buckets = classify(adjusted_pool(
        catalog,
        selection,
        request,
        window,
        multipliers,
    ));
    if !buckets.main.is_empty() {
        return buckets;
    }

    let widened = relaxed_window(window);
    if widened == window {
        return buckets;
    }

    classify(adjusted_pool(
        catalog,
        selection,
        request,
        widened,
        multipliers,
    ))
}

fn adjusted_pool(
    catalog: &Catalog,
    selection: &BodyPartSelection,
    request: &MergeRequest,
    window: DifficultyWindow,
    multipliers: &Multipliers,
) -> Vec<CandidateExercise> {
    eligible_candidates(catalog, selection, &request.equipment, window)
        .into_iter()
        .map(|candidate| candidate.adjusted(multipliers))
        .collect()
}

/// Unions the per-body-part buckets and removes duplicate exercise
/// templates. A duplicate keeps the occurrence of its first selected body
/// part, stays in the section that body part classified it into and is
/// credited with every body part the template satisfies.
fn merged_buckets(parts: Vec<SectionBuckets>) -> SectionBuckets {
    let mut sections: BTreeMap<ExerciseID, Section> = BTreeMap::new();
    for part in &parts {
        for section in Section::iter() {
            for candidate in part.section(*section) {
                sections.entry(candidate.exercise_id).or_insert(*section);
            }
        }
    }

    let mut merged = SectionBuckets::default();
    for part in parts {
        merged.warmup.extend(part.warmup);
        merged.main.extend(part.main);
        merged.cooldown.extend(part.cooldown);
    }

    let mut satisfied: BTreeMap<ExerciseID, BTreeSet<BodyPartID>> = BTreeMap::new();
    for candidate in merged
        .warmup
        .iter()
        .chain(&merged.main)
        .chain(&merged.cooldown)
    {
        satisfied
            .entry(candidate.exercise_id)
            .or_default()
            .extend(candidate.body_part_ids.iter().copied());
    }

    let mut seen = BTreeSet::new();
    for (section, bucket) in [
        (Section::Warmup, &mut merged.warmup),
        (Section::Main, &mut merged.main),
        (Section::Cooldown, &mut merged.cooldown),
    ] {
        bucket.retain(|candidate| {
            sections.get(&candidate.exercise_id) == Some(&section)
                && seen.insert(candidate.exercise_id)
        });
        for candidate in bucket.iter_mut() {
            if let Some(ids) = satisfied.get(&candidate.exercise_id) {
                candidate.body_part_ids.clone_from(ids);
            }
        }
        bucket.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    }

    merged
}
