use std::{collections::BTreeMap, slice::Iter};

use crate::{BodyPartID, ExerciseID, PainLevel, Property, catalog::Catalog};

/// A catalog rule stating that an exercise is unsafe (strict) or needs
/// caution (warning) for a body part, optionally only from a minimum pain
/// level upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contraindication {
    pub exercise_id: ExerciseID,
    pub body_part_id: BodyPartID,
    /// No minimum means the rule applies at every pain level.
    pub min_pain: Option<PainLevel>,
    pub severity: Severity,
    pub reason: Option<String>,
}

impl Contraindication {
    #[must_use]
    pub fn applies(&self, pain: PainLevel) -> bool {
        self.min_pain.is_none_or(|min_pain| pain >= min_pain)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Strict,
}

impl Property for Severity {
    fn iter() -> Iter<'static, Severity> {
        static SEVERITIES: [Severity; 2] = [Severity::Warning, Severity::Strict];
        SEVERITIES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Strict => "Strict",
        }
    }
}

impl TryFrom<&str> for Severity {
    type Error = SeverityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "warning" => Ok(Severity::Warning),
            "strict" => Ok(Severity::Strict),
            _ => Err(SeverityError::Unknown(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SeverityError {
    #[error("Unknown contraindication severity: {0}")]
    Unknown(String),
}

/// Outcome of checking one exercise against the contraindication rules of
/// one body part at one pain level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Warn {
        reason: String,
    },
    Exclude {
        reason: String,
        /// Gentler same-body-part replacements, best first, at most three.
        alternatives: Vec<ExerciseID>,
    },
}

impl Verdict {
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        matches!(self, Verdict::Exclude { .. })
    }

    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match self {
            Verdict::Warn { reason } => Some(reason),
            _ => None,
        }
    }
}

#[must_use]
pub fn check(
    catalog: &Catalog,
    exercise: ExerciseID,
    body_part: BodyPartID,
    pain: PainLevel,
) -> Verdict {
    let Some(record) = catalog.contraindication_for(exercise, body_part) else {
        return Verdict::Pass;
    };

    if !record.applies(pain) {
        return Verdict::Pass;
    }

    let name = catalog
        .exercise(exercise)
        .map_or("This exercise", |template| template.name.as_ref());
    let detail = record
        .reason
        .as_deref()
        .unwrap_or("flagged for this body part");

    match record.severity {
        Severity::Warning => Verdict::Warn {
            reason: match record.min_pain {
                Some(min_pain) => {
                    format!("{name} requires caution at pain level {min_pain} and above: {detail}")
                }
                None => format!("{name} requires caution: {detail}"),
            },
        },
        Severity::Strict => Verdict::Exclude {
            reason: match record.min_pain {
                Some(min_pain) => {
                    format!("{name} is unsafe at pain level {min_pain} and above: {detail}")
                }
                None => format!("{name} is contraindicated: {detail}"),
            },
            alternatives: alternatives(catalog, body_part, pain, exercise),
        },
    }
}

/// Same verdicts as calling [`check`] once per exercise.
#[must_use]
pub fn check_all(
    catalog: &Catalog,
    exercises: &[ExerciseID],
    body_part: BodyPartID,
    pain: PainLevel,
) -> BTreeMap<ExerciseID, Verdict> {
    exercises
        .iter()
        .map(|exercise| (*exercise, check(catalog, *exercise, body_part, pain)))
        .collect()
}

pub(crate) fn is_strictly_contraindicated(
    catalog: &Catalog,
    exercise: ExerciseID,
    body_part: BodyPartID,
    pain: PainLevel,
) -> bool {
    catalog
        .contraindication_for(exercise, body_part)
        .is_some_and(|record| record.severity == Severity::Strict && record.applies(pain))
}

/// The higher the pain, the gentler the suggested replacements.
fn alternatives(
    catalog: &Catalog,
    body_part: BodyPartID,
    pain: PainLevel,
    excluded: ExerciseID,
) -> Vec<ExerciseID> {
    let intensity_cap = (3 - u8::from(pain) / 2).max(1);
    let mut suggestions = Vec::new();

    for mapping in catalog.mappings_for(body_part) {
        if mapping.exercise_id == excluded || suggestions.contains(&mapping.exercise_id) {
            continue;
        }

        let Some(template) = catalog.exercise(mapping.exercise_id) else {
            continue;
        };

        if !template.active
            || u8::from(catalog.resolved_intensity(mapping)) > intensity_cap
            || is_strictly_contraindicated(catalog, mapping.exercise_id, body_part, pain)
        {
            continue;
        }

        suggestions.push(mapping.exercise_id);

        if suggestions.len() == 3 {
            break;
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        BasePriority, BodyPart, DifficultyScore, Equipment, ExerciseTemplate, IntensityLevel, Name,
        Prescription, catalog::BodyPartMapping,
    };

    const LOWER_BACK: u128 = 1;
    const TOE_TOUCH: u128 = 10;
    const PELVIC_TILT: u128 = 11;
    const CHILD_POSE: u128 = 12;
    const SUPERMAN: u128 = 13;
    const BRIDGE: u128 = 14;
    const DEEP_SQUAT: u128 = 15;

    fn template(id: u128, name: &str, intensity: u8) -> ExerciseTemplate {
        ExerciseTemplate {
            id: ExerciseID::from(id),
            name: Name::new(name).unwrap(),
            intensity: IntensityLevel::new(intensity).unwrap(),
            difficulty: DifficultyScore::default(),
            prescription: Prescription::default(),
            equipment: [Equipment::None].into_iter().collect(),
            active: true,
        }
    }

    fn mapping(exercise: u128, priority: u32) -> BodyPartMapping {
        BodyPartMapping {
            body_part_id: BodyPartID::from(LOWER_BACK),
            exercise_id: ExerciseID::from(exercise),
            priority,
            intensity: None,
            pain_gate: crate::catalog::PainGate::Any,
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
                template(TOE_TOUCH, "Standing Toe Touch", 2),
                template(PELVIC_TILT, "Pelvic Tilt", 1),
                template(CHILD_POSE, "Child's Pose", 1),
                template(SUPERMAN, "Superman Hold", 4),
                template(BRIDGE, "Glute Bridge", 3),
                template(DEEP_SQUAT, "Deep Squat", 4),
            ],
            vec![
                mapping(DEEP_SQUAT, 0),
                mapping(TOE_TOUCH, 1),
                mapping(PELVIC_TILT, 2),
                mapping(CHILD_POSE, 3),
                mapping(SUPERMAN, 4),
                mapping(BRIDGE, 5),
            ],
            vec![
                Contraindication {
                    exercise_id: ExerciseID::from(TOE_TOUCH),
                    body_part_id: BodyPartID::from(LOWER_BACK),
                    min_pain: Some(PainLevel::new(4).unwrap()),
                    severity: Severity::Strict,
                    reason: Some("loads the spine in flexion".to_string()),
                },
                Contraindication {
                    exercise_id: ExerciseID::from(SUPERMAN),
                    body_part_id: BodyPartID::from(LOWER_BACK),
                    min_pain: Some(PainLevel::new(3).unwrap()),
                    severity: Severity::Warning,
                    reason: Some("keep the range small".to_string()),
                },
                Contraindication {
                    exercise_id: ExerciseID::from(BRIDGE),
                    body_part_id: BodyPartID::from(LOWER_BACK),
                    min_pain: None,
                    severity: Severity::Warning,
                    reason: None,
                },
                Contraindication {
                    exercise_id: ExerciseID::from(DEEP_SQUAT),
                    body_part_id: BodyPartID::from(LOWER_BACK),
                    min_pain: None,
                    severity: Severity::Strict,
                    reason: Some("too much spinal load in this program".to_string()),
                },
            ],
        )
    });

    #[rstest]
    #[case::no_record(PELVIC_TILT, 5, false, false)]
    #[case::below_threshold(TOE_TOUCH, 3, false, false)]
    #[case::at_threshold(TOE_TOUCH, 4, true, false)]
    #[case::above_threshold(TOE_TOUCH, 5, true, false)]
    #[case::warning_below_threshold(SUPERMAN, 2, false, false)]
    #[case::warning_at_threshold(SUPERMAN, 3, false, true)]
    #[case::no_minimum_always_applies(BRIDGE, 1, false, true)]
    #[case::strict_without_minimum(DEEP_SQUAT, 1, true, false)]
    fn test_check(
        #[case] exercise: u128,
        #[case] pain: u8,
        #[case] excluded: bool,
        #[case] warned: bool,
    ) {
        let verdict = check(
            &CATALOG,
            ExerciseID::from(exercise),
            BodyPartID::from(LOWER_BACK),
            PainLevel::new(pain).unwrap(),
        );
        assert_eq!(verdict.is_excluded(), excluded);
        assert_eq!(verdict.warning().is_some(), warned);
    }

    #[test]
    fn test_check_strict_reason_and_alternatives() {
        let verdict = check(
            &CATALOG,
            ExerciseID::from(TOE_TOUCH),
            BodyPartID::from(LOWER_BACK),
            PainLevel::new(5).unwrap(),
        );
        let Verdict::Exclude {
            reason,
            alternatives,
        } = verdict
        else {
            panic!("expected exclusion");
        };
        assert_eq!(
            reason,
            "Standing Toe Touch is unsafe at pain level 4 and above: loads the spine in flexion"
        );
        assert_eq!(
            alternatives,
            vec![ExerciseID::from(PELVIC_TILT), ExerciseID::from(CHILD_POSE)]
        );
    }

    #[rstest]
    #[case::moderate_pain_keeps_gentle_dynamic_work(
        2,
        vec![
            ExerciseID::from(TOE_TOUCH),
            ExerciseID::from(PELVIC_TILT),
            ExerciseID::from(CHILD_POSE),
        ]
    )]
    #[case::severe_pain_drops_newly_contraindicated_work(
        4,
        vec![ExerciseID::from(PELVIC_TILT), ExerciseID::from(CHILD_POSE)]
    )]
    fn test_alternatives_respect_pain(#[case] pain: u8, #[case] expected: Vec<ExerciseID>) {
        let verdict = check(
            &CATALOG,
            ExerciseID::from(DEEP_SQUAT),
            BodyPartID::from(LOWER_BACK),
            PainLevel::new(pain).unwrap(),
        );
        let Verdict::Exclude { alternatives, .. } = verdict else {
            panic!("expected exclusion");
        };
        assert_eq!(alternatives, expected);
    }

    #[test]
    fn test_check_all_matches_single_checks() {
        let exercises = [
            ExerciseID::from(TOE_TOUCH),
            ExerciseID::from(PELVIC_TILT),
            ExerciseID::from(SUPERMAN),
            ExerciseID::from(BRIDGE),
        ];
        for pain in 1..=5 {
            let pain = PainLevel::new(pain).unwrap();
            let batch = check_all(&CATALOG, &exercises, BodyPartID::from(LOWER_BACK), pain);
            assert_eq!(batch.len(), exercises.len());
            for exercise in exercises {
                assert_eq!(
                    batch[&exercise],
                    check(&CATALOG, exercise, BodyPartID::from(LOWER_BACK), pain)
                );
            }
        }
    }
}
