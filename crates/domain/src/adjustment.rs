use std::slice::Iter;

use crate::{IntensityLevel, PainLevel, Prescription, Property};

/// Stage of the rehabilitation program the user is currently in.
///
/// The phase sets the baseline load. Pain shifts that baseline per
/// session, the phase does not change from one session to the next.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RehabPhase {
    Initial,
    #[default]
    Recovery,
    Strengthening,
}

impl RehabPhase {
    fn policy(self) -> PhasePolicy {
        match self {
            RehabPhase::Initial => PhasePolicy {
                max_intensity: IntensityLevel::clamped(2),
                reps: 0.7,
                sets: 0.8,
                rest: 1.3,
                duration: 0.8,
            },
            RehabPhase::Recovery => PhasePolicy {
                max_intensity: IntensityLevel::clamped(3),
                reps: 1.0,
                sets: 1.0,
                rest: 1.0,
                duration: 1.0,
            },
            RehabPhase::Strengthening => PhasePolicy {
                max_intensity: IntensityLevel::clamped(4),
                reps: 1.2,
                sets: 1.1,
                rest: 0.8,
                duration: 1.1,
            },
        }
    }
}

impl Property for RehabPhase {
    fn iter() -> Iter<'static, RehabPhase> {
        static PHASES: [RehabPhase; 3] = [
            RehabPhase::Initial,
            RehabPhase::Recovery,
            RehabPhase::Strengthening,
        ];
        PHASES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            RehabPhase::Initial => "Initial",
            RehabPhase::Recovery => "Recovery",
            RehabPhase::Strengthening => "Strengthening",
        }
    }
}

impl TryFrom<&str> for RehabPhase {
    type Error = RehabPhaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "initial" | "초기" => Ok(RehabPhase::Initial),
            "recovery" | "회복" => Ok(RehabPhase::Recovery),
            "strengthening" | "강화" => Ok(RehabPhase::Strengthening),
            unknown => Err(RehabPhaseError::Unknown(unknown.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RehabPhaseError {
    #[error("unknown rehabilitation phase: {0}")]
    Unknown(String),
}

/// Baseline load for a rehabilitation phase.
struct PhasePolicy {
    max_intensity: IntensityLevel,
    reps: f64,
    sets: f64,
    rest: f64,
    duration: f64,
}

/// Per-session load shift derived from reported pain.
struct PainPolicy {
    intensity_shift: i8,
    reps: f64,
    rest: f64,
}

fn pain_policy(index: u8) -> PainPolicy {
    match index {
        1 => PainPolicy {
            intensity_shift: 1,
            reps: 1.2,
            rest: 0.9,
        },
        2 => PainPolicy {
            intensity_shift: 0,
            reps: 1.0,
            rest: 1.0,
        },
        3 => PainPolicy {
            intensity_shift: 0,
            reps: 0.9,
            rest: 1.1,
        },
        4 => PainPolicy {
            intensity_shift: -1,
            reps: 0.7,
            rest: 1.3,
        },
        _ => PainPolicy {
            intensity_shift: -2,
            reps: 0.5,
            rest: 1.5,
        },
    }
}

/// Pain level assumed when the user reported none.
const DEFAULT_PAIN: f64 = 2.0;

/// Intensity a prescription starts from before phase and pain shifts.
const BASE_CONDITIONING_INTENSITY: u8 = 2;

/// Hard intensity ceiling while any selected body part hurts severely.
const SEVERE_PAIN_INTENSITY_CAP: u8 = 2;

const REPS_BOUNDS: (f64, f64) = (0.5, 1.5);
const SETS_BOUNDS: (f64, f64) = (0.5, 1.5);
const REST_BOUNDS: (f64, f64) = (0.8, 1.5);
const DURATION_BOUNDS: (f64, f64) = (0.7, 1.3);

/// Scaling factors applied to every prescription of a course.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    pub reps: f64,
    pub sets: f64,
    pub rest: f64,
    pub duration: f64,
}

impl Multipliers {
    #[must_use]
    pub fn apply(&self, prescription: &Prescription) -> Prescription {
        Prescription {
            reps: prescription.reps.scaled(self.reps),
            sets: prescription.sets.scaled(self.sets),
            rest: prescription.rest.scaled(self.rest),
            duration: prescription.duration.scaled(self.duration),
        }
    }
}

/// Course-wide load adjustment for one generation request.
#[derive(Clone, Debug, PartialEq)]
pub struct Adjustment {
    pub multipliers: Multipliers,
    pub recommended_intensity: IntensityLevel,
    pub warnings: Vec<String>,
}

impl Adjustment {
    /// Derives the load adjustment from the rehabilitation phase and the
    /// pain levels of all selected body parts.
    ///
    /// Reps and rest respond to the average pain, sets and duration only
    /// to the phase. Severe pain anywhere caps the recommended intensity
    /// regardless of phase.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn derive(phase: RehabPhase, pain_levels: &[PainLevel]) -> Adjustment {
        let mean_pain = if pain_levels.is_empty() {
            DEFAULT_PAIN
        } else {
            let sum: u32 = pain_levels.iter().map(|p| u32::from(u8::from(*p))).sum();
            f64::from(sum) / pain_levels.len() as f64
        };
        let pain = pain_policy((mean_pain.round() as u8).min(u8::from(PainLevel::MAX)));
        let policy = phase.policy();

        let multipliers = Multipliers {
            reps: (policy.reps * pain.reps).clamp(REPS_BOUNDS.0, REPS_BOUNDS.1),
            sets: policy.sets.clamp(SETS_BOUNDS.0, SETS_BOUNDS.1),
            rest: (policy.rest * pain.rest).clamp(REST_BOUNDS.0, REST_BOUNDS.1),
            duration: policy.duration.clamp(DURATION_BOUNDS.0, DURATION_BOUNDS.1),
        };

        let base = BASE_CONDITIONING_INTENSITY.min(u8::from(policy.max_intensity));
        let mut recommended_intensity = IntensityLevel::clamped(base).shifted(pain.intensity_shift);
        let mut warnings = Vec::new();
        if pain_levels.iter().copied().any(PainLevel::is_severe) {
            recommended_intensity =
                recommended_intensity.min(IntensityLevel::clamped(SEVERE_PAIN_INTENSITY_CAP));
            warnings
                .push("Severe pain in a selected body part limits exercise intensity".to_string());
        }

        Adjustment {
            multipliers,
            recommended_intensity,
            warnings,
        }
    }
}
