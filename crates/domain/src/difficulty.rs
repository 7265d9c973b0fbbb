use std::slice::Iter;

use derive_more::{Display, Into};

use crate::{PainLevel, Property};

/// Exercise difficulty on the catalog's 1 to 10 scale. The three tiers
/// partition the scale without gaps.
#[derive(Debug, Display, Clone, Copy, Into, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DifficultyScore(u8);

impl DifficultyScore {
    pub const MIN: DifficultyScore = DifficultyScore(1);
    pub const MAX: DifficultyScore = DifficultyScore(10);

    pub fn new(value: u8) -> Result<Self, DifficultyScoreError> {
        if !(1..=10).contains(&value) {
            return Err(DifficultyScoreError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Callers holding raw catalog values pass them through here; fractional
    /// scores are rejected rather than rounded.
    pub fn from_score(value: f64) -> Result<Self, DifficultyScoreError> {
        if value.fract() != 0.0 {
            return Err(DifficultyScoreError::NotIntegral);
        }

        if !(1.0..=10.0).contains(&value) {
            return Err(DifficultyScoreError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u8))
    }
}

/// Score of an exercise whose catalog record does not state one.
impl Default for DifficultyScore {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<&str> for DifficultyScore {
    type Error = DifficultyScoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u8>() {
            Ok(parsed_value) => DifficultyScore::new(parsed_value),
            Err(_) => Err(DifficultyScoreError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DifficultyScoreError {
    #[error("Difficulty score must be in the range 1 to 10")]
    OutOfRange,
    #[error("Difficulty score must be integral")]
    NotIntegral,
    #[error("Difficulty score must be an integer")]
    ParseError,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum DifficultyTier {
    Principle,
    Adaptation,
    Mastery,
}

impl DifficultyTier {
    #[must_use]
    pub fn of(score: DifficultyScore) -> DifficultyTier {
        match score.0 {
            1..=3 => DifficultyTier::Principle,
            4..=7 => DifficultyTier::Adaptation,
            _ => DifficultyTier::Mastery,
        }
    }

    /// The score range the tier covers.
    #[must_use]
    pub fn window(self) -> DifficultyWindow {
        match self {
            DifficultyTier::Principle => DifficultyWindow {
                min: DifficultyScore(1),
                max: DifficultyScore(3),
            },
            DifficultyTier::Adaptation => DifficultyWindow {
                min: DifficultyScore(4),
                max: DifficultyScore(7),
            },
            DifficultyTier::Mastery => DifficultyWindow {
                min: DifficultyScore(8),
                max: DifficultyScore(10),
            },
        }
    }

    /// The score range admitted when courses target the tier. Wider than
    /// `window` so that a course is not starved of easier preparatory work.
    #[must_use]
    pub fn reach(self) -> DifficultyWindow {
        match self {
            DifficultyTier::Principle => DifficultyWindow {
                min: DifficultyScore(1),
                max: DifficultyScore(4),
            },
            DifficultyTier::Adaptation => DifficultyWindow {
                min: DifficultyScore(1),
                max: DifficultyScore(8),
            },
            DifficultyTier::Mastery => DifficultyWindow {
                min: DifficultyScore(4),
                max: DifficultyScore(10),
            },
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            DifficultyTier::Principle => "Learning the basic movement pattern",
            DifficultyTier::Adaptation => "Building tolerance and control",
            DifficultyTier::Mastery => "Advanced strengthening",
        }
    }
}

impl Property for DifficultyTier {
    fn iter() -> Iter<'static, DifficultyTier> {
        static TIERS: [DifficultyTier; 3] = [
            DifficultyTier::Principle,
            DifficultyTier::Adaptation,
            DifficultyTier::Mastery,
        ];
        TIERS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            DifficultyTier::Principle => "Principle",
            DifficultyTier::Adaptation => "Adaptation",
            DifficultyTier::Mastery => "Mastery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyClassification {
    pub tier: DifficultyTier,
    pub score: DifficultyScore,
}

impl DifficultyClassification {
    #[must_use]
    pub fn of(score: DifficultyScore) -> DifficultyClassification {
        DifficultyClassification {
            tier: DifficultyTier::of(score),
            score,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.tier.name()
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.tier.description()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    #[must_use]
    pub fn target_tier(self) -> DifficultyTier {
        match self {
            ExperienceLevel::Beginner => DifficultyTier::Principle,
            ExperienceLevel::Intermediate => DifficultyTier::Adaptation,
            ExperienceLevel::Advanced => DifficultyTier::Mastery,
        }
    }
}

impl Property for ExperienceLevel {
    fn iter() -> Iter<'static, ExperienceLevel> {
        static LEVELS: [ExperienceLevel; 3] = [
            ExperienceLevel::Beginner,
            ExperienceLevel::Intermediate,
            ExperienceLevel::Advanced,
        ];
        LEVELS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

impl TryFrom<&str> for ExperienceLevel {
    type Error = ExperienceLevelError;

    /// Accepts the canonical codes and the activity-frequency aliases used
    /// by onboarding forms.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "beginner" | "rarely" => Ok(ExperienceLevel::Beginner),
            "intermediate" | "weekly_1_2" => Ok(ExperienceLevel::Intermediate),
            "advanced" | "weekly_3_plus" => Ok(ExperienceLevel::Advanced),
            _ => Err(ExperienceLevelError::Unknown(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExperienceLevelError {
    #[error("Unknown experience level: {0}")]
    Unknown(String),
}

/// An inclusive range of admissible difficulty scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyWindow {
    pub min: DifficultyScore,
    pub max: DifficultyScore,
}

impl DifficultyWindow {
    pub const FULL: DifficultyWindow = DifficultyWindow {
        min: DifficultyScore(1),
        max: DifficultyScore(10),
    };

    #[must_use]
    pub fn admits(&self, score: DifficultyScore) -> bool {
        (self.min..=self.max).contains(&score)
    }

    #[must_use]
    pub fn widened(&self, amount: u8) -> DifficultyWindow {
        DifficultyWindow {
            min: DifficultyScore(self.min.0.saturating_sub(amount).max(1)),
            max: DifficultyScore(self.max.0.saturating_add(amount).min(10)),
        }
    }
}

/// Share of each tier a generated course should aim for, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierMix {
    pub principle: u8,
    pub adaptation: u8,
    pub mastery: u8,
}

/// The difficulty envelope of one request: which tier to target, which
/// scores to admit and how the course should be spread over the tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyPlan {
    pub target: DifficultyTier,
    pub window: DifficultyWindow,
    pub mix: TierMix,
    pub warnings: Vec<String>,
}

impl DifficultyPlan {
    /// Pain overrides experience: level 5 confines the course to the
    /// principle tier and level 4 keeps mastery work out.
    #[must_use]
    pub fn derive(experience: ExperienceLevel, pain: PainLevel) -> DifficultyPlan {
        let base = experience.target_tier();
        let mut warnings = Vec::new();

        let target = if pain == PainLevel::MAX {
            warnings.push("Severe pain restricts the course to the principle tier".to_string());
            DifficultyTier::Principle
        } else if pain.is_severe() && base == DifficultyTier::Mastery {
            warnings
                .push("High pain lowers the target tier from mastery to adaptation".to_string());
            DifficultyTier::Adaptation
        } else {
            base
        };

        let window = match u8::from(pain) {
            5 => DifficultyWindow {
                min: DifficultyScore(1),
                max: DifficultyScore(5),
            },
            4 => DifficultyWindow {
                min: DifficultyScore(1),
                max: DifficultyScore(7),
            },
            _ => DifficultyWindow::FULL,
        };

        let window = if window == DifficultyWindow::FULL {
            target.reach()
        } else {
            window
        };

        let mix = if pain.is_severe() {
            pain_mix(pain)
        } else {
            experience_mix(experience)
        };

        DifficultyPlan {
            target,
            window,
            mix,
            warnings,
        }
    }
}

fn pain_mix(pain: PainLevel) -> TierMix {
    if pain == PainLevel::MAX {
        TierMix {
            principle: 100,
            adaptation: 0,
            mastery: 0,
        }
    } else {
        TierMix {
            principle: 50,
            adaptation: 50,
            mastery: 0,
        }
    }
}

fn experience_mix(experience: ExperienceLevel) -> TierMix {
    match experience {
        ExperienceLevel::Beginner => TierMix {
            principle: 70,
            adaptation: 30,
            mastery: 0,
        },
        ExperienceLevel::Intermediate => TierMix {
            principle: 20,
            adaptation: 60,
            mastery: 20,
        },
        ExperienceLevel::Advanced => TierMix {
            principle: 10,
            adaptation: 30,
            mastery: 60,
        },
    }
}
