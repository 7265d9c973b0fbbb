use std::{collections::BTreeSet, slice::Iter};

use derive_more::{Deref, Display, Into};
use uuid::Uuid;

use crate::{DifficultyScore, Name};

/// An exercise as recorded in the catalog. Templates are owned by the
/// catalog and never mutated by the course pipeline; adjusted parameters are
/// computed on copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub id: ExerciseID,
    pub name: Name,
    pub intensity: IntensityLevel,
    pub difficulty: DifficultyScore,
    pub prescription: Prescription,
    /// Equipment the exercise can be performed with. Any single listed item
    /// suffices; `Equipment::None` marks the exercise as performable
    /// bare-handed regardless of what the user owns.
    pub equipment: BTreeSet<Equipment>,
    pub active: bool,
}

impl ExerciseTemplate {
    /// An empty equipment set means the catalog record is incomplete and the
    /// exercise cannot be scheduled.
    #[must_use]
    pub fn performable_with(&self, available: &BTreeSet<Equipment>) -> bool {
        if self.equipment.contains(&Equipment::None) {
            return true;
        }

        self.equipment
            .iter()
            .any(|equipment| available.contains(equipment))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Equipment {
    None,
    Chair,
    Dumbbell,
    FoamRoller,
    GymBall,
    Machine,
    Mat,
    ResistanceBand,
    Towel,
}

impl Property for Equipment {
    fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 8] = [
            Equipment::Chair,
            Equipment::Dumbbell,
            Equipment::FoamRoller,
            Equipment::GymBall,
            Equipment::Machine,
            Equipment::Mat,
            Equipment::ResistanceBand,
            Equipment::Towel,
        ];
        EQUIPMENT.iter()
    }

    fn iter_filter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 9] = [
            Equipment::Chair,
            Equipment::Dumbbell,
            Equipment::FoamRoller,
            Equipment::GymBall,
            Equipment::Machine,
            Equipment::Mat,
            Equipment::ResistanceBand,
            Equipment::Towel,
            Equipment::None,
        ];
        EQUIPMENT.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Equipment::None => "Bodyweight",
            Equipment::Chair => "Chair",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::FoamRoller => "Foam Roller",
            Equipment::GymBall => "Gym Ball",
            Equipment::Machine => "Machine",
            Equipment::Mat => "Mat",
            Equipment::ResistanceBand => "Resistance Band",
            Equipment::Towel => "Towel",
        }
    }
}

impl TryFrom<&str> for Equipment {
    type Error = EquipmentError;

    /// Accepts the catalog vocabulary in English and Korean. The two Korean
    /// bodyweight synonyms ("맨몸" and "없음") map to the same variant.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "bodyweight" | "none" | "맨몸" | "없음" => Ok(Equipment::None),
            "chair" | "의자" => Ok(Equipment::Chair),
            "dumbbell" | "덤벨" => Ok(Equipment::Dumbbell),
            "foam roller" | "폼롤러" => Ok(Equipment::FoamRoller),
            "gym ball" | "짐볼" => Ok(Equipment::GymBall),
            "machine" | "머신" => Ok(Equipment::Machine),
            "mat" | "매트" => Ok(Equipment::Mat),
            "resistance band" | "band" | "밴드" | "저항밴드" => Ok(Equipment::ResistanceBand),
            "towel" | "수건" => Ok(Equipment::Towel),
            _ => Err(EquipmentError::Unknown(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentError {
    #[error("Unknown equipment: {0}")]
    Unknown(String),
}

#[derive(Debug, Display, Clone, Copy, Into, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct IntensityLevel(u8);

impl IntensityLevel {
    pub const MIN: IntensityLevel = IntensityLevel(1);
    pub const MAX: IntensityLevel = IntensityLevel(4);

    pub fn new(value: u8) -> Result<Self, IntensityError> {
        if !(1..=4).contains(&value) {
            return Err(IntensityError::OutOfRange(value));
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn clamped(value: u8) -> IntensityLevel {
        Self(value.clamp(1, 4))
    }

    /// Low-intensity exercises are the warmup and cooldown candidates.
    #[must_use]
    pub fn is_low(self) -> bool {
        self.0 <= 2
    }

    #[must_use]
    pub fn shifted(self, amount: i8) -> IntensityLevel {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self((i16::from(self.0) + i16::from(amount)).clamp(1, 4) as u8)
    }
}

/// Level of an exercise whose catalog record does not state one.
impl Default for IntensityLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<&str> for IntensityLevel {
    type Error = IntensityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u8>() {
            Ok(parsed_value) => IntensityLevel::new(parsed_value),
            Err(_) => Err(IntensityError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum IntensityError {
    #[error("Intensity level must be in the range 1 to 4 ({0} is not)")]
    OutOfRange(u8),
    #[error("Intensity level must be an integer")]
    ParseError,
}

/// The reps/sets/rest/duration block of an exercise, before or after
/// difficulty adjustment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Prescription {
    pub reps: Reps,
    pub sets: Sets,
    pub rest: RestTime,
    pub duration: ExerciseDuration,
}

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(1..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Reps {
        Self(scale(self.0, factor, 999))
    }
}

impl Default for Reps {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: u32) -> Result<Self, SetsError> {
        if !(1..100).contains(&value) {
            return Err(SetsError::OutOfRange);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Sets {
        Self(scale(self.0, factor, 99))
    }
}

impl Default for Sets {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<&str> for Sets {
    type Error = SetsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Sets::new(parsed_value),
            Err(_) => Err(SetsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetsError {
    #[error("Sets must be in the range 1 to 99")]
    OutOfRange,
    #[error("Sets must be an integer")]
    ParseError,
}

/// Rest between sets in seconds.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct RestTime(u32);

impl RestTime {
    pub fn new(value: u32) -> Result<Self, RestTimeError> {
        if !(1..1000).contains(&value) {
            return Err(RestTimeError::OutOfRange);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> RestTime {
        Self(scale(self.0, factor, 999))
    }
}

impl Default for RestTime {
    fn default() -> Self {
        Self(30)
    }
}

impl TryFrom<&str> for RestTime {
    type Error = RestTimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => RestTime::new(parsed_value),
            Err(_) => Err(RestTimeError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RestTimeError {
    #[error("Rest time must be in the range 1 to 999 seconds")]
    OutOfRange,
    #[error("Rest time must be an integer number of seconds")]
    ParseError,
}

/// Nominal time of one exercise in minutes.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseDuration(u32);

impl ExerciseDuration {
    pub fn new(value: u32) -> Result<Self, ExerciseDurationError> {
        if !(1..=180).contains(&value) {
            return Err(ExerciseDurationError::OutOfRange);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> ExerciseDuration {
        Self(scale(self.0, factor, 180))
    }
}

impl Default for ExerciseDuration {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<&str> for ExerciseDuration {
    type Error = ExerciseDurationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => ExerciseDuration::new(parsed_value),
            Err(_) => Err(ExerciseDurationError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseDurationError {
    #[error("Exercise duration must be in the range 1 to 180 minutes")]
    OutOfRange,
    #[error("Exercise duration must be an integer number of minutes")]
    ParseError,
}

/// Multiplies, rounds half-up and keeps the result within 1 to `max`.
fn scale(value: u32, factor: f64, max: u32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (f64::from(value) * factor).round() as u32;
    scaled.clamp(1, max)
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn iter_filter() -> Iter<'static, Self> {
        Self::iter()
    }
    fn name(self) -> &'static str;
}
