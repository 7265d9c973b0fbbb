use derive_more::{Deref, Display, Into};
use uuid::Uuid;

use crate::Name;

/// A body region a user can select for rehabilitation, as recorded in the
/// catalog. The base priority ranks regions against each other when courses
/// cover more than one (lower ranks first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    pub id: BodyPartID,
    pub name: Name,
    pub base_priority: BasePriority,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyPartID(Uuid);

impl BodyPartID {
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

impl From<Uuid> for BodyPartID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for BodyPartID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// One user-chosen body part within a single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPartSelection {
    pub body_part_id: BodyPartID,
    pub name: Name,
    pub pain_level: PainLevel,
    /// Position of this body part in the user's selection, starting at 0.
    pub selection_order: u32,
}

#[derive(Debug, Display, Clone, Copy, Into, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PainLevel(u8);

impl PainLevel {
    pub const MIN: PainLevel = PainLevel(1);
    pub const MAX: PainLevel = PainLevel(5);

    pub fn new(value: u8) -> Result<Self, PainLevelError> {
        if !(1..=5).contains(&value) {
            return Err(PainLevelError::OutOfRange(value));
        }

        Ok(Self(value))
    }

    /// Pain at this level or above calls for reduced intensity and extra
    /// safety gating throughout the pipeline.
    #[must_use]
    pub fn is_severe(self) -> bool {
        self.0 >= 4
    }
}

impl TryFrom<&str> for PainLevel {
    type Error = PainLevelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u8>() {
            Ok(parsed_value) => PainLevel::new(parsed_value),
            Err(_) => Err(PainLevelError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PainLevelError {
    #[error("Pain level must be in the range 1 to 5 ({0} is not)")]
    OutOfRange(u8),
    #[error("Pain level must be an integer")]
    ParseError,
}

#[derive(Debug, Display, Clone, Copy, Into, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BasePriority(u8);

impl BasePriority {
    pub fn new(value: u8) -> Result<Self, BasePriorityError> {
        if !(1..=10).contains(&value) {
            return Err(BasePriorityError::OutOfRange(value));
        }

        Ok(Self(value))
    }
}

/// Body parts without a catalog ranking sort last.
impl Default for BasePriority {
    fn default() -> Self {
        Self(10)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BasePriorityError {
    #[error("Base priority must be in the range 1 to 10 ({0} is not)")]
    OutOfRange(u8),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, Ok(PainLevel(1)))]
    #[case(5, Ok(PainLevel(5)))]
    #[case(0, Err(PainLevelError::OutOfRange(0)))]
    #[case(6, Err(PainLevelError::OutOfRange(6)))]
    fn test_pain_level_new(#[case] value: u8, #[case] expected: Result<PainLevel, PainLevelError>) {
        assert_eq!(PainLevel::new(value), expected);
    }

    #[rstest]
    #[case("3", Ok(PainLevel(3)))]
    #[case("9", Err(PainLevelError::OutOfRange(9)))]
    #[case("mild", Err(PainLevelError::ParseError))]
    #[case("2.5", Err(PainLevelError::ParseError))]
    fn test_pain_level_try_from(
        #[case] value: &str,
        #[case] expected: Result<PainLevel, PainLevelError>,
    ) {
        assert_eq!(PainLevel::try_from(value), expected);
    }

    #[rstest]
    #[case(PainLevel(3), false)]
    #[case(PainLevel(4), true)]
    #[case(PainLevel(5), true)]
    fn test_pain_level_is_severe(#[case] pain_level: PainLevel, #[case] expected: bool) {
        assert_eq!(pain_level.is_severe(), expected);
    }

    #[rstest]
    #[case(1, Ok(BasePriority(1)))]
    #[case(10, Ok(BasePriority(10)))]
    #[case(0, Err(BasePriorityError::OutOfRange(0)))]
    #[case(11, Err(BasePriorityError::OutOfRange(11)))]
    fn test_base_priority_new(
        #[case] value: u8,
        #[case] expected: Result<BasePriority, BasePriorityError>,
    ) {
        assert_eq!(BasePriority::new(value), expected);
    }

    #[test]
    fn test_base_priority_default() {
        assert_eq!(BasePriority::default(), BasePriority(10));
    }

    #[test]
    fn test_body_part_id_nil() {
        assert!(BodyPartID::nil().is_nil());
        assert!(!BodyPartID::from(1).is_nil());
    }

    #[test]
    fn test_body_part_id_new() {
        assert!(!BodyPartID::new().is_nil());
        assert_ne!(BodyPartID::new(), BodyPartID::new());
    }
}
