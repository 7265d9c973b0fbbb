use std::cmp::Ordering;

use derive_more::{Display, Into};

use crate::{BasePriority, BodyPartSelection, IntensityLevel};

const PAIN_WEIGHT: f64 = 100.0;
const BODY_PART_WEIGHT: f64 = 10.0;
const INTENSITY_WEIGHT: f64 = 1.0;
const MAPPING_WEIGHT: f64 = 0.1;
const SELECTION_ORDER_WEIGHT: f64 = 0.01;

/// Composite scheduling rank of one candidate exercise. Lower sorts earlier.
///
/// The weights are decade-separated, so a lower-weighted component never
/// overturns the ordering established by a higher-weighted one. Pain ranks
/// whole body parts, base priority breaks ties between body parts, intensity
/// nudges stronger exercises ahead within a body part, and the mapping and
/// selection positions are fractional tie-breakers.
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd)]
pub struct PriorityScore(f64);

impl PriorityScore {
    #[must_use]
    pub fn compute(
        selection: &BodyPartSelection,
        base_priority: BasePriority,
        mapping_priority: u32,
        intensity: IntensityLevel,
    ) -> PriorityScore {
        PriorityScore(
            PAIN_WEIGHT * f64::from(u8::from(selection.pain_level))
                + BODY_PART_WEIGHT * f64::from(u8::from(base_priority))
                - INTENSITY_WEIGHT * f64::from(u8::from(intensity))
                + MAPPING_WEIGHT * f64::from(mapping_priority)
                + SELECTION_ORDER_WEIGHT * f64::from(selection.selection_order),
        )
    }

    /// Total order over scores. Scores are finite by construction, so this
    /// is safe to use as a sort key.
    #[must_use]
    pub fn total_cmp(&self, other: &PriorityScore) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
