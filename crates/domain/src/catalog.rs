use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::LazyLock,
};

use crate::{
    BasePriority, BodyPart, BodyPartID, Contraindication, DifficultyScore, Equipment,
    ExerciseDuration, ExerciseID, ExerciseTemplate, IntensityLevel, Name, PainLevel, Prescription,
    Reps, RestTime, Severity, Sets,
};

/// Restricts a body-part mapping to the pain levels it serves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PainGate {
    #[default]
    Any,
    Exact(PainLevel),
    Between(PainLevel, PainLevel),
}

impl PainGate {
    #[must_use]
    pub fn admits(&self, pain: PainLevel) -> bool {
        match self {
            PainGate::Any => true,
            PainGate::Exact(level) => pain == *level,
            PainGate::Between(min, max) => (*min..=*max).contains(&pain),
        }
    }
}

impl fmt::Display for PainGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PainGate::Any => write!(f, "all"),
            PainGate::Exact(level) => write!(f, "{level}"),
            PainGate::Between(min, max) => write!(f, "{min}-{max}"),
        }
    }
}

impl TryFrom<&str> for PainGate {
    type Error = PainGateError;

    /// Accepts `all` (or an empty string), a single level such as `3`, or an
    /// inclusive span such as `1-3`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(PainGate::Any);
        }

        if let Some((min, max)) = trimmed.split_once('-') {
            let (Some(min), Some(max)) = (parse_level(min), parse_level(max)) else {
                return Err(PainGateError::Unparseable(value.to_string()));
            };
            if min > max {
                return Err(PainGateError::Inverted(value.to_string()));
            }
            return Ok(PainGate::Between(min, max));
        }

        parse_level(trimmed)
            .map(PainGate::Exact)
            .ok_or_else(|| PainGateError::Unparseable(value.to_string()))
    }
}

fn parse_level(value: &str) -> Option<PainLevel> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|level| PainLevel::new(level).ok())
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PainGateError {
    #[error("Pain gate must be \"all\", a level or a span: {0}")]
    Unparseable(String),
    #[error("Pain gate span is inverted: {0}")]
    Inverted(String),
}

/// Assigns an exercise to a body part. `priority` ranks the exercise within
/// the body part, lower first; `intensity` overrides the template's level
/// for this body part only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPartMapping {
    pub body_part_id: BodyPartID,
    pub exercise_id: ExerciseID,
    pub priority: u32,
    pub intensity: Option<IntensityLevel>,
    pub pain_gate: PainGate,
}

/// The read-only exercise knowledge a course is generated from: body parts,
/// exercise templates, their mappings and the contraindication rules.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    body_parts: BTreeMap<BodyPartID, BodyPart>,
    exercises: BTreeMap<ExerciseID, ExerciseTemplate>,
    mappings: BTreeMap<BodyPartID, Vec<BodyPartMapping>>,
    contraindications: BTreeMap<(ExerciseID, BodyPartID), Contraindication>,
}

impl Catalog {
    #[must_use]
    pub fn new(
        body_parts: Vec<BodyPart>,
        exercises: Vec<ExerciseTemplate>,
        mappings: Vec<BodyPartMapping>,
        contraindications: Vec<Contraindication>,
    ) -> Catalog {
        let mut grouped: BTreeMap<BodyPartID, Vec<BodyPartMapping>> = BTreeMap::new();
        for mapping in mappings {
            grouped
                .entry(mapping.body_part_id)
                .or_default()
                .push(mapping);
        }
        for group in grouped.values_mut() {
            group.sort_by_key(|mapping| (mapping.priority, mapping.exercise_id));
        }

        Catalog {
            body_parts: body_parts.into_iter().map(|part| (part.id, part)).collect(),
            exercises: exercises
                .into_iter()
                .map(|exercise| (exercise.id, exercise))
                .collect(),
            mappings: grouped,
            contraindications: contraindications
                .into_iter()
                .map(|record| ((record.exercise_id, record.body_part_id), record))
                .collect(),
        }
    }

    #[must_use]
    pub fn body_part(&self, id: BodyPartID) -> Option<&BodyPart> {
        self.body_parts.get(&id)
    }

    #[must_use]
    pub fn body_part_named(&self, name: &str) -> Option<&BodyPart> {
        self.body_parts
            .values()
            .find(|part| part.name.as_ref() == name)
    }

    pub fn body_parts(&self) -> impl Iterator<Item = &BodyPart> {
        self.body_parts.values()
    }

    #[must_use]
    pub fn exercise(&self, id: ExerciseID) -> Option<&ExerciseTemplate> {
        self.exercises.get(&id)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &ExerciseTemplate> {
        self.exercises.values()
    }

    /// Unknown body parts rank last.
    #[must_use]
    pub fn base_priority(&self, id: BodyPartID) -> BasePriority {
        self.body_part(id)
            .map_or_else(BasePriority::default, |part| part.base_priority)
    }

    /// The body part's mappings in priority order.
    #[must_use]
    pub fn mappings_for(&self, id: BodyPartID) -> &[BodyPartMapping] {
        self.mappings.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contraindication_for(
        &self,
        exercise: ExerciseID,
        body_part: BodyPartID,
    ) -> Option<&Contraindication> {
        self.contraindications.get(&(exercise, body_part))
    }

    pub fn contraindications(&self) -> impl Iterator<Item = &Contraindication> {
        self.contraindications.values()
    }

    /// The intensity an exercise is served at for a mapping: the mapping's
    /// override if present, the template's level otherwise.
    #[must_use]
    pub fn resolved_intensity(&self, mapping: &BodyPartMapping) -> IntensityLevel {
        mapping.intensity.unwrap_or_else(|| {
            self.exercise(mapping.exercise_id)
                .map_or_else(IntensityLevel::default, |template| template.intensity)
        })
    }
}

/// The built-in starter catalog. Callers with their own catalog source
/// bypass it entirely.
#[must_use]
pub fn bank() -> &'static Catalog {
    &BANK
}

static BANK: LazyLock<Catalog> = LazyLock::new(|| {
    let names: BTreeMap<&'static str, ExerciseID> = EXERCISES
        .iter()
        .enumerate()
        .map(|(index, seed)| (seed.name, ExerciseID::from(index as u128 + 1)))
        .collect();

    let exercises = EXERCISES
        .iter()
        .enumerate()
        .filter_map(|(index, seed)| seed.build(ExerciseID::from(index as u128 + 1)))
        .collect();

    let body_parts = BODY_PARTS.iter().filter_map(BodyPartSeed::build).collect();

    let mappings = BODY_PARTS
        .iter()
        .flat_map(|part| {
            part.exercises
                .iter()
                .enumerate()
                .filter_map(|(rank, seed)| seed.build(BodyPartID::from(part.id), rank, &names))
        })
        .collect();

    let contraindications = CONTRAINDICATIONS
        .iter()
        .filter_map(|seed| seed.build(&names))
        .collect();

    Catalog::new(body_parts, exercises, mappings, contraindications)
});

struct BodyPartSeed {
    id: u128,
    name: &'static str,
    base_priority: u8,
    /// Exercises in mapping priority order.
    exercises: &'static [MappingSeed],
}

impl BodyPartSeed {
    fn build(&self) -> Option<BodyPart> {
        Some(BodyPart {
            id: BodyPartID::from(self.id),
            name: Name::new(self.name).ok()?,
            base_priority: BasePriority::new(self.base_priority).ok()?,
        })
    }
}

struct MappingSeed {
    exercise: &'static str,
    pain_gate: &'static str,
    intensity: Option<u8>,
}

impl MappingSeed {
    const fn of(exercise: &'static str) -> MappingSeed {
        MappingSeed {
            exercise,
            pain_gate: "all",
            intensity: None,
        }
    }

    fn build(
        &self,
        body_part_id: BodyPartID,
        rank: usize,
        names: &BTreeMap<&'static str, ExerciseID>,
    ) -> Option<BodyPartMapping> {
        Some(BodyPartMapping {
            body_part_id,
            exercise_id: *names.get(self.exercise)?,
            priority: u32::try_from(rank).ok()?,
            intensity: self
                .intensity
                .and_then(|level| IntensityLevel::new(level).ok()),
            pain_gate: PainGate::try_from(self.pain_gate).ok()?,
        })
    }
}

struct ExerciseSeed {
    name: &'static str,
    intensity: u8,
    difficulty: u8,
    reps: u32,
    sets: u32,
    rest: u32,
    minutes: u32,
    equipment: &'static [Equipment],
    active: bool,
}

impl ExerciseSeed {
    const fn new(
        name: &'static str,
        intensity: u8,
        difficulty: u8,
        equipment: &'static [Equipment],
        minutes: u32,
    ) -> ExerciseSeed {
        ExerciseSeed {
            name,
            intensity,
            difficulty,
            reps: 10,
            sets: 3,
            rest: 30,
            minutes,
            equipment,
            active: true,
        }
    }

    fn build(&self, id: ExerciseID) -> Option<ExerciseTemplate> {
        Some(ExerciseTemplate {
            id,
            name: Name::new(self.name).ok()?,
            intensity: IntensityLevel::new(self.intensity).ok()?,
            difficulty: DifficultyScore::new(self.difficulty).ok()?,
            prescription: Prescription {
                reps: Reps::new(self.reps).ok()?,
                sets: Sets::new(self.sets).ok()?,
                rest: RestTime::new(self.rest).ok()?,
                duration: ExerciseDuration::new(self.minutes).ok()?,
            },
            equipment: self.equipment.iter().copied().collect::<BTreeSet<_>>(),
            active: self.active,
        })
    }
}

struct ContraindicationSeed {
    exercise: &'static str,
    body_part: u128,
    min_pain: Option<u8>,
    severity: Severity,
    reason: &'static str,
}

impl ContraindicationSeed {
    fn build(&self, names: &BTreeMap<&'static str, ExerciseID>) -> Option<Contraindication> {
        Some(Contraindication {
            exercise_id: *names.get(self.exercise)?,
            body_part_id: BodyPartID::from(self.body_part),
            min_pain: self.min_pain.and_then(|level| PainLevel::new(level).ok()),
            severity: self.severity,
            reason: Some(self.reason.to_string()),
        })
    }
}

const BODYWEIGHT: &[Equipment] = &[Equipment::None];

const LOWER_BACK: u128 = 1;
const KNEE: u128 = 2;
const SHOULDER: u128 = 3;
const NECK: u128 = 4;
const WRIST: u128 = 5;
const ANKLE: u128 = 6;
const ELBOW: u128 = 7;
const HIP: u128 = 8;
const UPPER_BACK: u128 = 9;
const CHEST: u128 = 10;

const BODY_PARTS: &[BodyPartSeed] = &[
    BodyPartSeed {
        id: LOWER_BACK,
        name: "허리",
        base_priority: 1,
        exercises: &[
            MappingSeed::of("Cat-Cow Stretch"),
            MappingSeed::of("Pelvic Tilt"),
            MappingSeed::of("Child's Pose"),
            MappingSeed::of("Knee-to-Chest Stretch"),
            MappingSeed::of("Bird Dog"),
            MappingSeed {
                pain_gate: "1-4",
                ..MappingSeed::of("Glute Bridge")
            },
            MappingSeed::of("Plank"),
            MappingSeed::of("Superman Hold"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Standing Toe Touch")
            },
            MappingSeed::of("Resistance Band Row"),
            MappingSeed {
                pain_gate: "1-2",
                ..MappingSeed::of("Dumbbell Deadlift")
            },
            MappingSeed::of("Roman Chair Sit-Up"),
        ],
    },
    BodyPartSeed {
        id: KNEE,
        name: "무릎",
        base_priority: 2,
        exercises: &[
            MappingSeed::of("Ankle Pump"),
            MappingSeed::of("Quad Set"),
            MappingSeed::of("Straight Leg Raise"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Wall Squat")
            },
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Step Up")
            },
            MappingSeed {
                pain_gate: "1-2",
                ..MappingSeed::of("Leg Press")
            },
        ],
    },
    BodyPartSeed {
        id: SHOULDER,
        name: "어깨",
        base_priority: 3,
        exercises: &[
            MappingSeed::of("Pendulum Swing"),
            MappingSeed::of("Wall Slide"),
            MappingSeed::of("Band External Rotation"),
            MappingSeed::of("Band Pull Apart"),
            MappingSeed {
                pain_gate: "1-2",
                ..MappingSeed::of("Overhead Press")
            },
        ],
    },
    BodyPartSeed {
        id: NECK,
        name: "목",
        base_priority: 4,
        exercises: &[
            MappingSeed::of("Chin Tuck"),
            MappingSeed::of("Neck Side Stretch"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Isometric Neck Press")
            },
            MappingSeed::of("Towel Neck Extension"),
        ],
    },
    BodyPartSeed {
        id: WRIST,
        name: "손목",
        base_priority: 5,
        exercises: &[
            MappingSeed::of("Wrist Flexor Stretch"),
            MappingSeed::of("Wrist Circles"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Wrist Curl")
            },
        ],
    },
    BodyPartSeed {
        id: ANKLE,
        name: "발목",
        base_priority: 5,
        exercises: &[
            MappingSeed::of("Ankle Pump"),
            MappingSeed::of("Ankle Alphabet"),
            MappingSeed::of("Calf Raise"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Single-Leg Balance")
            },
        ],
    },
    BodyPartSeed {
        id: ELBOW,
        name: "팔꿈치",
        base_priority: 6,
        exercises: &[
            MappingSeed::of("Elbow Flexor Stretch"),
            MappingSeed::of("Eccentric Wrist Extension"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Hammer Curl")
            },
        ],
    },
    BodyPartSeed {
        id: HIP,
        name: "고관절",
        base_priority: 6,
        exercises: &[
            MappingSeed::of("Hip Flexor Stretch"),
            MappingSeed::of("Clamshell"),
            MappingSeed {
                intensity: Some(2),
                ..MappingSeed::of("Glute Bridge")
            },
            MappingSeed::of("Hip Thrust"),
        ],
    },
    BodyPartSeed {
        id: UPPER_BACK,
        name: "등",
        base_priority: 7,
        exercises: &[
            MappingSeed::of("Thoracic Extension"),
            MappingSeed::of("Scapular Squeeze"),
            MappingSeed::of("Band Pull Apart"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Seated Row")
            },
        ],
    },
    BodyPartSeed {
        id: CHEST,
        name: "가슴",
        base_priority: 8,
        exercises: &[
            MappingSeed::of("Doorway Pec Stretch"),
            MappingSeed::of("Wall Push-Up"),
            MappingSeed {
                pain_gate: "1-3",
                ..MappingSeed::of("Gym Ball Chest Press")
            },
            MappingSeed {
                pain_gate: "1-2",
                ..MappingSeed::of("Push-Up")
            },
        ],
    },
];

const EXERCISES: &[ExerciseSeed] = &[
    ExerciseSeed::new("Cat-Cow Stretch", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Pelvic Tilt", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Child's Pose", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Knee-to-Chest Stretch", 2, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Bird Dog", 3, 3, BODYWEIGHT, 10),
    ExerciseSeed::new("Glute Bridge", 3, 4, BODYWEIGHT, 10),
    ExerciseSeed::new("Plank", 3, 4, BODYWEIGHT, 10),
    ExerciseSeed::new("Superman Hold", 4, 6, BODYWEIGHT, 10),
    ExerciseSeed::new("Standing Toe Touch", 2, 3, BODYWEIGHT, 5),
    ExerciseSeed::new(
        "Resistance Band Row",
        3,
        5,
        &[Equipment::ResistanceBand],
        10,
    ),
    ExerciseSeed::new("Dumbbell Deadlift", 4, 8, &[Equipment::Dumbbell], 15),
    ExerciseSeed {
        active: false,
        ..ExerciseSeed::new("Roman Chair Sit-Up", 4, 9, &[Equipment::Machine], 10)
    },
    ExerciseSeed::new("Ankle Pump", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Quad Set", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Straight Leg Raise", 2, 3, BODYWEIGHT, 5),
    ExerciseSeed::new("Wall Squat", 3, 4, BODYWEIGHT, 10),
    ExerciseSeed::new("Step Up", 3, 5, &[Equipment::Chair], 10),
    ExerciseSeed::new("Leg Press", 4, 7, &[Equipment::Machine], 15),
    ExerciseSeed::new("Pendulum Swing", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Wall Slide", 2, 2, BODYWEIGHT, 5),
    ExerciseSeed::new(
        "Band External Rotation",
        2,
        4,
        &[Equipment::ResistanceBand],
        5,
    ),
    ExerciseSeed::new("Band Pull Apart", 3, 5, &[Equipment::ResistanceBand], 10),
    ExerciseSeed::new("Overhead Press", 4, 8, &[Equipment::Dumbbell], 10),
    ExerciseSeed::new("Chin Tuck", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Neck Side Stretch", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Isometric Neck Press", 2, 3, BODYWEIGHT, 5),
    ExerciseSeed::new("Towel Neck Extension", 2, 4, &[Equipment::Towel], 5),
    ExerciseSeed::new("Wrist Flexor Stretch", 1, 1, BODYWEIGHT, 5),
    ExerciseSeed::new("Wrist Circles", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Wrist Curl", 2, 4, &[Equipment::Dumbbell], 5),
    ExerciseSeed::new("Ankle Alphabet", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Calf Raise", 2, 3, BODYWEIGHT, 5),
    ExerciseSeed::new("Single-Leg Balance", 3, 5, BODYWEIGHT, 10),
    ExerciseSeed::new("Elbow Flexor Stretch", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new(
        "Eccentric Wrist Extension",
        2,
        4,
        &[Equipment::Dumbbell],
        5,
    ),
    ExerciseSeed::new("Hammer Curl", 3, 5, &[Equipment::Dumbbell], 10),
    ExerciseSeed::new("Hip Flexor Stretch", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Clamshell", 2, 3, BODYWEIGHT, 5),
    ExerciseSeed::new("Hip Thrust", 4, 6, BODYWEIGHT, 10),
    ExerciseSeed::new("Thoracic Extension", 1, 2, &[Equipment::FoamRoller], 5),
    ExerciseSeed::new("Scapular Squeeze", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Seated Row", 3, 6, &[Equipment::Machine], 10),
    ExerciseSeed::new("Doorway Pec Stretch", 1, 2, BODYWEIGHT, 5),
    ExerciseSeed::new("Wall Push-Up", 2, 3, BODYWEIGHT, 5),
    ExerciseSeed::new("Push-Up", 4, 7, BODYWEIGHT, 10),
    ExerciseSeed::new("Gym Ball Chest Press", 3, 5, &[Equipment::GymBall], 10),
];

const CONTRAINDICATIONS: &[ContraindicationSeed] = &[
    ContraindicationSeed {
        exercise: "Plank",
        body_part: LOWER_BACK,
        min_pain: Some(4),
        severity: Severity::Strict,
        reason: "core bracing overloads an acutely painful back",
    },
    ContraindicationSeed {
        exercise: "Superman Hold",
        body_part: LOWER_BACK,
        min_pain: Some(4),
        severity: Severity::Strict,
        reason: "hyperextends the spine",
    },
    ContraindicationSeed {
        exercise: "Standing Toe Touch",
        body_part: LOWER_BACK,
        min_pain: Some(4),
        severity: Severity::Strict,
        reason: "loads the spine in flexion",
    },
    ContraindicationSeed {
        exercise: "Wall Squat",
        body_part: KNEE,
        min_pain: Some(3),
        severity: Severity::Warning,
        reason: "stop if the kneecap aches",
    },
    ContraindicationSeed {
        exercise: "Overhead Press",
        body_part: SHOULDER,
        min_pain: Some(3),
        severity: Severity::Strict,
        reason: "overhead load aggravates impingement",
    },
    ContraindicationSeed {
        exercise: "Towel Neck Extension",
        body_part: NECK,
        min_pain: None,
        severity: Severity::Warning,
        reason: "move slowly and stop on dizziness",
    },
    ContraindicationSeed {
        exercise: "Hip Thrust",
        body_part: HIP,
        min_pain: Some(4),
        severity: Severity::Strict,
        reason: "end-range hip extension under load",
    },
    ContraindicationSeed {
        exercise: "Push-Up",
        body_part: CHEST,
        min_pain: Some(3),
        severity: Severity::Warning,
        reason: "drop to the wall variant when form degrades",
    },
];
