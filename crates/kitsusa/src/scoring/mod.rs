//! Per-factor scorers and the composite aggregator.
//!
//! Every scorer borrows a [`StandardsTable`](crate::standards::StandardsTable),
//! keeps no state between calls, and returns a [`FactorScore`] in `1..=10`
//! together with the components that produced it.

mod aggregate;
mod environmental;
mod hazard;
mod mental;
mod physical;
mod posture;
mod work_time;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::standards::ConcentrationUnit;

pub use aggregate::{CompositeAggregator, EvaluationResult};
pub use environmental::{EnvironmentalDetails, EnvironmentalFactorScorer, SubstanceReading};
pub use hazard::{HazardFactorScorer, HazardObservation};
pub use mental::{MentalDetails, MentalFactorScorer};
pub use physical::{ExertionDuration, PhysicalDetails, PhysicalExertion, PhysicalFactorScorer};
pub use posture::{
    OwasPosture, PostureAssessment, PostureMethod, PostureMethodKind, PostureObservation,
    RulaPosture,
};
pub use work_time::WorkTimeAdjuster;

/// Integer factor score in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FactorScore(u8);

impl FactorScore {
    pub const MIN: FactorScore = FactorScore(1);
    pub const MAX: FactorScore = FactorScore(10);

    pub fn new(value: u8) -> Result<Self, InputError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InputError::OutOfRange {
                field: "factor_score",
                value: i64::from(value),
                min: i64::from(Self::MIN.0),
                max: i64::from(Self::MAX.0),
            })
        }
    }

    /// Clamp a table value into range. Only used for validated table cells.
    pub(crate) fn saturating(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for FactorScore {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FactorScore> for u8 {
    fn from(value: FactorScore) -> Self {
        value.0
    }
}

impl fmt::Display for FactorScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four independent 3K risk dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Physical,
    Mental,
    Environmental,
    Hazard,
}

impl FactorKind {
    pub const ALL: [FactorKind; 4] = [
        FactorKind::Physical,
        FactorKind::Mental,
        FactorKind::Environmental,
        FactorKind::Hazard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FactorKind::Physical => "physical",
            FactorKind::Mental => "mental",
            FactorKind::Environmental => "environmental",
            FactorKind::Hazard => "hazard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FactorKind::Physical => "Physical load",
            FactorKind::Mental => "Mental load",
            FactorKind::Environmental => "Environmental exposure",
            FactorKind::Hazard => "Hazard",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorKind {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(FactorKind::Physical),
            "mental" => Ok(FactorKind::Mental),
            "environmental" => Ok(FactorKind::Environmental),
            "hazard" | "danger" => Ok(FactorKind::Hazard),
            _ => Err(InputError::UnknownFactor {
                value: value.to_string(),
            }),
        }
    }
}

/// One contribution to a factor score, kept for audit trails and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub source: String,
    pub points: f64,
    pub notes: String,
}

/// A factor score plus the components that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAssessment {
    pub factor: FactorKind,
    pub score: FactorScore,
    pub components: Vec<ScoreComponent>,
}

impl FactorAssessment {
    /// Assessment built from components that each carry a 1..=10 band score;
    /// the worst one wins and an empty list scores the floor.
    pub(crate) fn worst_of(factor: FactorKind, components: Vec<ScoreComponent>) -> Self {
        let worst = components
            .iter()
            .map(|component| component.points as u8)
            .max()
            .unwrap_or(FactorScore::MIN.0);
        Self {
            factor,
            score: FactorScore::saturating(worst),
            components,
        }
    }
}

/// Caller-supplied data that cannot be scored. Never clamped or skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{method} posture has unknown {axis} category {value}")]
    UnknownPostureCategory {
        method: PostureMethodKind,
        axis: &'static str,
        value: u8,
    },
    #[error("unknown substance '{id}'")]
    UnknownSubstance { id: String },
    #[error("cannot convert {substance} reading from {measured} to {permissible}")]
    UnitMismatch {
        substance: String,
        measured: ConcentrationUnit,
        permissible: ConcentrationUnit,
    },
    #[error("unknown work-time category '{value}'")]
    UnknownWorkTimeCategory { value: String },
    #[error("{field} value {value} outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} reading {value} is not a valid measurement")]
    InvalidMeasurement { field: String, value: f64 },
    #[error("unknown risk factor '{value}'")]
    UnknownFactor { value: String },
}

/// Reject negative or non-finite readings.
pub(crate) fn measurement(field: &str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InputError::InvalidMeasurement {
            field: field.to_string(),
            value,
        })
    }
}

/// A share of 100, such as relative humidity or percent of a shift.
pub(crate) fn percentage(field: &str, value: f64) -> Result<f64, InputError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::InvalidMeasurement {
            field: field.to_string(),
            value,
        })
    }
}

/// Check an integer level against its inclusive range.
pub(crate) fn level(field: &'static str, value: u8, min: u8, max: u8) -> Result<u8, InputError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::OutOfRange {
            field,
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}
