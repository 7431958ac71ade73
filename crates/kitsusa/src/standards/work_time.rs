use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigurationError;
use crate::scoring::InputError;

/// Daily exposure duration class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkTimeCategory {
    /// Under one hour.
    A,
    /// One to four hours.
    B,
    /// Four to eight hours.
    C,
    /// Eight hours or more.
    D,
}

impl WorkTimeCategory {
    pub const ALL: [WorkTimeCategory; 4] = [
        WorkTimeCategory::A,
        WorkTimeCategory::B,
        WorkTimeCategory::C,
        WorkTimeCategory::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkTimeCategory::A => "a",
            WorkTimeCategory::B => "b",
            WorkTimeCategory::C => "c",
            WorkTimeCategory::D => "d",
        }
    }

    pub fn duration_label(self) -> &'static str {
        match self {
            WorkTimeCategory::A => "<1h",
            WorkTimeCategory::B => "1-4h",
            WorkTimeCategory::C => "4-8h",
            WorkTimeCategory::D => ">=8h",
        }
    }

    /// Category for a number of exposure hours per day.
    pub fn from_hours(hours: f64) -> Result<Self, InputError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(InputError::InvalidMeasurement {
                field: "work_hours".to_string(),
                value: hours,
            });
        }

        Ok(if hours >= 8.0 {
            WorkTimeCategory::D
        } else if hours >= 4.0 {
            WorkTimeCategory::C
        } else if hours >= 1.0 {
            WorkTimeCategory::B
        } else {
            WorkTimeCategory::A
        })
    }
}

impl fmt::Display for WorkTimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkTimeCategory {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(WorkTimeCategory::A),
            "b" => Ok(WorkTimeCategory::B),
            "c" => Ok(WorkTimeCategory::C),
            "d" => Ok(WorkTimeCategory::D),
            _ => Err(InputError::UnknownWorkTimeCategory {
                value: value.to_string(),
            }),
        }
    }
}

/// Multiplicative factor per work-time category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkTimeFactors {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl WorkTimeFactors {
    pub fn factor(&self, category: WorkTimeCategory) -> f64 {
        match category {
            WorkTimeCategory::A => self.a,
            WorkTimeCategory::B => self.b,
            WorkTimeCategory::C => self.c,
            WorkTimeCategory::D => self.d,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let factors = [self.a, self.b, self.c, self.d];
        if factors.iter().any(|factor| !(factor.is_finite() && *factor > 0.0)) {
            return Err(ConfigurationError::InvalidWorkTime(format!(
                "factors {factors:?} must be positive"
            )));
        }
        if factors.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ConfigurationError::InvalidWorkTime(format!(
                "factors {factors:?} must not decrease with longer exposure"
            )));
        }
        Ok(())
    }
}
