use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Highest risk point reachable with likelihood and severity in 1..=5.
pub const MAX_RISK_POINT: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBand {
    pub level: RiskLevel,
    pub min_point: u8,
    pub max_point: u8,
    pub score: u8,
    pub action: String,
}

/// Likelihood × severity banding used by the hazard factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMatrix {
    pub bands: Vec<RiskBand>,
}

impl RiskMatrix {
    /// Band containing `point`. Bands are contiguous, so each lower bound
    /// belongs to its own (more severe) band.
    pub fn band_for(&self, point: u8) -> Option<&RiskBand> {
        self.bands
            .iter()
            .rev()
            .find(|band| band.min_point <= point)
            .filter(|band| point <= band.max_point)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let first = self
            .bands
            .first()
            .ok_or_else(|| ConfigurationError::InvalidRiskMatrix("no bands defined".to_string()))?;
        if first.min_point != 1 {
            return Err(ConfigurationError::InvalidRiskMatrix(format!(
                "first band starts at {} instead of 1",
                first.min_point
            )));
        }

        for band in &self.bands {
            if band.min_point > band.max_point {
                return Err(ConfigurationError::InvalidRiskMatrix(format!(
                    "{} band range {}..={} is empty",
                    band.level, band.min_point, band.max_point
                )));
            }
            if band.max_point > MAX_RISK_POINT {
                return Err(ConfigurationError::InvalidRiskMatrix(format!(
                    "{} band ends at {} beyond {MAX_RISK_POINT}",
                    band.level, band.max_point
                )));
            }
            if !(1..=10).contains(&band.score) {
                return Err(ConfigurationError::InvalidRiskMatrix(format!(
                    "{} band score {} outside 1..=10",
                    band.level, band.score
                )));
            }
        }

        for pair in self.bands.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if upper.min_point != lower.max_point + 1 {
                return Err(ConfigurationError::InvalidRiskMatrix(format!(
                    "gap or overlap between {} and {} bands",
                    lower.level, upper.level
                )));
            }
            if upper.score <= lower.score || upper.level <= lower.level {
                return Err(ConfigurationError::InvalidRiskMatrix(format!(
                    "{} band must rank above {}",
                    upper.level, lower.level
                )));
            }
        }

        let last = &self.bands[self.bands.len() - 1];
        if last.max_point != MAX_RISK_POINT {
            return Err(ConfigurationError::InvalidRiskMatrix(format!(
                "last band ends at {} instead of {MAX_RISK_POINT}",
                last.max_point
            )));
        }

        Ok(())
    }
}
