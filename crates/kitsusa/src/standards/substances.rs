use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Molar volume of an ideal gas at 25 °C and 1 atm, in litres.
pub const MOLAR_VOLUME_LITRES: f64 = 24.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationUnit {
    #[serde(rename = "ppm")]
    Ppm,
    #[serde(rename = "mg/m3", alias = "mg/m³")]
    MilligramsPerCubicMetre,
    #[serde(rename = "ug/m3", alias = "µg/m³", alias = "μg/m³")]
    MicrogramsPerCubicMetre,
}

impl ConcentrationUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            ConcentrationUnit::Ppm => "ppm",
            ConcentrationUnit::MilligramsPerCubicMetre => "mg/m3",
            ConcentrationUnit::MicrogramsPerCubicMetre => "ug/m3",
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Exposure-ratio cut points (measured / permissible) for the four bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioBands {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub danger: f64,
}

impl RatioBands {
    pub fn band(&self, ratio: f64) -> u8 {
        if ratio >= self.danger {
            10
        } else if ratio >= self.high {
            7
        } else if ratio >= self.medium {
            4
        } else if ratio >= self.low {
            2
        } else {
            1
        }
    }
}

impl Default for RatioBands {
    fn default() -> Self {
        Self {
            low: 0.5,
            medium: 1.0,
            high: 1.5,
            danger: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceThreshold {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_number: Option<String>,
    pub permissible_concentration: f64,
    pub unit: ConcentrationUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecular_weight: Option<f64>,
    pub evaluation_thresholds: RatioBands,
}

impl SubstanceThreshold {
    /// Convert a reading into this threshold's unit, or `None` when no
    /// conversion path exists.
    pub fn convert(&self, value: f64, from: ConcentrationUnit) -> Option<f64> {
        use ConcentrationUnit::*;

        let as_mg = |value: f64, unit: ConcentrationUnit| -> Option<f64> {
            match unit {
                MilligramsPerCubicMetre => Some(value),
                MicrogramsPerCubicMetre => Some(value / 1000.0),
                Ppm => self
                    .molecular_weight
                    .map(|weight| value * weight / MOLAR_VOLUME_LITRES),
            }
        };

        match (from, self.unit) {
            (from, to) if from == to => Some(value),
            (_, MilligramsPerCubicMetre) => as_mg(value, from),
            (_, MicrogramsPerCubicMetre) => as_mg(value, from).map(|mg| mg * 1000.0),
            (_, Ppm) => {
                let weight = self.molecular_weight?;
                as_mg(value, from).map(|mg| mg * MOLAR_VOLUME_LITRES / weight)
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |detail: String| ConfigurationError::InvalidSubstance {
            id: self.id.clone(),
            detail,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("substance id is empty".to_string()));
        }
        if !(self.permissible_concentration.is_finite() && self.permissible_concentration > 0.0) {
            return Err(invalid(format!(
                "permissible concentration {} must be positive",
                self.permissible_concentration
            )));
        }
        if let Some(weight) = self.molecular_weight {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(invalid(format!("molecular weight {weight} must be positive")));
            }
        }

        let bands = &self.evaluation_thresholds;
        let cuts = [bands.low, bands.medium, bands.high, bands.danger];
        if cuts.iter().any(|cut| !(cut.is_finite() && *cut > 0.0))
            || cuts.windows(2).any(|pair| pair[1] <= pair[0])
        {
            return Err(invalid(format!(
                "evaluation thresholds {cuts:?} must be positive and strictly increasing"
            )));
        }

        Ok(())
    }
}
