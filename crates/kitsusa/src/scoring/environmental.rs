use serde::{Deserialize, Serialize};

use super::{measurement, percentage, FactorAssessment, FactorKind, FactorScore, InputError, ScoreComponent};
use crate::standards::{ConcentrationUnit, StandardsTable, ThresholdLadder};

/// A measured airborne concentration of one registered substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceReading {
    pub substance_id: String,
    pub concentration: f64,
    pub unit: ConcentrationUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting_lux: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dust_mg_m3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration_m_s2: Option<f64>,
}

pub struct EnvironmentalFactorScorer<'a> {
    standards: &'a StandardsTable,
}

impl<'a> EnvironmentalFactorScorer<'a> {
    pub fn new(standards: &'a StandardsTable) -> Self {
        Self { standards }
    }

    pub fn score(
        &self,
        details: &EnvironmentalDetails,
        substances: &[SubstanceReading],
    ) -> Result<FactorScore, InputError> {
        self.assess(details, substances)
            .map(|assessment| assessment.score)
    }

    pub fn assess(
        &self,
        details: &EnvironmentalDetails,
        substances: &[SubstanceReading],
    ) -> Result<FactorAssessment, InputError> {
        let mut components = Vec::new();

        for reading in substances {
            components.push(self.substance_component(reading)?);
        }

        let ladders = self.standards.ambient_ladders();

        if let Some(temperature) = details.temperature_c {
            if !temperature.is_finite() {
                return Err(InputError::InvalidMeasurement {
                    field: "temperature_c".to_string(),
                    value: temperature,
                });
            }
            let heat = ladders.heat_c.band(temperature);
            let cold = ladders.cold_c.band(temperature);
            let (band, side) = if heat >= cold { (heat, "heat") } else { (cold, "cold") };
            components.push(ScoreComponent {
                source: "temperature".to_string(),
                points: f64::from(band),
                notes: format!("{temperature} C ({side} stress)"),
            });
        }

        if let Some(humidity) = details.humidity_percent {
            let humidity = percentage("humidity_percent", humidity)?;
            let band = ladders
                .humidity_high_percent
                .band(humidity)
                .max(ladders.humidity_low_percent.band(humidity));
            components.push(ScoreComponent {
                source: "humidity".to_string(),
                points: f64::from(band),
                notes: format!("{humidity}% relative humidity"),
            });
        }

        let readings: [(&str, Option<f64>, &ThresholdLadder, &str); 4] = [
            ("noise", details.noise_db, &ladders.noise_db, "dB(A)"),
            ("lighting", details.lighting_lux, &ladders.lighting_lux, "lx"),
            ("dust", details.dust_mg_m3, &ladders.dust_mg_m3, "mg/m3"),
            ("vibration", details.vibration_m_s2, &ladders.vibration_m_s2, "m/s2"),
        ];

        for (name, reading, ladder, unit) in readings {
            let Some(value) = reading else { continue };
            let value = measurement(name, value)?;
            components.push(ScoreComponent {
                source: name.to_string(),
                points: f64::from(ladder.band(value)),
                notes: format!("{value} {unit}"),
            });
        }

        Ok(FactorAssessment::worst_of(FactorKind::Environmental, components))
    }

    fn substance_component(&self, reading: &SubstanceReading) -> Result<ScoreComponent, InputError> {
        let threshold = self
            .standards
            .substance(&reading.substance_id)
            .ok_or_else(|| InputError::UnknownSubstance {
                id: reading.substance_id.clone(),
            })?;

        let measured = measurement(&reading.substance_id, reading.concentration)?;
        let converted = threshold
            .convert(measured, reading.unit)
            .ok_or_else(|| InputError::UnitMismatch {
                substance: reading.substance_id.clone(),
                measured: reading.unit,
                permissible: threshold.unit,
            })?;

        let ratio = converted / threshold.permissible_concentration;
        let band = threshold.evaluation_thresholds.band(ratio);

        Ok(ScoreComponent {
            source: threshold.id.clone(),
            points: f64::from(band),
            notes: format!(
                "{measured} {} against limit {} {} (ratio {ratio:.2})",
                reading.unit, threshold.permissible_concentration, threshold.unit
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: &str, concentration: f64, unit: ConcentrationUnit) -> SubstanceReading {
        SubstanceReading {
            substance_id: id.to_string(),
            concentration,
            unit,
        }
    }

    #[test]
    fn nothing_supplied_scores_the_floor() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        let score = scorer
            .score(&EnvironmentalDetails::default(), &[])
            .expect("empty input is valid");
        assert_eq!(score, FactorScore::MIN);
    }

    #[test]
    fn worst_substance_dominates() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        let readings = vec![
            reading("acetone", 100.0, ConcentrationUnit::Ppm),
            reading("toluene", 40.0, ConcentrationUnit::Ppm),
            reading("xylene", 30.0, ConcentrationUnit::Ppm),
        ];

        let assessment = scorer
            .assess(&EnvironmentalDetails::default(), &readings)
            .expect("registered substances");

        // toluene sits at twice its limit.
        assert_eq!(assessment.score.value(), 10);
        assert_eq!(assessment.components.len(), 3);
    }

    #[test]
    fn mass_readings_are_converted_before_comparison() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        // 20 ppm toluene expressed in mg/m3 is exactly the limit.
        let mg = 20.0 * 92.14 / 24.45;
        let score = scorer
            .score(
                &EnvironmentalDetails::default(),
                &[reading("toluene", mg * 1.01, ConcentrationUnit::MilligramsPerCubicMetre)],
            )
            .expect("convertible reading");
        assert_eq!(score.value(), 4);
    }

    #[test]
    fn humidity_above_saturation_is_rejected() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        let details = EnvironmentalDetails {
            humidity_percent: Some(250.0),
            ..EnvironmentalDetails::default()
        };

        match scorer.score(&details, &[]) {
            Err(InputError::InvalidMeasurement { field, .. }) => {
                assert_eq!(field, "humidity_percent")
            }
            other => panic!("expected invalid measurement, got {other:?}"),
        }
    }

    #[test]
    fn unknown_substance_is_never_skipped() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        let readings = vec![
            reading("toluene", 1.0, ConcentrationUnit::Ppm),
            reading("unknown-xyz", 1.0, ConcentrationUnit::Ppm),
        ];

        match scorer.score(&EnvironmentalDetails::default(), &readings) {
            Err(InputError::UnknownSubstance { id }) => assert_eq!(id, "unknown-xyz"),
            other => panic!("expected unknown substance, got {other:?}"),
        }
    }

    #[test]
    fn ppm_reading_for_mass_only_substance_is_a_unit_mismatch() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);

        match scorer.score(
            &EnvironmentalDetails::default(),
            &[reading("lead", 0.01, ConcentrationUnit::Ppm)],
        ) {
            Err(InputError::UnitMismatch { substance, .. }) => assert_eq!(substance, "lead"),
            other => panic!("expected unit mismatch, got {other:?}"),
        }
    }

    #[test]
    fn ambient_conditions_are_banded_independently() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        let details = EnvironmentalDetails {
            noise_db: Some(82.0),
            temperature_c: Some(-12.0),
            lighting_lux: Some(500.0),
            humidity_percent: Some(50.0),
            ..EnvironmentalDetails::default()
        };

        let assessment = scorer.assess(&details, &[]).expect("valid readings");
        let points = |source: &str| {
            assessment
                .components
                .iter()
                .find(|component| component.source == source)
                .map(|component| component.points)
        };

        assert_eq!(points("noise"), Some(4.0));
        assert_eq!(points("temperature"), Some(10.0));
        assert_eq!(points("lighting"), Some(1.0));
        assert_eq!(points("humidity"), Some(1.0));
        assert_eq!(assessment.score.value(), 10);
    }

    #[test]
    fn louder_noise_never_lowers_the_score() {
        let standards = StandardsTable::builtin();
        let scorer = EnvironmentalFactorScorer::new(&standards);
        let mut previous = FactorScore::MIN;

        for decibels in [60.0, 75.0, 79.9, 80.0, 85.0, 90.0, 110.0] {
            let details = EnvironmentalDetails {
                noise_db: Some(decibels),
                ..EnvironmentalDetails::default()
            };
            let score = scorer.score(&details, &[]).expect("valid reading");
            assert!(score >= previous, "{decibels} dB lowered the score");
            previous = score;
        }
    }
}
