use serde::{Deserialize, Serialize};

use super::posture::PostureObservation;
use super::{
    level, measurement, percentage, FactorAssessment, FactorKind, FactorScore, InputError,
    ScoreComponent,
};
use crate::standards::{ActionLevel, PostureClass, StandardsTable, ThresholdLadder};

/// Share of the shift spent exerting force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExertionDuration {
    /// Under 10% of the shift.
    Short,
    /// 10% to 50% of the shift.
    Moderate,
    /// Over 50% of the shift.
    Long,
}

impl ExertionDuration {
    fn index(self) -> usize {
        match self {
            ExertionDuration::Short => 0,
            ExertionDuration::Moderate => 1,
            ExertionDuration::Long => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExertionDuration::Short => "<10%",
            ExertionDuration::Moderate => "10-50%",
            ExertionDuration::Long => ">50%",
        }
    }
}

/// Subjective exertion: strength 1..=5 sustained for a share of the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalExertion {
    pub strength: u8,
    pub duration: ExertionDuration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifting_both_hands_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifting_single_hand_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_force_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protective_gear_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_strain_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exertion: Option<PhysicalExertion>,
}

/// Scores physical load from postures, handling details and exertion.
pub struct PhysicalFactorScorer<'a> {
    standards: &'a StandardsTable,
}

impl<'a> PhysicalFactorScorer<'a> {
    pub fn new(standards: &'a StandardsTable) -> Self {
        Self { standards }
    }

    pub fn score(
        &self,
        details: &PhysicalDetails,
        postures: &[PostureObservation],
    ) -> Result<FactorScore, InputError> {
        self.assess(details, postures).map(|assessment| assessment.score)
    }

    pub fn assess(
        &self,
        details: &PhysicalDetails,
        postures: &[PostureObservation],
    ) -> Result<FactorAssessment, InputError> {
        let tables = self.standards.posture();
        let mut components = Vec::new();
        let mut worst_level: Option<ActionLevel> = None;

        for (position, observation) in postures.iter().enumerate() {
            let assessment = observation.assess(tables)?;
            worst_level = worst_level.max(Some(assessment.action_level));
            let source = observation
                .label
                .clone()
                .unwrap_or_else(|| format!("posture #{}", position + 1));
            components.push(ScoreComponent {
                source,
                points: f64::from(assessment.score.value()),
                notes: format!(
                    "{} score {} -> action level {} ({})",
                    assessment.method,
                    assessment.raw_score,
                    assessment.action_level.rank(),
                    assessment.action_level.label()
                ),
            });
        }

        let ladders = self.standards.physical_ladders();
        type Check = fn(&str, f64) -> Result<f64, InputError>;
        let readings: [(&str, Option<f64>, &ThresholdLadder, &str, Check); 5] = [
            ("lifting_both_hands", details.lifting_both_hands_kg, &ladders.lifting_both_hands_kg, "kg", measurement),
            ("lifting_single_hand", details.lifting_single_hand_kg, &ladders.lifting_single_hand_kg, "kg", measurement),
            ("muscle_force", details.muscle_force_kg, &ladders.muscle_force_kg, "kg", measurement),
            ("protective_gear", details.protective_gear_percent, &ladders.protective_gear_percent, "% of shift", percentage),
            ("eye_strain", details.eye_strain_percent, &ladders.eye_strain_percent, "% of shift", percentage),
        ];

        for (name, reading, ladder, unit, check) in readings {
            let Some(value) = reading else { continue };
            let value = check(name, value)?;
            let band = ladder.band(value);
            components.push(ScoreComponent {
                source: name.to_string(),
                points: f64::from(band),
                notes: format!("{value} {unit}"),
            });
        }

        if let Some(exertion) = details.exertion {
            let strength = level("exertion.strength", exertion.strength, 1, 5)?;
            let class = worst_level
                .map(ActionLevel::posture_class)
                .unwrap_or(PostureClass::Good);
            let band = self.standards.exertion()[class.index()][exertion.duration.index()]
                [usize::from(strength - 1)];
            components.push(ScoreComponent {
                source: "exertion".to_string(),
                points: f64::from(band),
                notes: format!(
                    "strength {strength} for {} of shift in {:?} posture",
                    exertion.duration.label(),
                    class
                ),
            });
        }

        Ok(FactorAssessment::worst_of(FactorKind::Physical, components))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{OwasPosture, RulaPosture};

    fn owas(back: u8, arms: u8, legs: u8, load: u8) -> PostureObservation {
        PostureObservation::owas(OwasPosture {
            back,
            arms,
            legs,
            load,
        })
    }

    #[test]
    fn empty_input_scores_the_floor() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);

        let score = scorer
            .score(&PhysicalDetails::default(), &[])
            .expect("empty input is valid");
        assert_eq!(score, FactorScore::MIN);
    }

    #[test]
    fn worst_posture_dominates() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);
        let postures = vec![owas(1, 1, 1, 1), owas(2, 1, 4, 1).with_label("squatting"), owas(1, 1, 2, 1)];

        let assessment = scorer
            .assess(&PhysicalDetails::default(), &postures)
            .expect("valid postures");

        assert_eq!(assessment.score.value(), 7);
        assert_eq!(assessment.components.len(), 3);
        assert_eq!(assessment.components[1].source, "squatting");
    }

    #[test]
    fn heavy_lifting_outranks_mild_postures() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);
        let details = PhysicalDetails {
            lifting_both_hands_kg: Some(30.0),
            ..PhysicalDetails::default()
        };

        let score = scorer
            .score(&details, &[owas(1, 1, 1, 1)])
            .expect("valid input");
        assert_eq!(score.value(), 7);
    }

    #[test]
    fn exertion_uses_the_worst_posture_class() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);
        let details = PhysicalDetails {
            exertion: Some(PhysicalExertion {
                strength: 2,
                duration: ExertionDuration::Moderate,
            }),
            ..PhysicalDetails::default()
        };

        let good = scorer.score(&details, &[]).expect("valid input");
        let very_poor = scorer
            .score(&details, &[owas(2, 3, 1, 1)])
            .expect("valid input");

        assert_eq!(good.value(), 2);
        assert_eq!(very_poor.value(), 7);
    }

    #[test]
    fn adding_a_worse_posture_never_lowers_the_score() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);
        let mut postures = vec![owas(2, 1, 1, 1)];
        let before = scorer
            .score(&PhysicalDetails::default(), &postures)
            .expect("valid input");

        postures.push(PostureObservation::rula(RulaPosture {
            upper_arm: 4,
            lower_arm: 2,
            wrist: 3,
            wrist_twist: 1,
            neck: 3,
            trunk: 4,
            legs: 2,
            muscle_use: true,
            load: 1,
        }));
        let after = scorer
            .score(&PhysicalDetails::default(), &postures)
            .expect("valid input");

        assert!(after >= before);
    }

    #[test]
    fn negative_reading_is_an_invalid_measurement() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);
        let details = PhysicalDetails {
            muscle_force_kg: Some(-3.0),
            ..PhysicalDetails::default()
        };

        match scorer.score(&details, &[]) {
            Err(InputError::InvalidMeasurement { field, .. }) => assert_eq!(field, "muscle_force"),
            other => panic!("expected invalid measurement, got {other:?}"),
        }
    }

    #[test]
    fn shift_shares_above_one_hundred_percent_are_rejected() {
        let standards = StandardsTable::builtin();
        let scorer = PhysicalFactorScorer::new(&standards);

        let details = PhysicalDetails {
            protective_gear_percent: Some(400.0),
            ..PhysicalDetails::default()
        };
        match scorer.score(&details, &[]) {
            Err(InputError::InvalidMeasurement { field, value }) => {
                assert_eq!(field, "protective_gear");
                assert_eq!(value, 400.0);
            }
            other => panic!("expected invalid measurement, got {other:?}"),
        }

        let full_shift = PhysicalDetails {
            eye_strain_percent: Some(100.0),
            ..PhysicalDetails::default()
        };
        assert_eq!(
            scorer.score(&full_shift, &[]).expect("whole shift is valid").value(),
            7
        );
    }
}
