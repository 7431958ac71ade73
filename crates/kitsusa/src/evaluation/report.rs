use serde::Serialize;

use super::EvaluationOutcome;
use crate::scoring::{FactorKind, FactorScore};
use crate::standards::ThreeKIndex;

/// Minimum factor score that earns targeted recommendations.
pub const RECOMMENDATION_THRESHOLD: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl From<ThreeKIndex> for ReportRiskLevel {
    fn from(index: ThreeKIndex) -> Self {
        match index {
            ThreeKIndex::A => ReportRiskLevel::Critical,
            ThreeKIndex::B => ReportRiskLevel::High,
            ThreeKIndex::C => ReportRiskLevel::Medium,
            ThreeKIndex::D => ReportRiskLevel::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRecommendation {
    pub factor: FactorKind,
    pub score: FactorScore,
    pub recommendations: Vec<String>,
}

/// Read-only narrative derived from an evaluation outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub index: ThreeKIndex,
    pub kitsusa_score: f64,
    pub risk_level: ReportRiskLevel,
    pub summary: String,
    pub priority_actions: Vec<String>,
    pub recommendations: Vec<FactorRecommendation>,
}

impl EvaluationReport {
    pub fn from_outcome(outcome: &EvaluationOutcome) -> Self {
        let result = &outcome.result;
        let dominant = result
            .dominant_factors
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ");

        let summary = format!(
            "3K index {} ({}): Kitsusa score {:.1} driven by {} under work-time category {}",
            result.index,
            result.index.meaning(),
            result.kitsusa_score,
            dominant,
            result.work_time
        );

        let priority_actions = match result.index {
            ThreeKIndex::A => vec![
                "Stop or restrict the task until controls for the dominant factor are in place"
                    .to_string(),
                format!("Reduce exposure time below the {} band", result.work_time.duration_label()),
                "Schedule a follow-up evaluation after corrective action".to_string(),
            ],
            ThreeKIndex::B => vec![
                "Plan improvements for the dominant factor within the current review cycle"
                    .to_string(),
                "Monitor affected workers for early signs of strain".to_string(),
            ],
            ThreeKIndex::C | ThreeKIndex::D => Vec::new(),
        };

        let recommendations = FactorKind::ALL
            .into_iter()
            .filter_map(|factor| {
                let score = result.factor_score(factor);
                (score.value() >= RECOMMENDATION_THRESHOLD).then(|| FactorRecommendation {
                    factor,
                    score,
                    recommendations: recommendations_for(factor, score),
                })
            })
            .collect();

        Self {
            index: result.index,
            kitsusa_score: result.kitsusa_score,
            risk_level: result.index.into(),
            summary,
            priority_actions,
            recommendations,
        }
    }
}

fn recommendations_for(factor: FactorKind, score: FactorScore) -> Vec<String> {
    let severe = score.value() >= 7;
    let mut items: Vec<&str> = match factor {
        FactorKind::Physical => vec![
            "Introduce lifting aids or reduce handled weights",
            "Redesign the workstation to avoid bent, twisted or overhead postures",
        ],
        FactorKind::Mental => vec![
            "Rebalance workload and deadlines across the team",
            "Add recovery breaks for tasks demanding sustained concentration",
        ],
        FactorKind::Environmental => vec![
            "Improve local exhaust ventilation or enclose the emission source",
            "Review hearing, respiratory and thermal protective equipment",
        ],
        FactorKind::Hazard => vec![
            "Apply engineering controls to remove or guard the hazard",
            "Refresh safety training and written procedures",
        ],
    };
    if severe {
        items.push("Treat as a priority item in the next safety committee review");
    }
    items.into_iter().map(str::to_string).collect()
}
