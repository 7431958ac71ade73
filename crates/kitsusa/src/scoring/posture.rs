use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FactorScore, InputError};
use crate::standards::{
    ActionLevel, PostureTables, RulaTables, RULA_SCORE_C_CAP, RULA_SCORE_D_CAP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureMethodKind {
    Rula,
    Owas,
}

impl fmt::Display for PostureMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostureMethodKind::Rula => f.write_str("RULA"),
            PostureMethodKind::Owas => f.write_str("OWAS"),
        }
    }
}

/// Body-segment categories of a RULA worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulaPosture {
    pub upper_arm: u8,
    pub lower_arm: u8,
    pub wrist: u8,
    pub wrist_twist: u8,
    pub neck: u8,
    pub trunk: u8,
    pub legs: u8,
    #[serde(default)]
    pub muscle_use: bool,
    /// Force/load class 0..=3.
    #[serde(default)]
    pub load: u8,
}

/// OWAS posture code plus load class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwasPosture {
    pub back: u8,
    pub arms: u8,
    pub legs: u8,
    pub load: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PostureMethod {
    Rula(RulaPosture),
    Owas(OwasPosture),
}

impl PostureMethod {
    pub fn kind(&self) -> PostureMethodKind {
        match self {
            PostureMethod::Rula(_) => PostureMethodKind::Rula,
            PostureMethod::Owas(_) => PostureMethodKind::Owas,
        }
    }
}

/// One observed working posture, scored with the method it is tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub method: PostureMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureAssessment {
    pub method: PostureMethodKind,
    /// RULA grand score (1..=7) or OWAS action category (1..=4).
    pub raw_score: u8,
    pub action_level: ActionLevel,
    pub score: FactorScore,
}

impl PostureObservation {
    pub fn rula(posture: RulaPosture) -> Self {
        Self {
            label: None,
            method: PostureMethod::Rula(posture),
        }
    }

    pub fn owas(posture: OwasPosture) -> Self {
        Self {
            label: None,
            method: PostureMethod::Owas(posture),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn assess(&self, tables: &PostureTables) -> Result<PostureAssessment, InputError> {
        let (raw_score, action_level) = match &self.method {
            PostureMethod::Rula(posture) => {
                let grand = rula_grand_score(posture, &tables.rula)?;
                (grand, ActionLevel::from_rula_grand_score(grand))
            }
            PostureMethod::Owas(posture) => {
                let category = owas_category(posture, tables)?;
                let level = ActionLevel::from_rank(category.clamp(1, 4))
                    .unwrap_or(ActionLevel::ChangeImmediately);
                (category, level)
            }
        };

        Ok(PostureAssessment {
            method: self.method.kind(),
            raw_score,
            action_level,
            score: FactorScore::saturating(tables.action_level_score(action_level)),
        })
    }
}

fn category(
    method: PostureMethodKind,
    axis: &'static str,
    value: u8,
    min: u8,
    max: u8,
) -> Result<u8, InputError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::UnknownPostureCategory {
            method,
            axis,
            value,
        })
    }
}

fn index(category: u8) -> usize {
    usize::from(category - 1)
}

fn rula_grand_score(posture: &RulaPosture, tables: &RulaTables) -> Result<u8, InputError> {
    let axis = |name, value, max| category(PostureMethodKind::Rula, name, value, 1, max);

    let upper_arm = axis("upper_arm", posture.upper_arm, 6)?;
    let lower_arm = axis("lower_arm", posture.lower_arm, 3)?;
    let wrist = axis("wrist", posture.wrist, 4)?;
    let wrist_twist = axis("wrist_twist", posture.wrist_twist, 2)?;
    let neck = axis("neck", posture.neck, 6)?;
    let trunk = axis("trunk", posture.trunk, 6)?;
    let legs = axis("legs", posture.legs, 2)?;
    let load = category(PostureMethodKind::Rula, "load", posture.load, 0, 3)?;
    let muscle = u8::from(posture.muscle_use);

    let score_a = tables.table_a[index(upper_arm)][index(lower_arm)][index(wrist)]
        [index(wrist_twist)];
    let score_b = tables.table_b[index(neck)][index(trunk)][index(legs)];

    let score_c = (score_a + muscle + load).min(RULA_SCORE_C_CAP);
    let score_d = (score_b + muscle + load).min(RULA_SCORE_D_CAP);

    Ok(tables.table_c[index(score_c)][index(score_d)])
}

fn owas_category(posture: &OwasPosture, tables: &PostureTables) -> Result<u8, InputError> {
    let axis = |name, value, max| category(PostureMethodKind::Owas, name, value, 1, max);

    let back = axis("back", posture.back, 4)?;
    let arms = axis("arms", posture.arms, 3)?;
    let legs = axis("legs", posture.legs, 7)?;
    let load = axis("load", posture.load, 3)?;

    Ok(tables.owas[index(back)][index(arms)][index(legs)][index(load)])
}
