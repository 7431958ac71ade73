//! Posture-assessment lookup tables.
//!
//! Method A follows the RULA worksheet (tables A, B and C); method B follows
//! the OWAS action-category table. All tables are fixed-size arrays so that a
//! document missing an axis value fails to deserialize instead of producing a
//! silently short matrix.

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// RULA table A: `[upper_arm][lower_arm][wrist][wrist_twist]`.
pub type RulaTableA = [[[[u8; 2]; 4]; 3]; 6];
/// RULA table B: `[neck][trunk][legs]`.
pub type RulaTableB = [[[u8; 2]; 6]; 6];
/// RULA table C: `[score_c][score_d]`.
pub type RulaTableC = [[u8; 7]; 8];
/// OWAS action categories: `[back][arms][legs][load]`.
pub type OwasTable = [[[[u8; 3]; 7]; 3]; 4];
/// Exertion matrix: `[posture_class][duration][strength]`.
pub type ExertionMatrix = [[[u8; 5]; 3]; 3];

/// Largest posture score C fed into table C.
pub const RULA_SCORE_C_CAP: u8 = 8;
/// Largest posture score D fed into table C.
pub const RULA_SCORE_D_CAP: u8 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulaTables {
    pub table_a: RulaTableA,
    pub table_b: RulaTableB,
    pub table_c: RulaTableC,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureTables {
    pub rula: RulaTables,
    pub owas: OwasTable,
    /// Factor score for action levels 1 through 4.
    pub action_level_scores: [u8; 4],
}

/// Urgency of corrective action shared by both posture methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLevel {
    Acceptable,
    InvestigateFurther,
    ChangeSoon,
    ChangeImmediately,
}

impl ActionLevel {
    pub fn rank(self) -> u8 {
        match self {
            ActionLevel::Acceptable => 1,
            ActionLevel::InvestigateFurther => 2,
            ActionLevel::ChangeSoon => 3,
            ActionLevel::ChangeImmediately => 4,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(ActionLevel::Acceptable),
            2 => Some(ActionLevel::InvestigateFurther),
            3 => Some(ActionLevel::ChangeSoon),
            4 => Some(ActionLevel::ChangeImmediately),
            _ => None,
        }
    }

    /// Action level for a RULA grand score (1..=7).
    pub fn from_rula_grand_score(grand: u8) -> Self {
        match grand {
            0..=2 => ActionLevel::Acceptable,
            3..=4 => ActionLevel::InvestigateFurther,
            5..=6 => ActionLevel::ChangeSoon,
            _ => ActionLevel::ChangeImmediately,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionLevel::Acceptable => "acceptable",
            ActionLevel::InvestigateFurther => "investigate further",
            ActionLevel::ChangeSoon => "change soon",
            ActionLevel::ChangeImmediately => "change immediately",
        }
    }

    /// Row of the exertion matrix this level falls into.
    pub fn posture_class(self) -> PostureClass {
        match self {
            ActionLevel::Acceptable => PostureClass::Good,
            ActionLevel::InvestigateFurther => PostureClass::Poor,
            ActionLevel::ChangeSoon | ActionLevel::ChangeImmediately => PostureClass::VeryPoor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureClass {
    Good,
    Poor,
    VeryPoor,
}

impl PostureClass {
    pub(crate) fn index(self) -> usize {
        match self {
            PostureClass::Good => 0,
            PostureClass::Poor => 1,
            PostureClass::VeryPoor => 2,
        }
    }
}

impl PostureTables {
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        check_cells("rula.table_a", self.rula.table_a.iter().flatten().flatten().flatten(), 1, 9)?;
        check_cells("rula.table_b", self.rula.table_b.iter().flatten().flatten(), 1, 9)?;
        check_cells("rula.table_c", self.rula.table_c.iter().flatten(), 1, 7)?;
        check_cells("owas", self.owas.iter().flatten().flatten().flatten(), 1, 4)?;
        check_cells("action_level_scores", self.action_level_scores.iter(), 1, 10)?;

        if self.action_level_scores.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ConfigurationError::InconsistentMatrix {
                matrix: "action_level_scores",
                detail: "scores must not decrease as the action level rises".to_string(),
            });
        }

        Ok(())
    }

    pub fn action_level_score(&self, level: ActionLevel) -> u8 {
        self.action_level_scores[usize::from(level.rank() - 1)]
    }
}

pub(crate) fn validate_exertion(matrix: &ExertionMatrix) -> Result<(), ConfigurationError> {
    check_cells("exertion", matrix.iter().flatten().flatten(), 1, 10)?;

    // Worse posture, longer duration or higher strength never lowers the score.
    for class in 0..3 {
        for duration in 0..3 {
            for strength in 0..5 {
                let cell = matrix[class][duration][strength];
                let neighbours = [
                    (class + 1 < 3).then(|| matrix[class + 1][duration][strength]),
                    (duration + 1 < 3).then(|| matrix[class][duration + 1][strength]),
                    (strength + 1 < 5).then(|| matrix[class][duration][strength + 1]),
                ];
                if neighbours.iter().flatten().any(|&next| next < cell) {
                    return Err(ConfigurationError::InconsistentMatrix {
                        matrix: "exertion",
                        detail: format!(
                            "score decreases after cell [{}][{}][{}]",
                            class + 1,
                            duration + 1,
                            strength + 1
                        ),
                    });
                }
            }
        }
    }

    Ok(())
}

fn check_cells<'a>(
    matrix: &'static str,
    cells: impl Iterator<Item = &'a u8>,
    min: u8,
    max: u8,
) -> Result<(), ConfigurationError> {
    for (position, &cell) in cells.enumerate() {
        if !(min..=max).contains(&cell) {
            return Err(ConfigurationError::InconsistentMatrix {
                matrix,
                detail: format!("cell {position} holds {cell}, expected {min}..={max}"),
            });
        }
    }
    Ok(())
}
