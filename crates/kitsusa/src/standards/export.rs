use std::fmt;
use std::io::Write;

use serde::Serialize;

use super::StandardsTable;

/// Reference matrices that can be written out as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    RulaA,
    RulaB,
    RulaC,
    Owas,
    Exertion,
    RiskBands,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 6] = [
        MatrixKind::RulaA,
        MatrixKind::RulaB,
        MatrixKind::RulaC,
        MatrixKind::Owas,
        MatrixKind::Exertion,
        MatrixKind::RiskBands,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatrixKind::RulaA => "rula-a",
            MatrixKind::RulaB => "rula-b",
            MatrixKind::RulaC => "rula-c",
            MatrixKind::Owas => "owas",
            MatrixKind::Exertion => "exertion",
            MatrixKind::RiskBands => "risk-bands",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct MatrixCell {
    row: String,
    column: String,
    score: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to flush export: {0}")]
    Io(#[from] std::io::Error),
}

/// Write one reference matrix as `row,column,score` CSV rows.
pub fn export_matrix<W: Write>(
    standards: &StandardsTable,
    kind: MatrixKind,
    writer: W,
) -> Result<usize, ExportError> {
    let cells = matrix_cells(standards, kind);
    let mut csv_writer = csv::Writer::from_writer(writer);
    for cell in &cells {
        csv_writer.serialize(cell)?;
    }
    csv_writer.flush()?;
    Ok(cells.len())
}

fn matrix_cells(standards: &StandardsTable, kind: MatrixKind) -> Vec<MatrixCell> {
    let cell = |row: String, column: String, score: u8| MatrixCell { row, column, score };
    let posture = standards.posture();
    let mut cells = Vec::new();

    match kind {
        MatrixKind::RulaA => {
            for (ua, lower_arms) in posture.rula.table_a.iter().enumerate() {
                for (la, wrists) in lower_arms.iter().enumerate() {
                    for (wrist, twists) in wrists.iter().enumerate() {
                        for (twist, &score) in twists.iter().enumerate() {
                            cells.push(cell(
                                format!("upper_arm={}/lower_arm={}", ua + 1, la + 1),
                                format!("wrist={}/twist={}", wrist + 1, twist + 1),
                                score,
                            ));
                        }
                    }
                }
            }
        }
        MatrixKind::RulaB => {
            for (neck, trunks) in posture.rula.table_b.iter().enumerate() {
                for (trunk, legs) in trunks.iter().enumerate() {
                    for (leg, &score) in legs.iter().enumerate() {
                        cells.push(cell(
                            format!("neck={}", neck + 1),
                            format!("trunk={}/legs={}", trunk + 1, leg + 1),
                            score,
                        ));
                    }
                }
            }
        }
        MatrixKind::RulaC => {
            for (score_c, row) in posture.rula.table_c.iter().enumerate() {
                for (score_d, &score) in row.iter().enumerate() {
                    cells.push(cell(
                        format!("score_c={}", score_c + 1),
                        format!("score_d={}", score_d + 1),
                        score,
                    ));
                }
            }
        }
        MatrixKind::Owas => {
            for (back, arms_rows) in posture.owas.iter().enumerate() {
                for (arms, legs_rows) in arms_rows.iter().enumerate() {
                    for (legs, loads) in legs_rows.iter().enumerate() {
                        for (load, &score) in loads.iter().enumerate() {
                            cells.push(cell(
                                format!("back={}/arms={}", back + 1, arms + 1),
                                format!("legs={}/load={}", legs + 1, load + 1),
                                score,
                            ));
                        }
                    }
                }
            }
        }
        MatrixKind::Exertion => {
            let classes = ["good", "poor", "very_poor"];
            let durations = ["<10%", "10-50%", ">50%"];
            for (class, durations_rows) in standards.exertion().iter().enumerate() {
                for (duration, strengths) in durations_rows.iter().enumerate() {
                    for (strength, &score) in strengths.iter().enumerate() {
                        cells.push(cell(
                            format!("posture={}/duration={}", classes[class], durations[duration]),
                            format!("strength={}", strength + 1),
                            score,
                        ));
                    }
                }
            }
        }
        MatrixKind::RiskBands => {
            for band in &standards.risk_matrix().bands {
                cells.push(cell(
                    band.level.to_string(),
                    format!("{}-{}", band.min_point, band.max_point),
                    band.score,
                ));
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rula_c_export_has_header_and_every_cell() {
        let standards = StandardsTable::builtin();
        let mut buffer = Vec::new();
        let rows = export_matrix(&standards, MatrixKind::RulaC, &mut buffer).expect("export succeeds");

        assert_eq!(rows, 56);
        let text = String::from_utf8(buffer).expect("utf-8 csv");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("row,column,score"));
        assert_eq!(lines.next(), Some("score_c=1,score_d=1,1"));
        assert_eq!(text.lines().count(), 57);
    }

    #[test]
    fn owas_export_covers_the_full_table() {
        let standards = StandardsTable::builtin();
        let mut buffer = Vec::new();
        let rows = export_matrix(&standards, MatrixKind::Owas, &mut buffer).expect("export succeeds");
        assert_eq!(rows, 4 * 3 * 7 * 3);
    }

    #[test]
    fn parses_matrix_names_leniently() {
        assert_eq!(MatrixKind::parse("RULA_A"), Some(MatrixKind::RulaA));
        assert_eq!(MatrixKind::parse("risk-bands"), Some(MatrixKind::RiskBands));
        assert_eq!(MatrixKind::parse("niosh"), None);
    }
}
