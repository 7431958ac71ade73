//! Versioned reference data consumed by every scorer.
//!
//! A [`StandardsTable`] is built once from a [`StandardsDocument`] (the
//! built-in tables or a JSON file), validated, and then only ever read. The
//! process-wide copy lives behind [`install`] and [`global`].

pub(crate) mod builtin;
pub mod export;
mod index;
mod ladder;
mod posture;
mod risk;
mod substances;
mod work_time;

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use export::{export_matrix, ExportError, MatrixKind};
pub use index::{IndexBands, ThreeKIndex};
pub use ladder::{LadderDirection, LadderStep, ThresholdLadder};
pub use posture::{
    ActionLevel, ExertionMatrix, OwasTable, PostureClass, PostureTables, RulaTableA, RulaTableB,
    RulaTableC, RulaTables, RULA_SCORE_C_CAP, RULA_SCORE_D_CAP,
};
pub use risk::{RiskBand, RiskLevel, RiskMatrix, MAX_RISK_POINT};
pub use substances::{ConcentrationUnit, RatioBands, SubstanceThreshold, MOLAR_VOLUME_LITRES};
pub use work_time::{WorkTimeCategory, WorkTimeFactors};

/// Ladders for the optional physical detail readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLadders {
    pub lifting_both_hands_kg: ThresholdLadder,
    pub lifting_single_hand_kg: ThresholdLadder,
    pub muscle_force_kg: ThresholdLadder,
    pub protective_gear_percent: ThresholdLadder,
    pub eye_strain_percent: ThresholdLadder,
}

/// Ladders for ambient environmental readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientLadders {
    pub noise_db: ThresholdLadder,
    pub heat_c: ThresholdLadder,
    pub cold_c: ThresholdLadder,
    pub lighting_lux: ThresholdLadder,
    pub humidity_high_percent: ThresholdLadder,
    pub humidity_low_percent: ThresholdLadder,
    pub dust_mg_m3: ThresholdLadder,
    pub vibration_m_s2: ThresholdLadder,
}

/// Integer weights of the mental sub-scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalWeights {
    pub concentration: u32,
    pub time_pressure: u32,
    pub responsibility: u32,
    pub cognitive_load: u32,
    pub emotional_burden: u32,
}

impl MentalWeights {
    pub fn total(&self) -> u32 {
        self.concentration
            + self.time_pressure
            + self.responsibility
            + self.cognitive_load
            + self.emotional_burden
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let weights = [
            self.concentration,
            self.time_pressure,
            self.responsibility,
            self.cognitive_load,
            self.emotional_burden,
        ];
        if weights.iter().any(|weight| *weight == 0 || *weight > 100) {
            return Err(ConfigurationError::InvalidMentalWeights(format!(
                "weights {weights:?} must lie in 1..=100"
            )));
        }
        Ok(())
    }
}

/// Serialized shape of the reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsDocument {
    pub version: String,
    pub effective_date: NaiveDate,
    pub posture: PostureTables,
    pub exertion: ExertionMatrix,
    pub physical_ladders: PhysicalLadders,
    pub mental_weights: MentalWeights,
    pub ambient_ladders: AmbientLadders,
    pub substances: Vec<SubstanceThreshold>,
    pub risk_matrix: RiskMatrix,
    pub work_time: WorkTimeFactors,
    pub index_bands: IndexBands,
}

/// Validated, immutable reference tables.
#[derive(Debug, Clone)]
pub struct StandardsTable {
    document: StandardsDocument,
    substance_index: HashMap<String, usize>,
}

impl StandardsTable {
    /// Tables shipped with the crate.
    pub fn builtin() -> Self {
        Self::indexed(builtin::document())
    }

    pub fn from_document(document: StandardsDocument) -> Result<Self, ConfigurationError> {
        validate(&document)?;
        Ok(Self::indexed(document))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigurationError> {
        let document: StandardsDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let document: StandardsDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    fn indexed(document: StandardsDocument) -> Self {
        let substance_index = document
            .substances
            .iter()
            .enumerate()
            .map(|(position, substance)| (substance.id.clone(), position))
            .collect();
        Self {
            document,
            substance_index,
        }
    }

    pub fn document(&self) -> &StandardsDocument {
        &self.document
    }

    pub fn version(&self) -> &str {
        &self.document.version
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.document.effective_date
    }

    pub fn posture(&self) -> &PostureTables {
        &self.document.posture
    }

    pub fn exertion(&self) -> &ExertionMatrix {
        &self.document.exertion
    }

    pub fn physical_ladders(&self) -> &PhysicalLadders {
        &self.document.physical_ladders
    }

    pub fn mental_weights(&self) -> &MentalWeights {
        &self.document.mental_weights
    }

    pub fn ambient_ladders(&self) -> &AmbientLadders {
        &self.document.ambient_ladders
    }

    pub fn substances(&self) -> &[SubstanceThreshold] {
        &self.document.substances
    }

    pub fn substance(&self, id: &str) -> Option<&SubstanceThreshold> {
        self.substance_index
            .get(id)
            .map(|&position| &self.document.substances[position])
    }

    pub fn risk_matrix(&self) -> &RiskMatrix {
        &self.document.risk_matrix
    }

    pub fn work_time(&self) -> &WorkTimeFactors {
        &self.document.work_time
    }

    pub fn index_bands(&self) -> &IndexBands {
        &self.document.index_bands
    }
}

fn validate(document: &StandardsDocument) -> Result<(), ConfigurationError> {
    if document.version.trim().is_empty() {
        return Err(ConfigurationError::Malformed(
            "standards version must not be empty".to_string(),
        ));
    }

    document.posture.validate()?;
    posture::validate_exertion(&document.exertion)?;

    let physical = &document.physical_ladders;
    physical.lifting_both_hands_kg.validate("lifting_both_hands_kg")?;
    physical.lifting_single_hand_kg.validate("lifting_single_hand_kg")?;
    physical.muscle_force_kg.validate("muscle_force_kg")?;
    physical.protective_gear_percent.validate("protective_gear_percent")?;
    physical.eye_strain_percent.validate("eye_strain_percent")?;

    document.mental_weights.validate()?;

    let ambient = &document.ambient_ladders;
    ambient.noise_db.validate("noise_db")?;
    ambient.heat_c.validate("heat_c")?;
    ambient.cold_c.validate("cold_c")?;
    ambient.lighting_lux.validate("lighting_lux")?;
    ambient.humidity_high_percent.validate("humidity_high_percent")?;
    ambient.humidity_low_percent.validate("humidity_low_percent")?;
    ambient.dust_mg_m3.validate("dust_mg_m3")?;
    ambient.vibration_m_s2.validate("vibration_m_s2")?;

    let mut seen = HashSet::new();
    for substance in &document.substances {
        substance.validate()?;
        if !seen.insert(substance.id.as_str()) {
            return Err(ConfigurationError::InvalidSubstance {
                id: substance.id.clone(),
                detail: "duplicate substance id".to_string(),
            });
        }
    }

    document.risk_matrix.validate()?;
    document.work_time.validate()?;
    document.index_bands.validate()?;

    Ok(())
}

static STANDARDS: OnceLock<Arc<StandardsTable>> = OnceLock::new();

/// Install the process-wide tables. Fails if tables were already installed.
pub fn install(table: StandardsTable) -> Result<Arc<StandardsTable>, ConfigurationError> {
    let table = Arc::new(table);
    STANDARDS
        .set(table.clone())
        .map_err(|_| ConfigurationError::AlreadyLoaded)?;
    info!(
        version = table.version(),
        effective_date = %table.effective_date(),
        substances = table.substances().len(),
        "standards tables installed"
    );
    Ok(table)
}

/// The process-wide tables, or [`ConfigurationError::NotLoaded`] before
/// [`install`] ran.
pub fn global() -> Result<Arc<StandardsTable>, ConfigurationError> {
    STANDARDS.get().cloned().ok_or(ConfigurationError::NotLoaded)
}

/// Failure to load or validate reference tables. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("standards tables have not been loaded")]
    NotLoaded,
    #[error("standards tables are already installed")]
    AlreadyLoaded,
    #[error("unable to read standards from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed standards document: {0}")]
    Malformed(String),
    #[error("matrix {matrix} is inconsistent: {detail}")]
    InconsistentMatrix { matrix: &'static str, detail: String },
    #[error("threshold ladder {ladder} is invalid: {detail}")]
    InvalidLadder { ladder: String, detail: String },
    #[error("substance {id} is invalid: {detail}")]
    InvalidSubstance { id: String, detail: String },
    #[error("risk matrix is invalid: {0}")]
    InvalidRiskMatrix(String),
    #[error("work-time factors are invalid: {0}")]
    InvalidWorkTime(String),
    #[error("3K index bands are invalid: {0}")]
    InvalidIndexBands(String),
    #[error("mental weights are invalid: {0}")]
    InvalidMentalWeights(String),
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}
