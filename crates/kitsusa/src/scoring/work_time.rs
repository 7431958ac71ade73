use super::InputError;
use crate::standards::{StandardsTable, WorkTimeCategory};

/// Maps a work-duration category onto its multiplicative factor.
pub struct WorkTimeAdjuster<'a> {
    standards: &'a StandardsTable,
}

impl<'a> WorkTimeAdjuster<'a> {
    pub fn new(standards: &'a StandardsTable) -> Self {
        Self { standards }
    }

    pub fn factor(&self, category: WorkTimeCategory) -> f64 {
        self.standards.work_time().factor(category)
    }

    pub fn factor_for(&self, category: &str) -> Result<f64, InputError> {
        let category: WorkTimeCategory = category.parse()?;
        Ok(self.factor(category))
    }

    pub fn category_for_hours(&self, hours: f64) -> Result<WorkTimeCategory, InputError> {
        WorkTimeCategory::from_hours(hours)
    }
}
