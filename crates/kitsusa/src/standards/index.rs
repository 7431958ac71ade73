use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Final categorical 3K classification, A being the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreeKIndex {
    A,
    B,
    C,
    D,
}

impl ThreeKIndex {
    pub const ALL: [ThreeKIndex; 4] = [ThreeKIndex::A, ThreeKIndex::B, ThreeKIndex::C, ThreeKIndex::D];

    pub fn as_str(self) -> &'static str {
        match self {
            ThreeKIndex::A => "A",
            ThreeKIndex::B => "B",
            ThreeKIndex::C => "C",
            ThreeKIndex::D => "D",
        }
    }

    pub fn meaning(self) -> &'static str {
        match self {
            ThreeKIndex::A => "improvement required",
            ThreeKIndex::B => "improvement recommended",
            ThreeKIndex::C => "caution",
            ThreeKIndex::D => "good",
        }
    }
}

impl fmt::Display for ThreeKIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the A, B and C bands; anything below `c` is D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexBands {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl IndexBands {
    pub fn classify(&self, kitsusa_score: f64) -> ThreeKIndex {
        if kitsusa_score >= self.a {
            ThreeKIndex::A
        } else if kitsusa_score >= self.b {
            ThreeKIndex::B
        } else if kitsusa_score >= self.c {
            ThreeKIndex::C
        } else {
            ThreeKIndex::D
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let cuts = [self.a, self.b, self.c];
        if cuts.iter().any(|cut| !(cut.is_finite() && *cut > 0.0)) {
            return Err(ConfigurationError::InvalidIndexBands(format!(
                "cut points {cuts:?} must be positive"
            )));
        }
        if !(self.a > self.b && self.b > self.c) {
            return Err(ConfigurationError::InvalidIndexBands(format!(
                "cut points {cuts:?} must strictly decrease from A to C"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDS: IndexBands = IndexBands {
        a: 7.0,
        b: 4.0,
        c: 2.0,
    };

    #[test]
    fn classifies_on_inclusive_lower_bounds() {
        assert_eq!(BANDS.classify(9.0), ThreeKIndex::A);
        assert_eq!(BANDS.classify(7.0), ThreeKIndex::A);
        assert_eq!(BANDS.classify(6.99), ThreeKIndex::B);
        assert_eq!(BANDS.classify(4.0), ThreeKIndex::B);
        assert_eq!(BANDS.classify(2.0), ThreeKIndex::C);
        assert_eq!(BANDS.classify(0.5), ThreeKIndex::D);
    }

    #[test]
    fn overlapping_cut_points_are_rejected() {
        let bands = IndexBands {
            a: 4.0,
            b: 4.0,
            c: 2.0,
        };
        assert!(bands.validate().is_err());
        assert!(BANDS.validate().is_ok());
    }
}
