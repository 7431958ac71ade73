use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::scoring::EvaluationResult;
use crate::standards::ThreeKIndex;

/// Kitsusa scores are summed in thousandths so the parallel reduction does
/// not depend on the order partial sums are combined in.
const FIXED_POINT: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FactorMeans {
    pub physical: f64,
    pub mental: f64,
    pub environmental: f64,
    pub hazard: f64,
}

/// Aggregate view over many evaluation results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationStatistics {
    pub count: usize,
    pub index_distribution: BTreeMap<ThreeKIndex, usize>,
    pub mean_kitsusa_score: f64,
    pub max_kitsusa_score: f64,
    pub factor_means: FactorMeans,
}

#[derive(Debug, Clone, Copy, Default)]
struct Partial {
    count: u64,
    per_index: [u64; 4],
    kitsusa_milli: u64,
    max_kitsusa_milli: u64,
    factor_sums: [u64; 4],
}

impl Partial {
    fn from_result(result: &EvaluationResult) -> Self {
        let mut per_index = [0; 4];
        per_index[index_slot(result.index)] = 1;
        let milli = (result.kitsusa_score * FIXED_POINT).round() as u64;
        Self {
            count: 1,
            per_index,
            kitsusa_milli: milli,
            max_kitsusa_milli: milli,
            factor_sums: [
                u64::from(result.physical.value()),
                u64::from(result.mental.value()),
                u64::from(result.environmental.value()),
                u64::from(result.hazard.value()),
            ],
        }
    }

    fn merge(self, other: Self) -> Self {
        let mut per_index = self.per_index;
        let mut factor_sums = self.factor_sums;
        for slot in 0..4 {
            per_index[slot] += other.per_index[slot];
            factor_sums[slot] += other.factor_sums[slot];
        }
        Self {
            count: self.count + other.count,
            per_index,
            kitsusa_milli: self.kitsusa_milli + other.kitsusa_milli,
            max_kitsusa_milli: self.max_kitsusa_milli.max(other.max_kitsusa_milli),
            factor_sums,
        }
    }
}

fn index_slot(index: ThreeKIndex) -> usize {
    match index {
        ThreeKIndex::A => 0,
        ThreeKIndex::B => 1,
        ThreeKIndex::C => 2,
        ThreeKIndex::D => 3,
    }
}

impl EvaluationStatistics {
    pub fn collect(results: &[EvaluationResult]) -> Self {
        let totals = results
            .par_iter()
            .map(Partial::from_result)
            .reduce(Partial::default, Partial::merge);

        if totals.count == 0 {
            return Self::default();
        }

        let count = totals.count as f64;
        let mean = |sum: u64| sum as f64 / count;

        Self {
            count: totals.count as usize,
            index_distribution: ThreeKIndex::ALL
                .into_iter()
                .map(|index| (index, totals.per_index[index_slot(index)] as usize))
                .collect(),
            mean_kitsusa_score: totals.kitsusa_milli as f64 / FIXED_POINT / count,
            max_kitsusa_score: totals.max_kitsusa_milli as f64 / FIXED_POINT,
            factor_means: FactorMeans {
                physical: mean(totals.factor_sums[0]),
                mental: mean(totals.factor_sums[1]),
                environmental: mean(totals.factor_sums[2]),
                hazard: mean(totals.factor_sums[3]),
            },
        }
    }
}
