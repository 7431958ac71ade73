use chrono::NaiveDate;

use super::{
    AmbientLadders, ConcentrationUnit, ExertionMatrix, IndexBands, MentalWeights, OwasTable,
    PhysicalLadders, PostureTables, RatioBands, RiskBand, RiskLevel, RiskMatrix, RulaTableA,
    RulaTableB, RulaTableC, RulaTables, StandardsDocument, SubstanceThreshold, ThresholdLadder,
    WorkTimeFactors,
};

pub(crate) const VERSION: &str = "2024.1";

pub(crate) fn document() -> StandardsDocument {
    StandardsDocument {
        version: VERSION.to_string(),
        effective_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or(NaiveDate::MIN),
        posture: posture_tables(),
        exertion: exertion_matrix(),
        physical_ladders: physical_ladders(),
        mental_weights: MentalWeights {
            concentration: 3,
            time_pressure: 2,
            responsibility: 3,
            cognitive_load: 1,
            emotional_burden: 1,
        },
        ambient_ladders: ambient_ladders(),
        substances: substances(),
        risk_matrix: risk_matrix(),
        work_time: WorkTimeFactors {
            a: 0.5,
            b: 0.7,
            c: 1.0,
            d: 1.5,
        },
        index_bands: IndexBands {
            a: 7.0,
            b: 4.0,
            c: 2.0,
        },
    }
}

pub(crate) fn posture_tables() -> PostureTables {
    PostureTables {
        rula: RulaTables {
            table_a: RULA_TABLE_A,
            table_b: RULA_TABLE_B,
            table_c: RULA_TABLE_C,
        },
        owas: owas_table(),
        action_level_scores: [1, 4, 7, 10],
    }
}

pub(crate) fn exertion_matrix() -> ExertionMatrix {
    [
        // good posture: <10%, 10-50%, >50% of the shift
        [[1, 1, 2, 4, 7], [1, 2, 4, 7, 10], [2, 4, 7, 10, 10]],
        // poor posture
        [[1, 2, 4, 7, 10], [2, 4, 7, 10, 10], [4, 7, 10, 10, 10]],
        // very poor posture
        [[1, 2, 4, 7, 10], [4, 7, 10, 10, 10], [7, 10, 10, 10, 10]],
    ]
}

pub(crate) fn risk_matrix() -> RiskMatrix {
    let band = |level, min_point, max_point, score, action: &str| RiskBand {
        level,
        min_point,
        max_point,
        score,
        action: action.to_string(),
    };

    RiskMatrix {
        bands: vec![
            band(RiskLevel::Low, 1, 4, 2, "maintain current controls"),
            band(RiskLevel::Medium, 5, 9, 4, "monitor and apply caution"),
            band(RiskLevel::High, 10, 15, 7, "improvement required"),
            band(RiskLevel::Critical, 16, 25, 10, "immediate action required"),
        ],
    }
}

fn physical_ladders() -> PhysicalLadders {
    PhysicalLadders {
        lifting_both_hands_kg: ThresholdLadder::ascending(&[
            (10.0, 2),
            (15.0, 4),
            (25.0, 7),
            (40.0, 10),
        ]),
        lifting_single_hand_kg: ThresholdLadder::ascending(&[
            (5.0, 2),
            (7.0, 4),
            (12.0, 7),
            (20.0, 10),
        ]),
        muscle_force_kg: ThresholdLadder::ascending(&[(15.0, 2), (30.0, 4), (50.0, 7)]),
        protective_gear_percent: ThresholdLadder::ascending(&[(20.0, 2), (50.0, 4), (80.0, 7)]),
        eye_strain_percent: ThresholdLadder::ascending(&[(15.0, 2), (40.0, 4), (70.0, 7)]),
    }
}

fn ambient_ladders() -> AmbientLadders {
    AmbientLadders {
        noise_db: ThresholdLadder::ascending(&[(75.0, 2), (80.0, 4), (85.0, 7), (90.0, 10)]),
        heat_c: ThresholdLadder::ascending(&[(35.0, 2), (36.0, 4), (38.0, 7), (40.0, 10)]),
        cold_c: ThresholdLadder::descending(&[(5.0, 2), (3.0, 4), (0.0, 7), (-10.0, 10)]),
        lighting_lux: ThresholdLadder::descending(&[
            (300.0, 2),
            (150.0, 4),
            (75.0, 7),
            (20.0, 10),
        ]),
        humidity_high_percent: ThresholdLadder::ascending(&[
            (70.0, 2),
            (80.0, 4),
            (90.0, 7),
            (95.0, 10),
        ]),
        humidity_low_percent: ThresholdLadder::descending(&[
            (30.0, 2),
            (25.0, 4),
            (20.0, 7),
            (10.0, 10),
        ]),
        dust_mg_m3: ThresholdLadder::ascending(&[(1.0, 2), (2.0, 4), (5.0, 7), (10.0, 10)]),
        vibration_m_s2: ThresholdLadder::ascending(&[(0.5, 2), (1.5, 4), (3.0, 7), (5.0, 10)]),
    }
}

fn substances() -> Vec<SubstanceThreshold> {
    let ppm = |id: &str, name: &str, cas: &str, limit: f64, weight: f64| SubstanceThreshold {
        id: id.to_string(),
        name: name.to_string(),
        cas_number: Some(cas.to_string()),
        permissible_concentration: limit,
        unit: ConcentrationUnit::Ppm,
        molecular_weight: Some(weight),
        evaluation_thresholds: RatioBands::default(),
    };

    vec![
        ppm("toluene", "Toluene", "108-88-3", 20.0, 92.14),
        ppm("xylene", "Xylene", "1330-20-7", 50.0, 106.17),
        ppm("acetone", "Acetone", "67-64-1", 500.0, 58.08),
        ppm("ethyl-acetate", "Ethyl acetate", "141-78-6", 200.0, 88.11),
        ppm("methanol", "Methanol", "67-56-1", 200.0, 32.04),
        ppm("ammonia", "Ammonia", "7664-41-7", 25.0, 17.03),
        ppm("formaldehyde", "Formaldehyde", "50-00-0", 0.1, 30.03),
        ppm("benzene", "Benzene", "71-43-2", 1.0, 78.11),
        ppm("n-hexane", "n-Hexane", "110-54-3", 40.0, 86.18),
        ppm("dichloromethane", "Dichloromethane", "75-09-2", 50.0, 84.93),
        ppm("isopropyl-alcohol", "Isopropyl alcohol", "67-63-0", 200.0, 60.10),
        ppm("styrene", "Styrene", "100-42-5", 20.0, 104.15),
        SubstanceThreshold {
            id: "lead".to_string(),
            name: "Lead and inorganic compounds".to_string(),
            cas_number: Some("7439-92-1".to_string()),
            permissible_concentration: 0.05,
            unit: ConcentrationUnit::MilligramsPerCubicMetre,
            molecular_weight: None,
            evaluation_thresholds: RatioBands::default(),
        },
    ]
}

const RULA_TABLE_A: RulaTableA = [
    [
        [[1, 2], [2, 2], [2, 3], [3, 3]],
        [[2, 2], [2, 2], [3, 3], [3, 3]],
        [[2, 3], [3, 3], [3, 3], [4, 4]],
    ],
    [
        [[2, 3], [3, 3], [3, 4], [4, 4]],
        [[3, 3], [3, 3], [3, 4], [4, 4]],
        [[3, 4], [4, 4], [4, 4], [5, 5]],
    ],
    [
        [[3, 3], [4, 4], [4, 4], [5, 5]],
        [[3, 4], [4, 4], [4, 4], [5, 5]],
        [[4, 4], [4, 4], [4, 5], [5, 5]],
    ],
    [
        [[4, 4], [4, 4], [4, 5], [5, 5]],
        [[4, 4], [4, 4], [4, 5], [5, 5]],
        [[4, 4], [4, 5], [5, 5], [6, 6]],
    ],
    [
        [[5, 5], [5, 5], [5, 6], [6, 7]],
        [[5, 6], [6, 6], [6, 7], [7, 7]],
        [[6, 6], [6, 7], [7, 7], [7, 8]],
    ],
    [
        [[7, 7], [7, 7], [7, 8], [8, 9]],
        [[8, 8], [8, 8], [8, 9], [9, 9]],
        [[9, 9], [9, 9], [9, 9], [9, 9]],
    ],
];

const RULA_TABLE_B: RulaTableB = [
    [[1, 3], [2, 3], [3, 4], [5, 5], [6, 6], [7, 7]],
    [[2, 3], [2, 3], [4, 5], [5, 5], [6, 7], [7, 7]],
    [[3, 3], [3, 4], [4, 5], [5, 6], [6, 7], [7, 7]],
    [[5, 5], [5, 6], [6, 7], [7, 7], [7, 7], [8, 8]],
    [[7, 7], [7, 7], [7, 8], [8, 8], [8, 8], [8, 8]],
    [[8, 8], [8, 8], [8, 8], [8, 9], [9, 9], [9, 9]],
];

const RULA_TABLE_C: RulaTableC = [
    [1, 2, 3, 3, 4, 5, 5],
    [2, 2, 3, 4, 4, 5, 5],
    [3, 3, 3, 4, 4, 5, 6],
    [3, 3, 3, 4, 5, 6, 6],
    [4, 4, 4, 5, 6, 7, 7],
    [4, 4, 5, 6, 6, 7, 7],
    [5, 5, 6, 6, 7, 7, 7],
    [5, 5, 6, 7, 7, 7, 7],
];

/// OWAS action categories, one row per back/arms pair with the seven leg
/// positions written as load-class triplets.
const OWAS_ROWS: [[&str; 7]; 12] = [
    ["111", "111", "111", "222", "222", "111", "111"],
    ["111", "111", "111", "222", "222", "111", "111"],
    ["111", "111", "111", "223", "223", "111", "112"],
    ["223", "223", "223", "333", "333", "222", "233"],
    ["223", "223", "233", "344", "344", "334", "234"],
    ["334", "223", "333", "344", "444", "444", "234"],
    ["111", "111", "112", "333", "444", "111", "111"],
    ["223", "111", "112", "444", "444", "333", "111"],
    ["223", "111", "233", "444", "444", "444", "111"],
    ["233", "223", "223", "444", "444", "444", "234"],
    ["334", "234", "334", "444", "444", "444", "234"],
    ["444", "234", "334", "444", "444", "444", "234"],
];

fn owas_table() -> OwasTable {
    let mut table: OwasTable = [[[[1; 3]; 7]; 3]; 4];
    for (row, legs) in OWAS_ROWS.iter().enumerate() {
        let (back, arms) = (row / 3, row % 3);
        for (leg, loads) in legs.iter().enumerate() {
            for (load, digit) in loads.bytes().enumerate() {
                table[back][arms][leg][load] = digit - b'0';
            }
        }
    }
    table
}
