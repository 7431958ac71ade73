use crate::tables::cli_standards;
use chrono::Utc;
use clap::Args;
use kitsusa::error::AppError;
use kitsusa::evaluation::{
    EnvironmentalInput, EvaluationEngine, EvaluationOutcome, EvaluationReport, EvaluationRequest,
    PhysicalInput,
};
use kitsusa::scoring::{
    CompositeAggregator, EnvironmentalDetails, ExertionDuration, FactorScore, HazardObservation,
    MentalDetails, OwasPosture, PhysicalDetails, PhysicalExertion, PostureObservation,
    RulaPosture, SubstanceReading,
};
use kitsusa::standards::{ConcentrationUnit, StandardsTable, WorkTimeCategory};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding the evaluation request
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the outcome as JSON instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Append the recommendation report
    #[arg(long)]
    pub(crate) report: bool,
    /// Standards document to score against
    #[arg(long)]
    pub(crate) standards: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Work-time category (a-d) for the walkthrough evaluation. Defaults to c.
    #[arg(long)]
    pub(crate) work_time: Option<String>,
    /// Standards document to score against
    #[arg(long)]
    pub(crate) standards: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        json,
        report,
        standards,
    } = args;

    let engine = EvaluationEngine::new(Arc::new(cli_standards(standards)?));
    let request: EvaluationRequest = serde_json::from_reader(BufReader::new(File::open(&input)?))?;
    let outcome = engine.evaluate(&request)?;

    if json {
        let payload = if report {
            serde_json::json!({
                "outcome": outcome,
                "report": EvaluationReport::from_outcome(&outcome),
            })
        } else {
            serde_json::to_value(&outcome)?
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "Evaluation of {} at {}",
        request.subject.as_deref().unwrap_or("unnamed job"),
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    );
    render_outcome(&outcome);
    if report {
        render_report(&EvaluationReport::from_outcome(&outcome));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let table = cli_standards(args.standards)?;
    let work_time = args.work_time.unwrap_or_else(|| "c".to_string());

    println!("Kitsusa composite scoring demo");
    println!("Standards version {}\n", table.version());

    render_aggregation_scenarios(&table)?;

    let engine = EvaluationEngine::new(Arc::new(table));
    let request = demo_request(&work_time);
    println!(
        "\nFull evaluation: {}",
        request.subject.as_deref().unwrap_or("unnamed job")
    );
    let outcome = engine.evaluate(&request)?;
    render_outcome(&outcome);
    render_report(&EvaluationReport::from_outcome(&outcome));

    let mut unknown = request;
    unknown.environmental.substances.push(SubstanceReading {
        substance_id: "unknown-xyz".to_string(),
        concentration: 1.0,
        unit: ConcentrationUnit::Ppm,
    });
    println!("\nUnregistered substance reading");
    match engine.evaluate(&unknown) {
        Ok(_) => println!("  unexpectedly scored"),
        Err(err) => println!("  rejected: {err}"),
    }

    Ok(())
}

fn render_aggregation_scenarios(table: &StandardsTable) -> Result<(), AppError> {
    let aggregator = CompositeAggregator::new(table);
    let scores = [5, 6, 4, 3]
        .map(FactorScore::new)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    println!("Dominant factor aggregation (physical 5, mental 6, environmental 4, hazard 3)");
    for category in [WorkTimeCategory::C, WorkTimeCategory::D] {
        let result = aggregator.aggregate(scores[0], scores[1], scores[2], scores[3], category);
        println!(
            "  - work time {} ({}): max {} x {:.1} = {:.1} -> 3K index {} ({})",
            category,
            category.duration_label(),
            result.max_factor_score(),
            result.work_time_factor,
            result.kitsusa_score,
            result.index,
            result.index.meaning()
        );
    }
    Ok(())
}

fn render_outcome(outcome: &EvaluationOutcome) {
    let result = &outcome.result;
    println!(
        "  3K index {} ({}) | Kitsusa score {:.1} | work time {} x{:.1}",
        result.index,
        result.index.meaning(),
        result.kitsusa_score,
        result.work_time,
        result.work_time_factor
    );
    let dominant = result
        .dominant_factors
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ");
    println!("  Dominant factor(s): {dominant}");

    for assessment in &outcome.breakdown {
        println!("  {}: {}", assessment.factor.label(), assessment.score);
        for component in &assessment.components {
            println!(
                "    - {}: {:.1} ({})",
                component.source, component.points, component.notes
            );
        }
    }
}

fn render_report(report: &EvaluationReport) {
    println!("  Summary: {}", report.summary);
    if !report.priority_actions.is_empty() {
        println!("  Priority actions:");
        for action in &report.priority_actions {
            println!("    - {action}");
        }
    }
    for entry in &report.recommendations {
        println!("  {} ({}):", entry.factor.label(), entry.score);
        for recommendation in &entry.recommendations {
            println!("    - {recommendation}");
        }
    }
}

fn demo_request(work_time: &str) -> EvaluationRequest {
    EvaluationRequest {
        subject: Some("paint shop sanding booth".to_string()),
        physical: PhysicalInput {
            details: PhysicalDetails {
                lifting_both_hands_kg: Some(12.0),
                protective_gear_percent: Some(60.0),
                exertion: Some(PhysicalExertion {
                    strength: 2,
                    duration: ExertionDuration::Moderate,
                }),
                ..PhysicalDetails::default()
            },
            postures: vec![
                PostureObservation::rula(RulaPosture {
                    upper_arm: 4,
                    lower_arm: 2,
                    wrist: 3,
                    wrist_twist: 1,
                    neck: 3,
                    trunk: 3,
                    legs: 1,
                    muscle_use: true,
                    load: 1,
                })
                .with_label("overhead sanding"),
                PostureObservation::owas(OwasPosture {
                    back: 2,
                    arms: 1,
                    legs: 2,
                    load: 1,
                })
                .with_label("bending to pick parts"),
            ],
        },
        mental: MentalDetails {
            concentration: Some(4),
            time_pressure: Some(3),
            responsibility: Some(2),
            cognitive_load: None,
            emotional_burden: Some(2),
        },
        environmental: EnvironmentalInput {
            details: EnvironmentalDetails {
                noise_db: Some(84.0),
                temperature_c: Some(29.0),
                dust_mg_m3: Some(3.2),
                ..EnvironmentalDetails::default()
            },
            substances: vec![
                SubstanceReading {
                    substance_id: "xylene".to_string(),
                    concentration: 35.0,
                    unit: ConcentrationUnit::Ppm,
                },
                SubstanceReading {
                    substance_id: "toluene".to_string(),
                    concentration: 60.0,
                    unit: ConcentrationUnit::MilligramsPerCubicMetre,
                },
            ],
        },
        hazards: vec![
            HazardObservation::new("solvent vapour ignition", 2, 5),
            HazardObservation::new("slip on overspray", 3, 2),
        ],
        work_time: work_time.to_string(),
    }
}
