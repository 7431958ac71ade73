use crate::infra::parse_matrix_kind;
use clap::Args;
use kitsusa::config::{load_standards, AppConfig, StandardsConfig};
use kitsusa::error::AppError;
use kitsusa::standards::{export_matrix, MatrixKind, StandardsTable, WorkTimeCategory};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    /// Standards document to inspect (defaults to KITSUSA_STANDARDS_PATH or the built-in tables)
    #[arg(long)]
    pub(crate) standards: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Standards document to validate
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Matrix to export (rula-a, rula-b, rula-c, owas, exertion, risk-bands)
    #[arg(value_parser = parse_matrix_kind)]
    pub(crate) matrix: MatrixKind,
    /// Write the CSV to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Standards document to export from
    #[arg(long)]
    pub(crate) standards: Option<PathBuf>,
}

/// Resolve tables for one-shot commands: explicit path, then configuration.
pub(crate) fn cli_standards(path: Option<PathBuf>) -> Result<StandardsTable, AppError> {
    let mut config = AppConfig::load()?.standards;
    if path.is_some() {
        config.path = path;
    }
    Ok(load_standards(&config)?)
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let table = cli_standards(args.standards)?;
    render_summary(&table);
    Ok(())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let config = StandardsConfig {
        path: Some(args.path.clone()),
    };
    let table = load_standards(&config)?;
    println!(
        "{}: valid (version {}, effective {}, {} substances)",
        args.path.display(),
        table.version(),
        table.effective_date(),
        table.substances().len()
    );
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let table = cli_standards(args.standards)?;

    let rows = match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            let rows = export_matrix(&table, args.matrix, BufWriter::new(file))?;
            eprintln!("wrote {rows} {} cells to {}", args.matrix, path.display());
            rows
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let rows = export_matrix(&table, args.matrix, &mut handle)?;
            handle.flush()?;
            rows
        }
    };

    if rows == 0 {
        eprintln!("matrix {} is empty", args.matrix);
    }
    Ok(())
}

fn render_summary(table: &StandardsTable) {
    println!(
        "Standards version {} (effective {})",
        table.version(),
        table.effective_date()
    );

    println!("Work-time factors:");
    for category in WorkTimeCategory::ALL {
        println!(
            "  - {} ({}): x{:.1}",
            category,
            category.duration_label(),
            table.work_time().factor(category)
        );
    }

    let bands = table.index_bands();
    println!(
        "3K index bands: A >= {:.1} | B >= {:.1} | C >= {:.1} | D below",
        bands.a, bands.b, bands.c
    );

    println!("Risk matrix:");
    for band in &table.risk_matrix().bands {
        println!(
            "  - {} points {}..={} -> score {} ({})",
            band.level, band.min_point, band.max_point, band.score, band.action
        );
    }

    println!("Registered substances:");
    for substance in table.substances() {
        let cas = substance.cas_number.as_deref().unwrap_or("n/a");
        println!(
            "  - {} [{}] CAS {}: {} {}",
            substance.name,
            substance.id,
            cas,
            substance.permissible_concentration,
            substance.unit
        );
    }
}
