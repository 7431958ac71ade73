use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use crate::tables::{run_export, run_show, run_validate, ExportArgs, ShowArgs, ValidateArgs};
use clap::{Args, Parser, Subcommand};
use kitsusa::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kitsusa",
    about = "Score workplace 3K risk and serve the scoring engine over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single evaluation request read from a JSON file
    Evaluate(EvaluateArgs),
    /// Inspect, validate or export the reference tables
    Standards {
        #[command(subcommand)]
        command: StandardsCommand,
    },
    /// Walk through the composite scoring scenarios
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum StandardsCommand {
    /// Print a summary of the active tables
    Show(ShowArgs),
    /// Load a standards document and report whether it is consistent
    Validate(ValidateArgs),
    /// Write one lookup matrix as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load reference tables from this JSON document instead of the configured source
    #[arg(long)]
    pub(crate) standards: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Standards { command } => match command {
            StandardsCommand::Show(args) => run_show(args),
            StandardsCommand::Validate(args) => run_validate(args),
            StandardsCommand::Export(args) => run_export(args),
        },
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitsusa::standards::MatrixKind;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["kitsusa"]).expect("parses without arguments");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_export_arguments() {
        let cli = Cli::try_parse_from(["kitsusa", "standards", "export", "owas", "--output", "owas.csv"])
            .expect("export parses");
        match cli.command {
            Some(Command::Standards {
                command: StandardsCommand::Export(args),
            }) => {
                assert_eq!(args.matrix, MatrixKind::Owas);
                assert_eq!(args.output, Some(PathBuf::from("owas.csv")));
            }
            other => panic!("expected export command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_matrices() {
        let result = Cli::try_parse_from(["kitsusa", "standards", "export", "reba"]);
        assert!(result.is_err());
    }

    #[test]
    fn evaluate_requires_an_input() {
        assert!(Cli::try_parse_from(["kitsusa", "evaluate"]).is_err());
        let cli = Cli::try_parse_from(["kitsusa", "evaluate", "--input", "job.json", "--json"])
            .expect("evaluate parses");
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.input, PathBuf::from("job.json"));
                assert!(args.json);
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }
}
