//! chainverify: run verification plans against DOM snapshots
//!
//! ## Usage
//!
//! ```bash
//! chainverify run --dom grid.json --plan grid.yaml
//! RUST_LOG=chainverify=trace chainverify run --dom grid.json --plan grid.yaml
//! ```

use chainverify_cli::{Cli, CliConfig, CliResult, Commands, PlanRunner, Verbosity};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: CliConfig) -> CliResult<()> {
    match cli.command {
        Commands::Run(args) => {
            let runner = PlanRunner::new(config.with_format(args.format.into()));
            runner.run(&args).map(|_| ())
        }
        Commands::Validate(args) => PlanRunner::new(config).validate(&args).map(|_| ()),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
}

/// Logs go to stderr so stdout stays parseable; `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
