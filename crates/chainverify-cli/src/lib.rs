//! chainverify CLI library
//!
//! Runs declarative verification plans against JSON DOM snapshots.
//!
//! ## Usage
//!
//! ```bash
//! chainverify run --dom grid.json --plan grid.yaml     # PASS/FAIL lines
//! chainverify -v run --dom grid.json --plan grid.yaml  # one line per step
//! chainverify run --dom grid.json --plan grid.yaml --format json
//! chainverify validate --plan grid.yaml                # parse only
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, RunArgs, ValidateArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Reporter, RunSummary, StepFailure};
pub use runner::PlanRunner;
