//! Plan execution for the `run` and `validate` commands

use crate::commands::{RunArgs, ValidateArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, Reporter, RunSummary};
use chainverify::plan::VerificationPlan;
use chainverify::DomNode;
use std::path::Path;

/// Loads plans and snapshots and reports results.
#[derive(Debug)]
pub struct PlanRunner {
    config: CliConfig,
    reporter: Reporter,
}

impl PlanRunner {
    /// Create a runner for the given configuration
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Run a plan against a snapshot; a failing step is an error
    pub fn run(&self, args: &RunArgs) -> CliResult<RunSummary> {
        let plan = load_plan(&args.plan)?;
        require_file(&args.dom)?;
        let dom = DomNode::load(&args.dom)?;
        tracing::debug!(dom = %args.dom.display(), "loaded snapshot");

        let summary = match plan.run(&dom) {
            Ok(report) => RunSummary::from(&report),
            Err(failure) => {
                tracing::debug!(error = %failure, "plan failed");
                RunSummary::from(&failure)
            }
        };
        self.report(&summary)?;

        match &summary.failure {
            None => Ok(summary),
            Some(step) => Err(CliError::verification_failed(format!(
                "{}: step {} ({}) failed: {}",
                summary.plan, step.step, step.label, step.message
            ))),
        }
    }

    /// Parse a plan and report its step count
    pub fn validate(&self, args: &ValidateArgs) -> CliResult<VerificationPlan> {
        let plan = load_plan(&args.plan)?;
        self.reporter.success(&format!(
            "{}: {} step{}",
            plan.name,
            plan.steps.len(),
            if plan.steps.len() == 1 { "" } else { "s" }
        ));
        Ok(plan)
    }

    fn report(&self, summary: &RunSummary) -> CliResult<()> {
        if self.config.format == OutputFormat::Json {
            self.reporter
                .json(summary)
                .map_err(|e| CliError::invalid_argument(format!("cannot encode report: {e}")))?;
            return Ok(());
        }

        if self.config.verbosity.is_verbose() {
            for label in &summary.passed {
                self.reporter.success(label);
            }
        }
        match &summary.failure {
            None => self.reporter.success(&format!(
                "{}: {} steps passed",
                summary.plan,
                summary.passed.len()
            )),
            Some(step) => self.reporter.failure(&format!(
                "{}: step {} ({}) failed: {}",
                summary.plan, step.step, step.label, step.message
            )),
        }
        Ok(())
    }
}

fn require_file(path: &Path) -> CliResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::invalid_argument(format!(
            "file not found: {}",
            path.display()
        )))
    }
}

fn load_plan(path: &Path) -> CliResult<VerificationPlan> {
    require_file(path)?;
    let plan = VerificationPlan::load(path)?;
    tracing::debug!(plan = %plan.name, path = %path.display(), "loaded plan");
    Ok(plan)
}
