//! Output formatting for plan results

use chainverify::plan::{PlanFailure, PlanReport};
use console::{style, Term};
use serde::{Deserialize, Serialize};

/// Output format for plan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Machine-readable result of one plan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Plan name
    pub plan: String,
    /// True when every step passed
    pub success: bool,
    /// Labels of passing steps, in order
    pub passed: Vec<String>,
    /// The failing step, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
}

/// The step a run stopped at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    /// One-based step number
    pub step: usize,
    /// Step label
    pub label: String,
    /// Verification message
    pub message: String,
}

impl From<&PlanReport> for RunSummary {
    fn from(report: &PlanReport) -> Self {
        Self {
            plan: report.plan.clone(),
            success: true,
            passed: report.passed.clone(),
            failure: None,
        }
    }
}

impl From<&PlanFailure> for RunSummary {
    fn from(failure: &PlanFailure) -> Self {
        Self {
            plan: failure.plan.clone(),
            success: false,
            passed: failure.passed.clone(),
            failure: Some(StepFailure {
                step: failure.step + 1,
                label: failure.label.clone(),
                message: failure.error.message().to_string(),
            }),
        }
    }
}

/// Writes result lines to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&format!("{} {message}", self.pass_prefix()));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures print even in quiet mode
        self.line(&format!("{} {message}", self.fail_prefix()));
    }

    /// Print an informational message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(message);
    }

    /// Print a summary as pretty JSON, regardless of quiet mode
    pub fn json(&self, summary: &RunSummary) -> serde_json::Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        self.line(&json);
        Ok(())
    }

    fn pass_prefix(&self) -> String {
        if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        }
    }

    fn fail_prefix(&self) -> String {
        if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
