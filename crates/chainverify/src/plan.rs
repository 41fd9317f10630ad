//! Verification plans.
//!
//! A plan is an ordered list of declarative checks, loaded from YAML or JSON
//! and run through the [`Verify`] chain against a [`DomNode`] snapshot.
//!
//! ```yaml
//! name: orders grid
//! steps:
//!   - check: { present: { selector: "div.k-grid", kind: Grid } }
//!   - within: "tr.k-state-selected"
//!     check: { text_contains: { text: Chang } }
//!   - within: "tr.k-state-selected"
//!     check: { has_classes: { classes: [k-master-row] } }
//! ```
//!
//! Execution stops at the first failing step.

use crate::dom::DomNode;
use crate::locator::Locator;
use crate::result::{ChainError, ChainResult, VerificationError};
use crate::verify::Verify;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Root plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationPlan {
    /// Plan name
    pub name: String,
    /// Plan description
    #[serde(default)]
    pub description: String,
    /// Steps, run in order
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// A single check, optionally scoped to the first element matching `within`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CSS selector of the element the check runs against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within: Option<String>,
    /// What to verify, written as a single-key map (`{ present: {...} }`)
    #[serde(with = "serde_yaml_ng::with::singleton_map")]
    pub check: Check,
}

/// Checks a plan step can perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Selected state equals `expected`
    Selected {
        /// Expected state
        expected: bool,
    },
    /// Text equals exactly
    TextEquals {
        /// Expected text
        text: String,
    },
    /// Text differs
    TextNotEquals {
        /// Forbidden text
        text: String,
    },
    /// Text contains
    TextContains {
        /// Expected substring
        text: String,
    },
    /// At least one descendant matches
    Present {
        /// CSS selector
        selector: String,
        /// Element kind for messages
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
    /// No descendant matches
    Absent {
        /// CSS selector
        selector: String,
        /// Element kind for messages
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
    /// Element carries every listed class
    HasClasses {
        /// Expected classes
        classes: Vec<String>,
    },
}

impl Check {
    fn apply<'a>(&self, target: &'a DomNode) -> Result<&'a DomNode, VerificationError> {
        match self {
            Self::Selected { expected } => target.verify_selected(*expected),
            Self::TextEquals { text } => target.verify_text(text),
            Self::TextNotEquals { text } => target.verify_text_not(text),
            Self::TextContains { text } => target.verify_text_contains(text),
            Self::Present { selector, kind } => target.verify_present_named(
                &Locator::new(selector.as_str()),
                kind_or_default(kind.as_deref()),
            ),
            Self::Absent { selector, kind } => target.verify_absent_named(
                &Locator::new(selector.as_str()),
                kind_or_default(kind.as_deref()),
            ),
            Self::HasClasses { classes } => target.verify_classes(classes),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected { expected } => write!(f, "selected is {expected}"),
            Self::TextEquals { text } => write!(f, "text is '{text}'"),
            Self::TextNotEquals { text } => write!(f, "text is not '{text}'"),
            Self::TextContains { text } => write!(f, "text contains '{text}'"),
            Self::Present { selector, .. } => write!(f, "'{selector}' is present"),
            Self::Absent { selector, .. } => write!(f, "'{selector}' is absent"),
            Self::HasClasses { classes } => write!(f, "has classes {}", classes.join(", ")),
        }
    }
}

fn kind_or_default(kind: Option<&str>) -> &str {
    kind.unwrap_or("Element")
}

impl PlanStep {
    /// Label used in reports: the step name, or a description of the check
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match &self.within {
            Some(scope) => format!("{scope}: {}", self.check),
            None => self.check.to_string(),
        }
    }

    fn run(&self, root: &DomNode) -> Result<(), VerificationError> {
        let target = match &self.within {
            Some(scope) => {
                let locator = Locator::new(scope.as_str());
                root.first_match(&locator).ok_or_else(|| {
                    VerificationError::new(format!("Scope not found: {locator}"))
                })?
            }
            None => root,
        };
        self.check.apply(target).map(|_| ())
    }
}

/// Outcome of a fully passing plan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Plan name
    pub plan: String,
    /// Labels of the steps that passed, in order
    pub passed: Vec<String>,
}

/// The step that stopped a plan run.
#[derive(Debug)]
pub struct PlanFailure {
    /// Plan name
    pub plan: String,
    /// Zero-based index of the failing step
    pub step: usize,
    /// Label of the failing step
    pub label: String,
    /// Labels of the steps that passed before it
    pub passed: Vec<String>,
    /// Why it failed
    pub error: VerificationError,
}

impl fmt::Display for PlanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: step {} ({}) failed: {}",
            self.plan,
            self.step + 1,
            self.label,
            self.error
        )
    }
}

impl std::error::Error for PlanFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl VerificationPlan {
    /// Parse a plan from YAML (JSON is valid YAML too)
    pub fn from_yaml(yaml: &str) -> ChainResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a plan from JSON
    pub fn from_json(json: &str) -> ChainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a plan, picking the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> ChainResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json(&std::fs::read_to_string(path)?),
            _ => Err(ChainError::UnknownPlanFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Run every step against `root`, stopping at the first failure
    pub fn run(&self, root: &DomNode) -> Result<PlanReport, PlanFailure> {
        tracing::info!(plan = %self.name, steps = self.steps.len(), "running verification plan");
        let mut passed = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let label = step.label();
            tracing::debug!(step = index + 1, %label, "verifying");
            if let Err(error) = step.run(root) {
                return Err(PlanFailure {
                    plan: self.name.clone(),
                    step: index,
                    label,
                    passed,
                    error,
                });
            }
            passed.push(label);
        }

        Ok(PlanReport {
            plan: self.name.clone(),
            passed,
        })
    }
}
