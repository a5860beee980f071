//! Per-step scenario results.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::ConformanceError;
use crate::scenario::Step;

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed(String),
    /// Not run because an earlier step failed
    Skipped,
}

/// One line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
    pub elapsed_ms: u64,
}

/// Outcome of a whole scenario run, one entry per step in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub steps: Vec<StepOutcome>,
}

impl ScenarioReport {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            steps: Vec::with_capacity(Step::ALL.len()),
        }
    }

    /// Records the result of a step that ran.
    pub fn record(&mut self, step: Step, elapsed: Duration, error: Option<&ConformanceError>) {
        let status = match error {
            None => StepStatus::Passed,
            Some(err) => StepStatus::Failed(err.to_string()),
        };
        self.steps.push(StepOutcome {
            step,
            status,
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }

    /// Marks every step that has no outcome yet as skipped.
    pub fn skip_remaining(&mut self) {
        for step in Step::ALL {
            if self.outcome(step).is_none() {
                self.steps.push(StepOutcome {
                    step,
                    status: StepStatus::Skipped,
                    elapsed_ms: 0,
                });
            }
        }
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|outcome| outcome.step == step)
    }

    /// True when every step ran and passed.
    pub fn is_success(&self) -> bool {
        self.steps.len() == Step::ALL.len()
            && self
                .steps
                .iter()
                .all(|outcome| outcome.status == StepStatus::Passed)
    }

    /// The failed step, if any.
    pub fn failure(&self) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|outcome| matches!(outcome.status, StepStatus::Failed(_)))
    }

    pub fn passed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|outcome| outcome.status == StepStatus::Passed)
            .count()
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.scenario)?;
        for outcome in &self.steps {
            match &outcome.status {
                StepStatus::Passed => {
                    writeln!(f, "  ok      {} ({} ms)", outcome.step.description(), outcome.elapsed_ms)?
                }
                StepStatus::Failed(message) => {
                    writeln!(f, "  FAILED  {}", outcome.step.description())?;
                    writeln!(f, "          {}", message)?;
                }
                StepStatus::Skipped => writeln!(f, "  skipped {}", outcome.step.description())?,
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed_count(),
            usize::from(self.failure().is_some()),
            self.steps
                .iter()
                .filter(|outcome| outcome.status == StepStatus::Skipped)
                .count()
        )
    }
}
