//! Record-creation workflows.
//!
//! A [`Workflow`] tracks how far the creation of one logical record got:
//!
//! ```text
//! Start -> IdAllocated -> FieldsValidated -> PrimaryInserted
//!       -> DependentChecked -> DependentInserted | DependentSkipped -> Done
//! ```
//!
//! Single-table records go straight from `PrimaryInserted` to `Done`. Any
//! non-terminal step may move to `Failed`, after which nothing advances.

pub mod coordinator;

pub use coordinator::{Coordinator, InsertMode, InsertOutcome};

use crate::error::{AppErr, Result};
use std::fmt::Display;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Start,
    IdAllocated,
    FieldsValidated,
    PrimaryInserted,
    DependentChecked,
    DependentInserted,
    DependentSkipped,
    Done,
    Failed,
}

impl Step {
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Done | Step::Failed)
    }

    pub fn can_advance_to(self, next: Step) -> bool {
        use Step::*;
        match (self, next) {
            (Done | Failed, _) => false,
            (_, Failed) => true,
            (Start, IdAllocated) => true,
            // 여러 개의 키를 할당하는 워크플로우 (항공편 + 항공편 정보)
            (IdAllocated, IdAllocated | FieldsValidated) => true,
            (FieldsValidated, PrimaryInserted) => true,
            (PrimaryInserted, DependentChecked | Done) => true,
            (DependentChecked, DependentInserted | DependentSkipped) => true,
            (DependentInserted | DependentSkipped, Done) => true,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct Workflow {
    name: &'static str,
    step: Step,
    failure: Option<String>,
}

impl Workflow {
    pub fn start(name: &'static str) -> Self {
        Self::at(name, Step::Start)
    }

    /// Picks a workflow up at `step`, for callers that did the earlier steps
    /// themselves.
    pub fn at(name: &'static str, step: Step) -> Self {
        Self {
            name,
            step,
            failure: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn advance(&mut self, next: Step) -> Result<()> {
        if !self.step.can_advance_to(next) {
            return Err(AppErr::Transition {
                from: self.step,
                to: next,
            });
        }
        debug!(workflow = self.name, from = ?self.step, to = ?next, "workflow step");
        self.step = next;
        Ok(())
    }

    /// Marks the workflow failed. The first recorded reason wins.
    pub fn fail(&mut self, reason: impl Display) {
        if self.step.is_terminal() {
            return;
        }
        warn!(workflow = self.name, step = ?self.step, %reason, "workflow failed");
        self.failure = Some(reason.to_string());
        self.step = Step::Failed;
    }

    /// Passes `result` through, failing the workflow on `Err`.
    pub fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }
}
