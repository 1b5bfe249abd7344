use super::{Step, Workflow};
use crate::database::{Database, Statement};
use crate::error::{AppErr, Result};
use crate::existence::{ExistenceChecker, Reference};
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertMode {
    /// Primary stays in place when the dependent insert fails.
    BestEffort,
    /// Both inserts commit together or not at all.
    #[default]
    Transactional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Primary was inserted, the dependent's reference did not exist.
    DependentSkipped,
    Failed,
}

impl InsertOutcome {
    pub fn is_success(self) -> bool {
        self == InsertOutcome::Inserted
    }
}

/// Runs a primary insert followed by a dependent insert.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinator {
    mode: InsertMode,
    checker: ExistenceChecker,
}

impl Coordinator {
    pub fn new(mode: InsertMode, checker: ExistenceChecker) -> Self {
        Self { mode, checker }
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }

    /// `true` only when both statements succeeded. The dependent statement is
    /// never run after a failed primary.
    pub fn insert_dependent(&self, db: &Database, primary: &Statement, dependent: &Statement) -> bool {
        let mut wf = Workflow::at("dependent insert", Step::FieldsValidated);
        self.insert_checked(db, &mut wf, primary, None, dependent)
            .is_success()
    }

    /// Same as [`Coordinator::insert_dependent`], but first confirms that
    /// `reference` exists once the primary row is in place. A missing
    /// reference skips the dependent insert instead of creating an orphan.
    pub fn insert_checked(
        &self,
        db: &Database,
        wf: &mut Workflow,
        primary: &Statement,
        reference: Option<&Reference>,
        dependent: &Statement,
    ) -> InsertOutcome {
        match self.run(db, wf, primary, reference, dependent) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(workflow = wf.name(), step = ?wf.step(), error = %e, "dependent insert aborted");
                wf.fail(&e);
                InsertOutcome::Failed
            }
        }
    }

    fn run(
        &self,
        db: &Database,
        wf: &mut Workflow,
        primary: &Statement,
        reference: Option<&Reference>,
        dependent: &Statement,
    ) -> Result<InsertOutcome> {
        if wf.step() != Step::FieldsValidated {
            return Err(AppErr::Transition {
                from: wf.step(),
                to: Step::PrimaryInserted,
            });
        }
        // 트랜잭션 모드에서는 중간에 반환하면 guard가 drop되며 롤백된다
        let tx = match self.mode {
            InsertMode::Transactional => Some(db.begin(TransactionBehavior::Immediate)?),
            InsertMode::BestEffort => None,
        };

        db.execute_update(primary)?;
        wf.advance(Step::PrimaryInserted)?;

        let found = match reference {
            Some(reference) => self.checker.check(db, reference)?,
            None => true,
        };
        wf.advance(Step::DependentChecked)?;

        let outcome = if found {
            db.execute_update(dependent)?;
            wf.advance(Step::DependentInserted)?;
            InsertOutcome::Inserted
        } else {
            info!(workflow = wf.name(), ?reference, "reference missing, dependent insert skipped");
            wf.advance(Step::DependentSkipped)?;
            InsertOutcome::DependentSkipped
        };

        if let Some(tx) = tx {
            tx.commit()?;
        }
        wf.advance(Step::Done)?;
        Ok(outcome)
    }
}
