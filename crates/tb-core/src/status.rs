//! Operation outcomes.
//!
//! Engine exit codes are data, not errors: a failing subprocess leaves
//! a log file and the pipeline moves on. Only orchestrator-side faults
//! (unwritable param file, bad model code) travel as `Err`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of a single adapter operation (index, retrieve, or
/// evaluate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OpStatus {
    /// The external tool ran and its output was persisted.
    Completed,
    /// The output already exists; nothing was run.
    Skipped { existing: PathBuf },
    /// A prerequisite (index, run file, corpus) is absent.
    MissingInput { path: PathBuf },
    /// The subprocess exited nonzero; command line, exit code, and
    /// output were written to `log`.
    Failed { log: PathBuf },
}

impl OpStatus {
    /// True when the external tool actually ran to completion.
    pub fn completed(&self) -> bool {
        matches!(self, OpStatus::Completed)
    }

    /// True when nothing was spawned (skip or missing prerequisite).
    pub fn skipped(&self) -> bool {
        matches!(self, OpStatus::Skipped { .. } | OpStatus::MissingInput { .. })
    }
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpStatus::Completed => write!(f, "completed"),
            OpStatus::Skipped { existing } => {
                write!(f, "skipped, output exists: {}", existing.display())
            }
            OpStatus::MissingInput { path } => {
                write!(f, "missing input: {}", path.display())
            }
            OpStatus::Failed { log } => write!(f, "failed, log at {}", log.display()),
        }
    }
}
