//! Results of delete, purge and restore runs

use serde::Serialize;

use fczone_core::{ObjectKind, ZoneError};
use fczone_validate::ValidationReport;

use crate::plan::ChangePlan;

/// What happened to one requested target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TargetStatus {
    Deleted,
    /// The fabric reported the object as already gone
    AlreadyAbsent,
    /// The name is not in the defined configuration; skipped
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetResult {
    pub name: String,
    pub kind: Option<ObjectKind>,
    pub status: TargetStatus,
}

/// Whether pending changes were committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommitDecision {
    /// Committed with the checksum read right before the commit
    Committed { checksum: String },
    /// The operator declined; the fabric drops the transaction on logout
    Discarded,
    /// Nothing to commit, or the mode never commits
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub targets: Vec<TargetResult>,
    pub commit: CommitDecision,
}

impl BatchOutcome {
    pub fn deleted(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Deleted))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Failed { .. }))
    }

    fn count(&self, f: impl Fn(&TargetStatus) -> bool) -> usize {
        self.targets.iter().filter(|t| f(&t.status)).count()
    }
}

/// Result of a staged purge
#[derive(Debug)]
pub enum PurgeOutcome {
    /// Validation failed or an ambiguous WWN was not resolved; nothing was deleted
    Refused {
        report: ValidationReport,
        reason: ZoneError,
    },
    Purged {
        report: ValidationReport,
        batch: BatchOutcome,
    },
}

impl PurgeOutcome {
    pub fn report(&self) -> &ValidationReport {
        match self {
            PurgeOutcome::Refused { report, .. } | PurgeOutcome::Purged { report, .. } => report,
        }
    }
}

/// Result of restoring one object from a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestoreOutcome {
    pub plan: ChangePlan,
    /// State of the object the restore replaced
    pub replaced: TargetStatus,
    pub commit: CommitDecision,
}
