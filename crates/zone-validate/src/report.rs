//! Validation report

use serde::Serialize;

use fczone_core::{Result, ValidationError};

use crate::checks::{CheckKind, CheckOutcome};

/// Outcome of one executed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome.passed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Safe to proceed; carries the aliases behind the requested WWNs
    Accepted { aliases: Vec<String> },
    Rejected,
}

/// A requested WWN with the aliases referencing it, in encounter order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WwnTranslation {
    pub wwn: String,
    pub aliases: Vec<String>,
}

/// Everything the operator needs to read before confirming a deletion.
///
/// All listings are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub active_zones: Vec<String>,
    pub zones_to_delete: Vec<String>,
    pub active_wwns: Vec<String>,
    pub wwns_to_delete: Vec<String>,
    /// Checks that actually ran, in order
    pub checks: Vec<CheckResult>,
    /// Check that stopped the run, if any
    pub aborted_at: Option<CheckKind>,
    pub verdict: Verdict,
    /// Requested WWNs that have at least one alias
    pub translations: Vec<WwnTranslation>,
    /// Requested WWNs referenced by more than one alias
    pub ambiguous: Vec<WwnTranslation>,
}

impl ValidationReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted { .. })
    }

    pub fn short_circuited(&self) -> bool {
        self.aborted_at.is_some()
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    /// Total number of offending items across failed checks
    pub fn problems(&self) -> usize {
        self.checks.iter().map(|c| c.outcome.offenders().len()).sum()
    }

    /// Aliases to delete when accepted, else `ValidationError::Rejected`
    pub fn accepted_aliases(&self) -> Result<&[String]> {
        match &self.verdict {
            Verdict::Accepted { aliases } => Ok(aliases.as_slice()),
            Verdict::Rejected => Err(ValidationError::Rejected {
                problems: self.problems(),
            }
            .into()),
        }
    }

    /// Fails with `ValidationError::AmbiguousAlias` when a requested WWN has
    /// more than one alias
    pub fn ensure_unambiguous(&self) -> Result<()> {
        if self.ambiguous.is_empty() {
            return Ok(());
        }
        Err(ValidationError::AmbiguousAlias {
            wwns: self.ambiguous.iter().map(|t| t.wwn.clone()).collect(),
        }
        .into())
    }
}
