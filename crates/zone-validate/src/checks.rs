//! Individual safety checks
//!
//! Each check is a pure function over the request and the configuration
//! views; offenders come back sorted so reports are stable.

use std::collections::BTreeSet;

use serde::Serialize;

use fczone_core::{is_wwn, CrossReferenceIndex};

/// The safety checks, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckKind {
    WwnFormat,
    AliasExistence,
    ZoneDefinition,
    ActiveZoneOverlap,
    ActiveWwnOverlap,
}

impl CheckKind {
    pub const ORDER: [CheckKind; 5] = [
        CheckKind::WwnFormat,
        CheckKind::AliasExistence,
        CheckKind::ZoneDefinition,
        CheckKind::ActiveZoneOverlap,
        CheckKind::ActiveWwnOverlap,
    ];

    /// A failure of this check stops the run; the others accumulate
    pub fn aborts_on_failure(&self) -> bool {
        matches!(self, CheckKind::WwnFormat | CheckKind::ZoneDefinition)
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::WwnFormat => "WWN format",
            CheckKind::AliasExistence => "WWNs have an alias",
            CheckKind::ZoneDefinition => "zones are defined",
            CheckKind::ActiveZoneOverlap => "zones not in effective configuration",
            CheckKind::ActiveWwnOverlap => "WWNs not in effective configuration",
        }
    }

    /// Message shown next to each offender of a failed check
    pub fn failure_message(&self) -> &'static str {
        match self {
            CheckKind::WwnFormat => "is not a valid WWN",
            CheckKind::AliasExistence => "has no alias assigned",
            CheckKind::ZoneDefinition => "is not a defined zone",
            CheckKind::ActiveZoneOverlap => "is enabled in the effective configuration",
            CheckKind::ActiveWwnOverlap => "is active in the effective configuration",
        }
    }
}

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckOutcome {
    Passed,
    Failed { offenders: Vec<String> },
}

impl CheckOutcome {
    fn from_offenders<'a>(offenders: impl Iterator<Item = &'a String>) -> Self {
        let mut offenders: Vec<String> = offenders.cloned().collect();
        if offenders.is_empty() {
            return CheckOutcome::Passed;
        }
        offenders.sort();
        offenders.dedup();
        CheckOutcome::Failed { offenders }
    }

    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }

    pub fn offenders(&self) -> &[String] {
        match self {
            CheckOutcome::Passed => &[],
            CheckOutcome::Failed { offenders } => offenders,
        }
    }
}

/// Every WWN must be eight colon-separated hex octets
pub fn wwn_format(wwns: &BTreeSet<String>) -> CheckOutcome {
    CheckOutcome::from_offenders(wwns.iter().filter(|wwn| !is_wwn(wwn)))
}

/// Every WWN must be referenced by at least one alias
pub fn alias_existence(wwns: &BTreeSet<String>, index: &CrossReferenceIndex) -> CheckOutcome {
    CheckOutcome::from_offenders(wwns.iter().filter(|wwn| !index.has_alias_for(wwn)))
}

/// Every zone must exist in the defined configuration
pub fn zone_definition(zones: &BTreeSet<String>, defined_zones: &BTreeSet<&str>) -> CheckOutcome {
    CheckOutcome::from_offenders(zones.iter().filter(|zone| !defined_zones.contains(zone.as_str())))
}

/// No zone may be enabled in the effective configuration
pub fn active_zone_overlap(zones: &BTreeSet<String>, enabled: &BTreeSet<&str>) -> CheckOutcome {
    CheckOutcome::from_offenders(zones.iter().filter(|zone| enabled.contains(zone.as_str())))
}

/// No WWN may be a member of an enabled zone
pub fn active_wwn_overlap(wwns: &BTreeSet<String>, active: &BTreeSet<&str>) -> CheckOutcome {
    CheckOutcome::from_offenders(wwns.iter().filter(|wwn| active.contains(wwn.as_str())))
}
