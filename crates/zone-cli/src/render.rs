//! Text rendering of reports and outcomes

use fczone_apply::{BatchOutcome, CommitDecision, RestoreOutcome, TargetResult, TargetStatus};
use fczone_core::{CrossReferenceIndex, DefinedConfiguration};
use fczone_validate::{CheckOutcome, ValidationReport, Verdict};

fn section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    lines.push(format!("{}:", title));
    if items.is_empty() {
        lines.push("    (none)".to_string());
    }
    for item in items {
        lines.push(format!("    {}", item));
    }
}

/// Check results, ambiguity warnings and the verdict
pub fn render_checks(report: &ValidationReport) -> String {
    let mut lines = Vec::new();

    for check in &report.checks {
        match &check.outcome {
            CheckOutcome::Passed => lines.push(format!("✓ {}", check.kind.description())),
            CheckOutcome::Failed { offenders } => {
                lines.push(format!("✗ {}", check.kind.description()));
                for offender in offenders {
                    lines.push(format!(
                        "    {} {}",
                        offender,
                        check.kind.failure_message()
                    ));
                }
            }
        }
    }
    if let Some(kind) = report.aborted_at {
        lines.push(format!(
            "Stopped after '{}'; remaining checks not run",
            kind.description()
        ));
    }

    for t in &report.ambiguous {
        lines.push(format!(
            "Warning: WWN {} is referenced by more than one alias: {}",
            t.wwn,
            t.aliases.join(", ")
        ));
    }

    match report.verdict {
        Verdict::Accepted { .. } => lines.push("Result: ACCEPTED".to_string()),
        Verdict::Rejected => lines.push(format!(
            "Result: REJECTED ({} problem(s))",
            report.problems()
        )),
    }
    lines.join("\n")
}

/// Full safety check report: listings, checks, and on acceptance the WWN to
/// alias translation and the aliases to delete
pub fn render_report(report: &ValidationReport) -> String {
    let mut lines = Vec::new();
    section(&mut lines, "Active zones", &report.active_zones);
    section(&mut lines, "Zones to delete", &report.zones_to_delete);
    section(&mut lines, "Active WWNs", &report.active_wwns);
    section(&mut lines, "WWNs to delete", &report.wwns_to_delete);
    lines.push(String::new());
    lines.push(render_checks(report));

    if let Verdict::Accepted { aliases } = &report.verdict {
        lines.push(String::new());
        lines.push("WWN to alias:".to_string());
        for t in &report.translations {
            lines.push(format!("    {} -> {}", t.wwn, t.aliases.join(", ")));
        }
        section(&mut lines, "Aliases to delete", aliases);
    }
    lines.join("\n")
}

/// Every zone member reference with its sorted memberships
pub fn render_xref(index: &CrossReferenceIndex) -> String {
    index
        .sorted_memberships()
        .into_iter()
        .map(|(reference, memberships)| {
            let tags: Vec<String> = memberships.iter().map(ToString::to_string).collect();
            format!("{}: {}", reference, tags.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Member counts per zone, sorted by zone name
pub fn render_member_counts(defined: &DefinedConfiguration) -> String {
    let mut zones: Vec<_> = defined.zones.values().collect();
    zones.sort_by(|a, b| a.name.cmp(&b.name));

    zones
        .into_iter()
        .map(|zone| {
            let counts = zone.member_counts();
            format!(
                "{} ({}): member={} principal={} non-principal={}",
                zone.name, zone.zone_type, counts.member, counts.principal, counts.non_principal
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_target(target: &TargetResult) -> String {
    let object = match target.kind {
        Some(kind) => format!("{} {}", kind, target.name),
        None => target.name.clone(),
    };
    match &target.status {
        TargetStatus::Deleted => format!("✓ Deleted {}", object),
        TargetStatus::AlreadyAbsent => format!("- {} already absent", object),
        TargetStatus::NotFound => format!("- {} not found in defined configuration, skipped", object),
        TargetStatus::Failed { message } => format!("✗ Failed to delete {}: {}", object, message),
    }
}

fn render_commit(commit: &CommitDecision) -> String {
    match commit {
        CommitDecision::Committed { checksum } => {
            format!("✓ Changes committed (checksum {})", checksum)
        }
        CommitDecision::Discarded => "Changes discarded, nothing committed".to_string(),
        CommitDecision::NotAttempted => "No commit performed".to_string(),
    }
}

pub fn render_batch(outcome: &BatchOutcome) -> String {
    let mut lines: Vec<String> = outcome.targets.iter().map(render_target).collect();
    lines.push(render_commit(&outcome.commit));
    lines.join("\n")
}

pub fn render_restore(outcome: &RestoreOutcome) -> String {
    let previous = match outcome.replaced {
        TargetStatus::Deleted => "replaced existing object",
        _ => "object was absent",
    };
    [
        format!(
            "✓ Restored {} {} ({})",
            outcome.plan.kind, outcome.plan.name, previous
        ),
        render_commit(&outcome.commit),
    ]
    .join("\n")
}
