//! Fabric zoning safety validation
//!
//! Evaluates a deletion request against the cross-reference index and the
//! effective configuration before anything destructive is attempted.

pub mod checks;
pub mod report;
pub mod request;

pub use checks::{CheckKind, CheckOutcome};
pub use report::{CheckResult, ValidationReport, Verdict, WwnTranslation};
pub use request::DeletionRequest;

use fczone_core::{CrossReferenceIndex, DefinedConfiguration, EffectiveConfiguration};

/// Runs the safety checks in their fixed order.
///
/// WWN format and zone definition failures stop the run right after they are
/// recorded; the other checks accumulate so the operator sees every problem.
pub struct SafetyValidator {}

/// Checks executed so far and whether the run was stopped
#[derive(Default)]
struct CheckRun {
    results: Vec<CheckResult>,
    aborted_at: Option<CheckKind>,
}

impl CheckRun {
    fn run(&mut self, kind: CheckKind, check: impl FnOnce() -> CheckOutcome) {
        if self.aborted_at.is_some() {
            return;
        }

        let outcome = check();
        match &outcome {
            CheckOutcome::Passed => log::debug!("Check passed: {}", kind.description()),
            CheckOutcome::Failed { offenders } => {
                log::debug!(
                    "Check failed: {} ({} offender(s))",
                    kind.description(),
                    offenders.len()
                );
                if kind.aborts_on_failure() {
                    self.aborted_at = Some(kind);
                }
            }
        }
        self.results.push(CheckResult { kind, outcome });
    }

    fn failed(&self) -> bool {
        self.results.iter().any(|r| !r.passed())
    }
}

impl SafetyValidator {
    /// Create new safety validator
    pub fn new() -> Self {
        Self {}
    }

    /// Run all five checks against the request
    pub fn validate(
        &self,
        request: &DeletionRequest,
        index: &CrossReferenceIndex,
        defined: &DefinedConfiguration,
        effective: &EffectiveConfiguration,
    ) -> ValidationReport {
        let defined_zones = defined.zone_names();
        let enabled_zones = effective.enabled_zone_names();
        let active_wwns = effective.active_wwns();

        let mut run = CheckRun::default();
        run.run(CheckKind::WwnFormat, || checks::wwn_format(&request.wwns));
        run.run(CheckKind::AliasExistence, || {
            checks::alias_existence(&request.wwns, index)
        });
        run.run(CheckKind::ZoneDefinition, || {
            checks::zone_definition(&request.zones, &defined_zones)
        });
        run.run(CheckKind::ActiveZoneOverlap, || {
            checks::active_zone_overlap(&request.zones, &enabled_zones)
        });
        run.run(CheckKind::ActiveWwnOverlap, || {
            checks::active_wwn_overlap(&request.wwns, &active_wwns)
        });

        let mut report = self.finish(request, index, run);
        report.active_zones = enabled_zones.into_iter().map(str::to_string).collect();
        report.active_wwns = active_wwns.into_iter().map(str::to_string).collect();
        report
    }

    /// Run only the WWN format and alias existence checks, for WWN to alias
    /// lookups that do not touch the effective configuration
    pub fn validate_wwns(
        &self,
        request: &DeletionRequest,
        index: &CrossReferenceIndex,
    ) -> ValidationReport {
        let mut run = CheckRun::default();
        run.run(CheckKind::WwnFormat, || checks::wwn_format(&request.wwns));
        run.run(CheckKind::AliasExistence, || {
            checks::alias_existence(&request.wwns, index)
        });

        self.finish(request, index, run)
    }

    fn finish(
        &self,
        request: &DeletionRequest,
        index: &CrossReferenceIndex,
        run: CheckRun,
    ) -> ValidationReport {
        let translations: Vec<WwnTranslation> = request
            .wwns
            .iter()
            .filter_map(|wwn| {
                index.aliases_of(wwn).map(|aliases| WwnTranslation {
                    wwn: wwn.clone(),
                    aliases: aliases.to_vec(),
                })
            })
            .collect();

        let ambiguous: Vec<WwnTranslation> = translations
            .iter()
            .filter(|t| t.aliases.len() > 1)
            .cloned()
            .collect();
        for t in &ambiguous {
            log::warn!(
                "WWN {} is referenced by more than one alias: {}",
                t.wwn,
                t.aliases.join(", ")
            );
        }

        let verdict = if run.failed() {
            Verdict::Rejected
        } else {
            Verdict::Accepted {
                aliases: index.aliases_for_wwns(request.wwns.iter().map(String::as_str)),
            }
        };

        let report = ValidationReport {
            active_zones: Vec::new(),
            zones_to_delete: request.zones.iter().cloned().collect(),
            active_wwns: Vec::new(),
            wwns_to_delete: request.wwns.iter().cloned().collect(),
            checks: run.results,
            aborted_at: run.aborted_at,
            verdict,
            translations,
            ambiguous,
        };

        if report.is_accepted() {
            log::info!("Deletion request validation passed");
        } else {
            log::warn!(
                "Deletion request rejected with {} problem(s)",
                report.problems()
            );
        }
        report
    }
}

impl Default for SafetyValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fczone_core::{
        Alias, Cfg, EnabledZone, ValidationError, Zone, ZoneError, ZoneMembers,
    };

    const HOST1: &str = "10:00:00:00:00:00:00:01";
    const HOST2: &str = "10:00:00:00:00:00:00:02";
    const ARRAY1: &str = "50:00:00:00:00:00:00:01";

    fn defined() -> DefinedConfiguration {
        DefinedConfiguration::from_parts(
            vec![
                Alias::new("Host1", vec![HOST1.to_string()]),
                Alias::new("Host2", vec![HOST2.to_string()]),
                Alias::new("Array1", vec![ARRAY1.to_string()]),
            ],
            vec![
                Zone::standard("ZoneA", vec!["Host2".to_string(), "Array1".to_string()]),
                Zone::standard("ZoneB", vec!["Host1".to_string(), "Array1".to_string()]),
            ],
            vec![Cfg::new("prod", vec!["ZoneA".to_string()])],
        )
        .unwrap()
    }

    fn effective() -> EffectiveConfiguration {
        EffectiveConfiguration {
            cfg_name: Some("prod".to_string()),
            checksum: "c1".to_string(),
            enabled_zones: vec![EnabledZone {
                name: "ZoneA".to_string(),
                zone_type: None,
                members: ZoneMembers {
                    entry_names: vec![HOST2.to_string(), ARRAY1.to_string()],
                    principal_entry_names: Vec::new(),
                },
            }],
        }
    }

    fn validate(request: &DeletionRequest) -> ValidationReport {
        let defined = defined();
        let index = CrossReferenceIndex::build(&defined);
        SafetyValidator::new().validate(request, &index, &defined, &effective())
    }

    fn kinds(report: &ValidationReport) -> Vec<CheckKind> {
        report.checks.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_accepts_unused_wwn_and_zone() {
        let report = validate(&DeletionRequest::new([HOST1], ["ZoneB"]));

        assert!(report.is_accepted());
        assert_eq!(kinds(&report), CheckKind::ORDER.to_vec());
        assert_eq!(report.accepted_aliases().unwrap(), ["Host1"]);
        assert_eq!(report.translations[0].aliases, vec!["Host1"]);
        assert_eq!(report.active_zones, vec!["ZoneA"]);
        assert_eq!(report.active_wwns, vec![HOST2, ARRAY1]);
        assert!(!report.short_circuited());
    }

    #[test]
    fn test_bad_wwn_format_short_circuits() {
        let report = validate(&DeletionRequest::new([HOST2, "not-a-wwn"], ["ZoneA"]));

        assert_eq!(report.verdict, Verdict::Rejected);
        assert_eq!(kinds(&report), vec![CheckKind::WwnFormat]);
        assert_eq!(report.aborted_at, Some(CheckKind::WwnFormat));
        assert_eq!(report.checks[0].outcome.offenders(), ["not-a-wwn"]);
        assert!(report.check(CheckKind::ActiveWwnOverlap).is_none());
    }

    #[test]
    fn test_unknown_zone_short_circuits() {
        let report = validate(&DeletionRequest::new([HOST2], ["ZoneA", "Missing"]));

        assert_eq!(report.verdict, Verdict::Rejected);
        assert_eq!(
            kinds(&report),
            vec![
                CheckKind::WwnFormat,
                CheckKind::AliasExistence,
                CheckKind::ZoneDefinition
            ]
        );
        assert_eq!(report.aborted_at, Some(CheckKind::ZoneDefinition));
        assert_eq!(
            report.check(CheckKind::ZoneDefinition).unwrap().outcome.offenders(),
            ["Missing"]
        );
    }

    #[test]
    fn test_missing_alias_accumulates() {
        let unknown = "20:00:00:00:00:00:00:99";
        let report = validate(&DeletionRequest::new([unknown], ["Missing"]));

        // Alias existence does not stop the run; the unknown zone does.
        assert!(!report.check(CheckKind::AliasExistence).unwrap().passed());
        assert_eq!(report.aborted_at, Some(CheckKind::ZoneDefinition));
        assert_eq!(report.problems(), 2);
    }

    #[test]
    fn test_missing_alias_still_runs_overlap_checks() {
        let unknown = "20:00:00:00:00:00:00:99";
        let report = validate(&DeletionRequest::new([unknown, HOST2], ["ZoneA"]));

        assert_eq!(report.verdict, Verdict::Rejected);
        assert_eq!(kinds(&report), CheckKind::ORDER.to_vec());
        assert_eq!(report.aborted_at, None);
        assert_eq!(
            report.check(CheckKind::AliasExistence).unwrap().outcome.offenders(),
            [unknown]
        );
        assert_eq!(
            report.check(CheckKind::ActiveZoneOverlap).unwrap().outcome.offenders(),
            ["ZoneA"]
        );
        assert_eq!(
            report.check(CheckKind::ActiveWwnOverlap).unwrap().outcome.offenders(),
            [HOST2]
        );
    }

    #[test]
    fn test_active_wwn_reported_with_all_checks() {
        let report = validate(&DeletionRequest::new([HOST2], ["ZoneA"]));

        assert_eq!(report.verdict, Verdict::Rejected);
        assert_eq!(kinds(&report), CheckKind::ORDER.to_vec());
        assert!(!report.short_circuited());
        assert_eq!(
            report.check(CheckKind::ActiveWwnOverlap).unwrap().outcome.offenders(),
            [HOST2]
        );
        assert_eq!(
            report.check(CheckKind::ActiveZoneOverlap).unwrap().outcome.offenders(),
            ["ZoneA"]
        );
    }

    #[test]
    fn test_end_to_end_active_zone_rejected() {
        let defined = DefinedConfiguration::from_parts(
            vec![Alias::new("Host1", vec![HOST1.to_string()])],
            vec![Zone::standard("ZoneA", vec![HOST2.to_string()])],
            vec![],
        )
        .unwrap();
        let effective = EffectiveConfiguration {
            cfg_name: None,
            checksum: "c1".to_string(),
            enabled_zones: vec![EnabledZone {
                name: "ZoneA".to_string(),
                zone_type: None,
                members: ZoneMembers {
                    entry_names: vec![HOST2.to_string()],
                    principal_entry_names: Vec::new(),
                },
            }],
        };
        let index = CrossReferenceIndex::build(&defined);
        let request = DeletionRequest::new([HOST1], ["ZoneA"]);

        let report = SafetyValidator::new().validate(&request, &index, &defined, &effective);

        assert_eq!(report.verdict, Verdict::Rejected);
        assert!(report.check(CheckKind::WwnFormat).unwrap().passed());
        assert!(report.check(CheckKind::AliasExistence).unwrap().passed());
        assert!(report.check(CheckKind::ZoneDefinition).unwrap().passed());
        assert_eq!(
            report.check(CheckKind::ActiveZoneOverlap).unwrap().outcome.offenders(),
            ["ZoneA"]
        );
        assert!(report.check(CheckKind::ActiveWwnOverlap).unwrap().passed());

        match report.accepted_aliases().unwrap_err() {
            ZoneError::Validation(ValidationError::Rejected { problems }) => {
                assert_eq!(problems, 1)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ambiguous_wwn_flagged() {
        let defined = DefinedConfiguration::from_parts(
            vec![
                Alias::new("A2", vec![HOST1.to_string()]),
                Alias::new("A1", vec![HOST1.to_string(), HOST2.to_string()]),
            ],
            vec![],
            vec![],
        )
        .unwrap();
        let index = CrossReferenceIndex::build(&defined);
        let request = DeletionRequest::for_wwns([HOST1, HOST2]);

        let report = SafetyValidator::new().validate_wwns(&request, &index);

        assert_eq!(report.accepted_aliases().unwrap(), ["A1", "A2"]);
        assert_eq!(report.ambiguous.len(), 1);
        assert_eq!(report.ambiguous[0].wwn, HOST1);
        assert_eq!(report.ambiguous[0].aliases, vec!["A2", "A1"]);
        assert!(matches!(
            report.ensure_unambiguous(),
            Err(ZoneError::Validation(ValidationError::AmbiguousAlias { .. }))
        ));
    }

    #[test]
    fn test_validate_wwns_runs_two_checks() {
        let defined = defined();
        let index = CrossReferenceIndex::build(&defined);
        let request = DeletionRequest::for_wwns([HOST2]);

        let report = SafetyValidator::new().validate_wwns(&request, &index);

        // HOST2 is active, but the lookup mode does not look at the fabric state.
        assert!(report.is_accepted());
        assert_eq!(
            kinds(&report),
            vec![CheckKind::WwnFormat, CheckKind::AliasExistence]
        );
        assert!(report.ensure_unambiguous().is_ok());
    }

    #[test]
    fn test_empty_request_accepted() {
        let report = validate(&DeletionRequest::default());
        assert!(report.is_accepted());
        assert_eq!(report.accepted_aliases().unwrap().len(), 0);
    }

    #[test]
    fn test_report_serializes() {
        let report = validate(&DeletionRequest::new([HOST1], ["ZoneB"]));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["zones_to_delete"][0], "ZoneB");
    }
}
