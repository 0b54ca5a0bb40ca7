//! Offline safety check command

use std::path::Path;

use anyhow::{Context, Result};

use fczone_config::{load_defined, load_effective, read_identifier_set};
use fczone_core::CrossReferenceIndex;
use fczone_validate::{DeletionRequest, SafetyValidator, ValidationReport};

use crate::render::render_report;

/// Validates deletion lists against configuration snapshot files
pub struct CheckCommand {
    validator: SafetyValidator,
}

impl CheckCommand {
    pub fn new() -> Self {
        Self {
            validator: SafetyValidator::new(),
        }
    }

    /// Build the report without printing it
    pub fn evaluate(
        &self,
        defined_path: &Path,
        effective_path: &Path,
        wwns_path: &Path,
        zones_path: &Path,
    ) -> Result<ValidationReport> {
        let defined = load_defined(defined_path).with_context(|| {
            format!(
                "Failed to load defined configuration: {}",
                defined_path.display()
            )
        })?;
        let effective = load_effective(effective_path).with_context(|| {
            format!(
                "Failed to load effective configuration: {}",
                effective_path.display()
            )
        })?;
        let wwns = read_identifier_set(wwns_path)
            .with_context(|| format!("Failed to read WWN list: {}", wwns_path.display()))?;
        let zones = read_identifier_set(zones_path)
            .with_context(|| format!("Failed to read zone list: {}", zones_path.display()))?;

        let index = CrossReferenceIndex::build(&defined);
        let request = DeletionRequest { wwns, zones };
        Ok(self.validator.validate(&request, &index, &defined, &effective))
    }

    /// Print the full report; a rejected request is an error
    pub fn execute(
        &self,
        defined_path: &Path,
        effective_path: &Path,
        wwns_path: &Path,
        zones_path: &Path,
    ) -> Result<()> {
        let report = self.evaluate(defined_path, effective_path, wwns_path, zones_path)?;
        println!("{}", render_report(&report));
        report.accepted_aliases()?;
        Ok(())
    }
}

impl Default for CheckCommand {
    fn default() -> Self {
        Self::new()
    }
}
