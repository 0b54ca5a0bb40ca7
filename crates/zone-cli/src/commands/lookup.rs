//! WWN to alias lookup command

use std::path::Path;

use anyhow::{Context, Result};

use fczone_config::{load_defined, read_identifier_set};
use fczone_core::CrossReferenceIndex;
use fczone_validate::{DeletionRequest, SafetyValidator};

use crate::render::render_checks;

/// Translates a WWN list into the aliases referencing those WWNs
pub struct LookupCommand {
    validator: SafetyValidator,
}

impl LookupCommand {
    pub fn new() -> Self {
        Self {
            validator: SafetyValidator::new(),
        }
    }

    /// Sorted aliases for the WWNs in `wwns_path`, after the format and alias
    /// existence checks
    pub fn lookup(&self, defined_path: &Path, wwns_path: &Path) -> Result<Vec<String>> {
        let defined = load_defined(defined_path).with_context(|| {
            format!(
                "Failed to load defined configuration: {}",
                defined_path.display()
            )
        })?;
        let wwns = read_identifier_set(wwns_path)
            .with_context(|| format!("Failed to read WWN list: {}", wwns_path.display()))?;

        let index = CrossReferenceIndex::build(&defined);
        let report = self
            .validator
            .validate_wwns(&DeletionRequest::for_wwns(wwns), &index);

        if !report.is_accepted() {
            eprintln!("{}", render_checks(&report));
        }
        Ok(report.accepted_aliases()?.to_vec())
    }

    pub fn execute(&self, defined_path: &Path, wwns_path: &Path) -> Result<()> {
        for alias in self.lookup(defined_path, wwns_path)? {
            println!("{}", alias);
        }
        Ok(())
    }
}

impl Default for LookupCommand {
    fn default() -> Self {
        Self::new()
    }
}
