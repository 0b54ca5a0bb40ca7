//! Cross-reference and member count listings

use std::path::Path;

use anyhow::{Context, Result};

use fczone_config::load_defined;
use fczone_core::{CrossReferenceIndex, DefinedConfiguration};

use crate::render::{render_member_counts, render_xref};

/// Read-only listings over a defined configuration snapshot
pub struct XrefCommand;

impl XrefCommand {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, defined_path: &Path) -> Result<DefinedConfiguration> {
        load_defined(defined_path).with_context(|| {
            format!(
                "Failed to load defined configuration: {}",
                defined_path.display()
            )
        })
    }

    /// Print every member reference with its zones, or only the references
    /// starting with `prefix`
    pub fn execute(&self, defined_path: &Path, prefix: Option<&str>) -> Result<()> {
        let index = CrossReferenceIndex::build(&self.load(defined_path)?);

        match prefix {
            Some(prefix) => {
                for reference in index.select_by_prefix(prefix) {
                    println!("{}", reference);
                }
            }
            None => println!("{}", render_xref(&index)),
        }

        for (wwn, aliases) in index.ambiguous_wwns() {
            eprintln!(
                "Warning: WWN {} is referenced by more than one alias: {}",
                wwn,
                aliases.join(", ")
            );
        }
        Ok(())
    }

    /// Print member counts per zone
    pub fn members(&self, defined_path: &Path) -> Result<()> {
        println!("{}", render_member_counts(&self.load(defined_path)?));
        Ok(())
    }
}

impl Default for XrefCommand {
    fn default() -> Self {
        Self::new()
    }
}
