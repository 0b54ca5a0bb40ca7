//! Batch deletion and staged purge commands

use std::path::Path;

use anyhow::{Context, Result};

use fczone_apply::PurgeOutcome;
use fczone_config::{read_identifier_list, read_identifier_set};
use fczone_validate::DeletionRequest;

use crate::context::FabricContext;
use crate::exit::CliError;
use crate::render::{render_batch, render_report};

pub struct DeleteCommand<'a> {
    context: &'a FabricContext,
}

impl<'a> DeleteCommand<'a> {
    pub fn new(context: &'a FabricContext) -> Self {
        Self { context }
    }

    /// Delete the objects named in `list_path`, then commit after confirmation
    pub async fn execute(&self, list_path: &Path, yes: bool) -> Result<()> {
        let names: Vec<String> = read_identifier_list(list_path)
            .with_context(|| format!("Failed to read object list: {}", list_path.display()))?
            .into_iter()
            .collect();
        if names.is_empty() {
            return Err(CliError::Usage(format!("{} names no objects", list_path.display())).into());
        }

        let orchestrator = self
            .context
            .orchestrator()?
            .with_override_confirm(yes || self.context.settings().override_confirm);

        let outcome = orchestrator
            .delete_objects(&names)
            .await
            .context("Batch deletion failed")?;

        println!("{}", render_batch(&outcome));
        Ok(())
    }

    /// Validate against the live fabric and delete the WWNs' aliases and the
    /// zones without committing
    pub async fn dry_run(&self, wwns_path: &Path, zones_path: &Path, all_aliases: bool) -> Result<()> {
        let wwns = read_identifier_set(wwns_path)
            .with_context(|| format!("Failed to read WWN list: {}", wwns_path.display()))?;
        let zones = read_identifier_set(zones_path)
            .with_context(|| format!("Failed to read zone list: {}", zones_path.display()))?;
        let request = DeletionRequest { wwns, zones };

        let outcome = self
            .context
            .orchestrator()?
            .purge(&request, all_aliases)
            .await
            .context("Dry run failed")?;

        println!("{}", render_report(outcome.report()));
        match outcome {
            PurgeOutcome::Refused { reason, .. } => Err(reason.into()),
            PurgeOutcome::Purged { batch, .. } => {
                println!();
                println!("{}", render_batch(&batch));
                Ok(())
            }
        }
    }
}
