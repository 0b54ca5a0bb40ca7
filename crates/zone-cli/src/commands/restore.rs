//! Restore command

use std::path::Path;

use anyhow::{Context, Result};

use fczone_config::load_defined;

use crate::context::FabricContext;
use crate::render::render_restore;

pub struct RestoreCommand<'a> {
    context: &'a FabricContext,
}

impl<'a> RestoreCommand<'a> {
    pub fn new(context: &'a FabricContext) -> Self {
        Self { context }
    }

    /// Recreate `name` from a defined configuration snapshot and commit
    pub async fn execute(&self, snapshot_path: &Path, name: &str) -> Result<()> {
        let snapshot = load_defined(snapshot_path).with_context(|| {
            format!("Failed to load snapshot: {}", snapshot_path.display())
        })?;

        let outcome = self
            .context
            .orchestrator()?
            .restore_object(&snapshot, name)
            .await
            .with_context(|| format!("Failed to restore {}", name))?;

        println!("{}", render_restore(&outcome));
        Ok(())
    }
}
