//! Configuration snapshot commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::json;

use fczone_config::{default_snapshot_path, write_snapshot};

use crate::context::FabricContext;

/// Which configuration documents to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchTarget {
    Defined,
    Effective,
    Both,
}

impl FetchTarget {
    fn defined(&self) -> bool {
        matches!(self, FetchTarget::Defined | FetchTarget::Both)
    }

    fn effective(&self) -> bool {
        matches!(self, FetchTarget::Effective | FetchTarget::Both)
    }
}

pub struct FetchCommand<'a> {
    context: &'a FabricContext,
}

impl<'a> FetchCommand<'a> {
    pub fn new(context: &'a FabricContext) -> Self {
        Self { context }
    }

    /// Save the fetched documents, unwrapped, to the given or timestamped paths
    pub async fn execute(
        &self,
        target: FetchTarget,
        defined_out: Option<PathBuf>,
        effective_out: Option<PathBuf>,
    ) -> Result<()> {
        let documents = self
            .context
            .orchestrator()?
            .fetch_configurations(target.defined(), target.effective())
            .await
            .context("Failed to fetch configuration")?;

        let outputs = [
            (documents.defined, defined_out, "defined"),
            (documents.effective, effective_out, "effective"),
        ];
        for (document, path, label) in outputs {
            if let Some(document) = document {
                let path = path.unwrap_or_else(|| default_snapshot_path(label));
                write_snapshot(&path, &document).with_context(|| {
                    format!("Failed to write {} configuration to {}", label, path.display())
                })?;
                println!("✓ Saved {} configuration to {}", label, path.display());
            }
        }
        Ok(())
    }

    /// Print the name of the effective cfg, optionally saving it as a document
    pub async fn active(&self, output: Option<&Path>) -> Result<()> {
        let effective = self
            .context
            .orchestrator()?
            .fetch_effective()
            .await
            .context("Failed to fetch effective configuration")?;

        let cfg_name = effective.cfg_name.unwrap_or_default();
        println!("{}", cfg_name);

        if let Some(path) = output {
            let document = json!({ "effective-configuration": { "cfg-name": cfg_name } });
            write_snapshot(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}
