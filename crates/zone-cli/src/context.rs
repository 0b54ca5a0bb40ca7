//! Fabric connection context for commands that talk to a switch

use std::path::Path;
use std::sync::Arc;

use fczone_apply::{HttpFabricClient, StdinConfirm, ZoningOrchestrator};
use fczone_config::{FabricSettings, SettingsOverrides};
use fczone_core::Result;

/// Settings shared by the fabric commands
pub struct FabricContext {
    settings: FabricSettings,
}

impl FabricContext {
    pub fn new(settings: FabricSettings) -> Self {
        Self { settings }
    }

    /// Load settings from an optional file, the environment and overrides
    pub fn load(config: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        Ok(Self::new(FabricSettings::load(config, overrides)?))
    }

    pub fn settings(&self) -> &FabricSettings {
        &self.settings
    }

    /// Orchestrator talking to the configured switch over REST
    pub fn orchestrator(&self) -> Result<ZoningOrchestrator> {
        let client = HttpFabricClient::new(&self.settings)?;
        ZoningOrchestrator::from_settings(&self.settings, Arc::new(client), Arc::new(StdinConfirm))
    }
}
