//! Fabric connection settings
//!
//! Layered with the `config` crate: built-in defaults, an optional settings
//! file, `FABRIC_*` environment variables, then command-line overrides.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use fczone_core::{ConfigError, Result, ZoneError};

/// Environment variable prefix, e.g. `FABRIC_ADDRESS`
pub const ENV_PREFIX: &str = "FABRIC";

/// Transport scheme for the fabric REST interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// Immutable fabric settings handed to the orchestrator at construction
#[derive(Clone, Deserialize)]
pub struct FabricSettings {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub scheme: Scheme,
    /// Verify the switch certificate (switches commonly ship self-signed ones)
    pub verify_tls: bool,
    pub timeout_secs: u64,
    /// Delay between consecutive destructive calls in batch mode
    pub pacing_ms: u64,
    /// Commit without asking for confirmation
    pub override_confirm: bool,
}

/// Values given on the command line; they win over every other source
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub override_confirm: bool,
}

fn settings_error(err: config::ConfigError) -> ZoneError {
    ConfigError::Settings {
        message: err.to_string(),
    }
    .into()
}

impl FabricSettings {
    /// Load settings from defaults, `file`, the environment and `overrides`
    pub fn load(file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let env = Environment::with_prefix(ENV_PREFIX).try_parsing(true);
        Self::build(file, Some(env), overrides)
    }

    fn build(
        file: Option<&Path>,
        env: Option<Environment>,
        overrides: &SettingsOverrides,
    ) -> Result<Self> {
        let mut builder = Self::defaults().map_err(settings_error)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        builder = Self::apply_overrides(builder, overrides).map_err(settings_error)?;

        let settings: FabricSettings = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(settings_error)?;

        log::debug!("Loaded fabric settings: {:?}", settings);
        Ok(settings)
    }

    fn defaults() -> std::result::Result<ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        Config::builder()
            .set_default("scheme", "https")?
            .set_default("verify_tls", false)?
            .set_default("timeout_secs", 30_i64)?
            .set_default("pacing_ms", 1100_i64)?
            .set_default("override_confirm", false)
    }

    fn apply_overrides(
        builder: ConfigBuilder<config::builder::DefaultState>,
        overrides: &SettingsOverrides,
    ) -> std::result::Result<ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        let mut builder = builder
            .set_override_option("address", overrides.address.clone())?
            .set_override_option("username", overrides.username.clone())?
            .set_override_option("password", overrides.password.clone())?;

        if overrides.insecure {
            builder = builder.set_override("scheme", "http")?;
        }
        if overrides.override_confirm {
            builder = builder.set_override("override_confirm", true)?;
        }
        Ok(builder)
    }

    /// REST base URL, `<scheme>://<address>/rest/`
    pub fn base_url(&self) -> Result<String> {
        let address = required(&self.address, "address")?;
        Ok(format!("{}://{}/rest/", self.scheme.as_str(), address))
    }

    /// Username and password for login
    pub fn credentials(&self) -> Result<(&str, &str)> {
        Ok((
            required(&self.username, "username")?,
            required(&self.password, "password")?,
        ))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Settings {
            message: format!(
                "fabric {} is not set (use --{} or {}_{})",
                name,
                name,
                ENV_PREFIX,
                name.to_uppercase()
            ),
        }
        .into()),
    }
}

impl fmt::Debug for FabricSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FabricSettings")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("scheme", &self.scheme)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("pacing_ms", &self.pacing_ms)
            .field("override_confirm", &self.override_confirm)
            .finish()
    }
}
