//! Configuration document loading
//!
//! Documents come either from a snapshot file or from a fabric response and
//! may be wrapped in a top-level `"Response"` envelope.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use fczone_core::{
    Alias, Cfg, ConfigError, DefinedConfiguration, EffectiveConfiguration, Result, Zone,
    ZoneError,
};

/// Envelope key used by fabric responses
pub const ENVELOPE_KEY: &str = "Response";
pub const DEFINED_KEY: &str = "defined-configuration";
pub const EFFECTIVE_KEY: &str = "effective-configuration";

#[derive(Debug, Deserialize)]
struct DefinedDocument {
    #[serde(default)]
    alias: Vec<Alias>,
    #[serde(default)]
    zone: Vec<Zone>,
    #[serde(default)]
    cfg: Vec<Cfg>,
}

/// Strip the `"Response"` envelope if present, else return the document as-is
pub fn unwrap_envelope(document: Value) -> Value {
    match document {
        Value::Object(mut map) => match map.remove(ENVELOPE_KEY) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

fn envelope_body(document: &Value) -> &Value {
    document.get(ENVELOPE_KEY).unwrap_or(document)
}

/// Read a JSON document from disk and strip its envelope
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let document: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::Malformed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    log::debug!("Loaded configuration document from {}", path.display());
    Ok(unwrap_envelope(document))
}

/// Parse the defined configuration section of a document
pub fn parse_defined(document: &Value) -> Result<DefinedConfiguration> {
    let section = envelope_body(document)
        .get(DEFINED_KEY)
        .ok_or_else(|| ZoneError::missing_key(DEFINED_KEY))?;

    let raw = DefinedDocument::deserialize(section).map_err(|e| ConfigError::Malformed {
        path: DEFINED_KEY.to_string(),
        message: e.to_string(),
    })?;

    let defined = DefinedConfiguration::from_parts(raw.alias, raw.zone, raw.cfg)?;
    log::debug!(
        "Parsed defined configuration: {} aliases, {} zones, {} cfgs",
        defined.aliases.len(),
        defined.zones.len(),
        defined.cfgs.len()
    );
    Ok(defined)
}

/// Parse the effective configuration section of a document
pub fn parse_effective(document: &Value) -> Result<EffectiveConfiguration> {
    let section = envelope_body(document)
        .get(EFFECTIVE_KEY)
        .ok_or_else(|| ZoneError::missing_key(EFFECTIVE_KEY))?;

    if section.get("checksum").is_none() {
        return Err(ZoneError::missing_key(format!("{}.checksum", EFFECTIVE_KEY)));
    }

    let effective =
        EffectiveConfiguration::deserialize(section).map_err(|e| ConfigError::Malformed {
            path: EFFECTIVE_KEY.to_string(),
            message: e.to_string(),
        })?;

    log::debug!(
        "Parsed effective configuration {:?}: {} enabled zones",
        effective.cfg_name,
        effective.enabled_zones.len()
    );
    Ok(effective)
}

/// Load and parse a defined configuration snapshot file
pub fn load_defined<P: AsRef<Path>>(path: P) -> Result<DefinedConfiguration> {
    parse_defined(&read_document(path)?)
}

/// Load and parse an effective configuration snapshot file
pub fn load_effective<P: AsRef<Path>>(path: P) -> Result<EffectiveConfiguration> {
    parse_effective(&read_document(path)?)
}
