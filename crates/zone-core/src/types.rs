//! Zoning configuration model
//!
//! Typed view of the defined and effective configuration documents. Field
//! names follow the fabric's JSON keys so that an object read from a snapshot
//! serializes back to the body the fabric accepts on create.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ConfigError;

/// Namespace of an object in the defined configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Alias,
    Zone,
    Cfg,
}

impl ObjectKind {
    /// Resolution priority: the first namespace holding a name wins
    pub const PRECEDENCE: [ObjectKind; 3] = [ObjectKind::Alias, ObjectKind::Zone, ObjectKind::Cfg];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Alias => "alias",
            ObjectKind::Zone => "zone",
            ObjectKind::Cfg => "cfg",
        }
    }

    /// Resource key below the defined configuration, e.g. `alias/alias-name/host1`
    pub fn resource_key(&self, name: &str) -> String {
        format!("{0}/{0}-name/{1}", self.as_str(), name)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alias: a named group of WWNs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    #[serde(rename = "alias-name")]
    pub name: String,
    #[serde(rename = "member-entry", default)]
    pub members: AliasMembers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasMembers {
    #[serde(rename = "alias-entry-name", default)]
    pub entries: Vec<String>,
}

impl Alias {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members: AliasMembers { entries: members },
        }
    }

    /// Object body as accepted by the fabric on create
    pub fn payload(&self) -> Value {
        json!({ "member-entry": self.members })
    }
}

/// Zone type as encoded by the fabric (`0` standard, `1` peer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ZoneType {
    Standard,
    Peer,
    /// Any other code; kept verbatim, never tagged in the cross-reference
    Other(u8),
}

impl From<u8> for ZoneType {
    fn from(code: u8) -> Self {
        match code {
            0 => ZoneType::Standard,
            1 => ZoneType::Peer,
            other => ZoneType::Other(other),
        }
    }
}

impl From<ZoneType> for u8 {
    fn from(zone_type: ZoneType) -> Self {
        match zone_type {
            ZoneType::Standard => 0,
            ZoneType::Peer => 1,
            ZoneType::Other(code) => code,
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneType::Standard => write!(f, "standard"),
            ZoneType::Peer => write!(f, "peer"),
            ZoneType::Other(code) => write!(f, "type-{}", code),
        }
    }
}

/// Partitioned zone membership. Either list may be absent in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMembers {
    #[serde(rename = "entry-name", default, skip_serializing_if = "Vec::is_empty")]
    pub entry_names: Vec<String>,
    #[serde(
        rename = "principal-entry-name",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub principal_entry_names: Vec<String>,
}

impl ZoneMembers {
    /// Every member reference, entries first then principals
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.entry_names
            .iter()
            .chain(self.principal_entry_names.iter())
            .map(String::as_str)
    }
}

/// Zone: a named access-control group of WWNs and alias references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "zone-name")]
    pub name: String,
    #[serde(rename = "zone-type")]
    pub zone_type: ZoneType,
    #[serde(rename = "member-entry", default)]
    pub members: ZoneMembers,
}

/// Member counts of a single zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberCounts {
    pub member: usize,
    pub principal: usize,
    pub non_principal: usize,
}

impl Zone {
    pub fn standard(name: impl Into<String>, entries: Vec<String>) -> Self {
        Self {
            name: name.into(),
            zone_type: ZoneType::Standard,
            members: ZoneMembers {
                entry_names: entries,
                principal_entry_names: Vec::new(),
            },
        }
    }

    pub fn peer(name: impl Into<String>, principals: Vec<String>, entries: Vec<String>) -> Self {
        Self {
            name: name.into(),
            zone_type: ZoneType::Peer,
            members: ZoneMembers {
                entry_names: entries,
                principal_entry_names: principals,
            },
        }
    }

    /// Standard zones only have plain members; peer zones only principal and
    /// non-principal members.
    pub fn member_counts(&self) -> MemberCounts {
        match self.zone_type {
            ZoneType::Standard => MemberCounts {
                member: self.members.entry_names.len(),
                ..MemberCounts::default()
            },
            ZoneType::Peer => MemberCounts {
                member: 0,
                principal: self.members.principal_entry_names.len(),
                non_principal: self.members.entry_names.len(),
            },
            ZoneType::Other(_) => MemberCounts::default(),
        }
    }

    pub fn payload(&self) -> Value {
        json!({
            "member-entry": self.members,
            "zone-type": self.zone_type,
        })
    }
}

/// Cfg: a named set of zones that can be made effective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cfg {
    #[serde(rename = "cfg-name")]
    pub name: String,
    #[serde(rename = "member-zone", default)]
    pub members: CfgMembers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgMembers {
    #[serde(rename = "zone-name", default)]
    pub zone_names: Vec<String>,
}

impl Cfg {
    pub fn new(name: impl Into<String>, zones: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members: CfgMembers { zone_names: zones },
        }
    }

    pub fn payload(&self) -> Value {
        json!({ "member-zone": self.members })
    }
}

/// The administrator's editable catalog of aliases, zones and cfgs.
///
/// Each namespace is keyed by name and keeps the order of the source
/// document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinedConfiguration {
    pub aliases: IndexMap<String, Alias>,
    pub zones: IndexMap<String, Zone>,
    pub cfgs: IndexMap<String, Cfg>,
}

impl DefinedConfiguration {
    /// Build from document lists, rejecting duplicate names within a namespace
    pub fn from_parts(
        aliases: Vec<Alias>,
        zones: Vec<Zone>,
        cfgs: Vec<Cfg>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            aliases: keyed(ObjectKind::Alias, aliases, |a| &a.name)?,
            zones: keyed(ObjectKind::Zone, zones, |z| &z.name)?,
            cfgs: keyed(ObjectKind::Cfg, cfgs, |c| &c.name)?,
        })
    }

    pub fn has_zone(&self, name: &str) -> bool {
        self.zones.contains_key(name)
    }

    pub fn zone_names(&self) -> BTreeSet<&str> {
        self.zones.keys().map(String::as_str).collect()
    }

    /// Whether `name` exists in the given namespace
    pub fn contains(&self, kind: ObjectKind, name: &str) -> bool {
        match kind {
            ObjectKind::Alias => self.aliases.contains_key(name),
            ObjectKind::Zone => self.zones.contains_key(name),
            ObjectKind::Cfg => self.cfgs.contains_key(name),
        }
    }

    /// Create body of the named object in the given namespace
    pub fn payload(&self, kind: ObjectKind, name: &str) -> Option<Value> {
        match kind {
            ObjectKind::Alias => self.aliases.get(name).map(Alias::payload),
            ObjectKind::Zone => self.zones.get(name).map(Zone::payload),
            ObjectKind::Cfg => self.cfgs.get(name).map(Cfg::payload),
        }
    }
}

fn keyed<T>(
    kind: ObjectKind,
    items: Vec<T>,
    name_of: impl Fn(&T) -> &String,
) -> Result<IndexMap<String, T>, ConfigError> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let name = name_of(&item).clone();
        if map.contains_key(&name) {
            return Err(ConfigError::DuplicateName { kind, name });
        }
        map.insert(name, item);
    }
    Ok(map)
}

/// A zone in the effective configuration, resolved to member WWNs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledZone {
    #[serde(rename = "zone-name")]
    pub name: String,
    #[serde(rename = "zone-type", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<ZoneType>,
    #[serde(rename = "member-entry", default)]
    pub members: ZoneMembers,
}

/// The currently enforced zoning state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfiguration {
    #[serde(rename = "cfg-name", default, skip_serializing_if = "Option::is_none")]
    pub cfg_name: Option<String>,
    /// Opaque freshness token; must be read right before a commit
    pub checksum: String,
    #[serde(rename = "enabled-zone", default)]
    pub enabled_zones: Vec<EnabledZone>,
}

impl EffectiveConfiguration {
    pub fn enabled_zone_names(&self) -> BTreeSet<&str> {
        self.enabled_zones.iter().map(|z| z.name.as_str()).collect()
    }

    /// Every WWN referenced by an enabled zone, principal or not
    pub fn active_wwns(&self) -> BTreeSet<&str> {
        self.enabled_zones
            .iter()
            .flat_map(|z| z.members.all())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_type_codes() {
        assert_eq!(ZoneType::from(0), ZoneType::Standard);
        assert_eq!(ZoneType::from(1), ZoneType::Peer);
        assert_eq!(ZoneType::from(2), ZoneType::Other(2));
        assert_eq!(u8::from(ZoneType::Other(2)), 2);
    }

    #[test]
    fn test_resource_key() {
        assert_eq!(ObjectKind::Alias.resource_key("Host1"), "alias/alias-name/Host1");
        assert_eq!(ObjectKind::Cfg.resource_key("prod"), "cfg/cfg-name/prod");
    }

    #[test]
    fn test_zone_payload_keeps_zone_type_code() {
        let zone = Zone::peer(
            "pz1",
            vec!["target1".to_string()],
            vec!["host1".to_string(), "host2".to_string()],
        );

        let payload = zone.payload();
        assert_eq!(payload["zone-type"], 1);
        assert_eq!(payload["member-entry"]["principal-entry-name"][0], "target1");
        assert_eq!(payload["member-entry"]["entry-name"][1], "host2");
    }

    #[test]
    fn test_standard_zone_payload_omits_principals() {
        let zone = Zone::standard("z1", vec!["host1".to_string()]);
        let payload = zone.payload();
        assert!(payload["member-entry"].get("principal-entry-name").is_none());
        assert_eq!(payload["zone-type"], 0);
    }

    #[test]
    fn test_alias_and_cfg_payload() {
        let alias = Alias::new("Host1", vec!["10:00:00:00:00:00:00:01".to_string()]);
        assert_eq!(
            alias.payload(),
            json!({"member-entry": {"alias-entry-name": ["10:00:00:00:00:00:00:01"]}})
        );

        let cfg = Cfg::new("prod", vec!["z1".to_string(), "z2".to_string()]);
        assert_eq!(cfg.payload(), json!({"member-zone": {"zone-name": ["z1", "z2"]}}));
    }

    #[test]
    fn test_member_counts() {
        let standard = Zone::standard("z1", vec!["a".into(), "b".into()]);
        assert_eq!(
            standard.member_counts(),
            MemberCounts {
                member: 2,
                principal: 0,
                non_principal: 0
            }
        );

        let peer = Zone::peer("pz", vec!["t".into()], vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(
            peer.member_counts(),
            MemberCounts {
                member: 0,
                principal: 1,
                non_principal: 3
            }
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = DefinedConfiguration::from_parts(
            vec![Alias::new("a", vec![]), Alias::new("a", vec![])],
            vec![],
            vec![],
        );
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateName { kind: ObjectKind::Alias, ref name }) if name == "a"
        ));
    }

    #[test]
    fn test_same_name_across_namespaces_allowed() {
        let defined = DefinedConfiguration::from_parts(
            vec![Alias::new("Dup", vec![])],
            vec![Zone::standard("Dup", vec![])],
            vec![],
        )
        .unwrap();
        assert!(defined.contains(ObjectKind::Alias, "Dup"));
        assert!(defined.contains(ObjectKind::Zone, "Dup"));
        assert!(!defined.contains(ObjectKind::Cfg, "Dup"));
    }

    #[test]
    fn test_active_wwns_include_principals() {
        let effective = EffectiveConfiguration {
            cfg_name: Some("prod".to_string()),
            checksum: "abc".to_string(),
            enabled_zones: vec![EnabledZone {
                name: "pz".to_string(),
                zone_type: Some(ZoneType::Peer),
                members: ZoneMembers {
                    entry_names: vec!["10:00:00:00:00:00:00:01".to_string()],
                    principal_entry_names: vec!["20:00:00:00:00:00:00:01".to_string()],
                },
            }],
        };

        let wwns = effective.active_wwns();
        assert_eq!(wwns.len(), 2);
        assert!(wwns.contains("20:00:00:00:00:00:00:01"));
        assert_eq!(effective.enabled_zone_names().into_iter().collect::<Vec<_>>(), vec!["pz"]);
    }
}
