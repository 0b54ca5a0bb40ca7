//! Cross-reference index between WWNs, aliases and zones
//!
//! The index is derived from a [`DefinedConfiguration`] and is always rebuilt
//! from scratch; there is no incremental update path. The maps are hash maps
//! and their iteration order carries no meaning; every listing meant for an
//! operator goes through one of the `sorted_*` helpers.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use crate::types::{DefinedConfiguration, ZoneType};

/// Role of a member reference inside a zone.
///
/// Variant order matches the sort order of the rendered tags (`<M>`, `<N>`, `<P>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MemberRole {
    /// Member of a standard zone
    Member,
    /// `entry-name` member of a peer zone
    NonPrincipal,
    /// `principal-entry-name` member of a peer zone
    Principal,
}

impl MemberRole {
    pub fn tag(&self) -> &'static str {
        match self {
            MemberRole::Member => "<M>",
            MemberRole::NonPrincipal => "<N>",
            MemberRole::Principal => "<P>",
        }
    }
}

/// One zone a reference belongs to, with its role there
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ZoneMembership {
    pub role: MemberRole,
    pub zone: String,
}

impl fmt::Display for ZoneMembership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.role.tag(), self.zone)
    }
}

/// Read-only lookup tables derived from a defined configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossReferenceIndex {
    alias_to_wwn: HashMap<String, Vec<String>>,
    wwn_to_alias: HashMap<String, Vec<String>>,
    member_roles: HashMap<String, BTreeSet<ZoneMembership>>,
}

impl CrossReferenceIndex {
    /// Build all indexes from a defined configuration. Pure and deterministic.
    pub fn build(defined: &DefinedConfiguration) -> Self {
        let mut alias_to_wwn = HashMap::with_capacity(defined.aliases.len());
        let mut wwn_to_alias: HashMap<String, Vec<String>> = HashMap::new();

        // Aliases are walked in document order so that a WWN shared by several
        // aliases lists them in the order they were encountered.
        for (name, alias) in &defined.aliases {
            alias_to_wwn.insert(name.clone(), alias.members.entries.clone());
            for wwn in &alias.members.entries {
                wwn_to_alias
                    .entry(wwn.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        let mut member_roles: HashMap<String, BTreeSet<ZoneMembership>> = HashMap::new();
        let mut tag = |reference: &str, zone: &str, role: MemberRole| {
            member_roles
                .entry(reference.to_string())
                .or_default()
                .insert(ZoneMembership {
                    role,
                    zone: zone.to_string(),
                });
        };

        for zone in defined.zones.values() {
            match zone.zone_type {
                ZoneType::Standard => {
                    for entry in &zone.members.entry_names {
                        tag(entry, &zone.name, MemberRole::Member);
                    }
                }
                ZoneType::Peer => {
                    for entry in &zone.members.principal_entry_names {
                        tag(entry, &zone.name, MemberRole::Principal);
                    }
                    for entry in &zone.members.entry_names {
                        tag(entry, &zone.name, MemberRole::NonPrincipal);
                    }
                }
                ZoneType::Other(code) => {
                    log::debug!("Zone {} has untagged zone type {}", zone.name, code);
                }
            }
        }

        log::debug!(
            "Built cross-reference: {} aliases, {} WWNs, {} zone members",
            alias_to_wwn.len(),
            wwn_to_alias.len(),
            member_roles.len()
        );

        Self {
            alias_to_wwn,
            wwn_to_alias,
            member_roles,
        }
    }

    /// Member WWNs of an alias, in source order
    pub fn wwns_of(&self, alias: &str) -> Option<&[String]> {
        self.alias_to_wwn.get(alias).map(Vec::as_slice)
    }

    /// Aliases referencing a WWN, in the order the aliases were encountered
    pub fn aliases_of(&self, wwn: &str) -> Option<&[String]> {
        self.wwn_to_alias.get(wwn).map(Vec::as_slice)
    }

    pub fn has_alias_for(&self, wwn: &str) -> bool {
        self.wwn_to_alias.contains_key(wwn)
    }

    /// Zones a WWN or alias reference is a member of
    pub fn memberships_of(&self, reference: &str) -> Option<&BTreeSet<ZoneMembership>> {
        self.member_roles.get(reference)
    }

    pub fn alias_to_wwn(&self) -> &HashMap<String, Vec<String>> {
        &self.alias_to_wwn
    }

    pub fn wwn_to_alias(&self) -> &HashMap<String, Vec<String>> {
        &self.wwn_to_alias
    }

    pub fn member_roles(&self) -> &HashMap<String, BTreeSet<ZoneMembership>> {
        &self.member_roles
    }

    /// Union of the aliases of every WWN given, deduplicated and sorted.
    /// WWNs without an alias contribute nothing.
    pub fn aliases_for_wwns<'a, I>(&self, wwns: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut aliases = BTreeSet::new();
        for wwn in wwns {
            if let Some(names) = self.wwn_to_alias.get(wwn) {
                aliases.extend(names.iter().cloned());
            }
        }
        aliases.into_iter().collect()
    }

    /// WWNs referenced by more than one alias, sorted. The index keeps every
    /// alias; picking one of them is left to the operator.
    pub fn ambiguous_wwns(&self) -> Vec<(&str, &[String])> {
        let mut ambiguous: Vec<(&str, &[String])> = self
            .wwn_to_alias
            .iter()
            .filter(|(_, aliases)| aliases.len() > 1)
            .map(|(wwn, aliases)| (wwn.as_str(), aliases.as_slice()))
            .collect();
        ambiguous.sort_by(|a, b| a.0.cmp(b.0));
        ambiguous
    }

    /// Zone member references with their memberships, sorted by reference
    pub fn sorted_memberships(&self) -> Vec<(&str, &BTreeSet<ZoneMembership>)> {
        let mut entries: Vec<_> = self
            .member_roles
            .iter()
            .map(|(reference, roles)| (reference.as_str(), roles))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Zone member references starting with `prefix`, sorted
    pub fn select_by_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut selected: Vec<&str> = self
            .member_roles
            .keys()
            .filter(|reference| reference.starts_with(prefix))
            .map(String::as_str)
            .collect();
        selected.sort_unstable();
        selected
    }
}
