//! Object resolution and change planning

use serde::Serialize;
use serde_json::Value;

use fczone_core::{DefinedConfiguration, ObjectKind, Result, ZoneError};

/// Delete/recreate plan for one object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePlan {
    /// Namespace holding the object
    pub kind: ObjectKind,
    pub name: String,
    /// Resource key below the defined configuration
    pub resource_key: String,
    /// Object body before the change, enough to recreate it verbatim
    pub prior_payload: Value,
}

/// Finds which namespace of a defined configuration holds a name
pub struct ObjectResolver<'a> {
    defined: &'a DefinedConfiguration,
}

impl<'a> ObjectResolver<'a> {
    pub fn new(defined: &'a DefinedConfiguration) -> Self {
        Self { defined }
    }

    /// First namespace, in alias > zone > cfg order, containing `name`
    pub fn resolve(&self, name: &str) -> Option<ObjectKind> {
        ObjectKind::PRECEDENCE
            .into_iter()
            .find(|kind| self.defined.contains(*kind, name))
    }

    /// Plan for `name`, or `ZoneError::ObjectNotFound`
    pub fn plan(&self, name: &str) -> Result<ChangePlan> {
        let not_found = || ZoneError::ObjectNotFound {
            name: name.to_string(),
        };

        let kind = self.resolve(name).ok_or_else(not_found)?;
        let prior_payload = self.defined.payload(kind, name).ok_or_else(not_found)?;

        log::debug!("Resolved {} to {}", name, kind);
        Ok(ChangePlan {
            kind,
            name: name.to_string(),
            resource_key: kind.resource_key(name),
            prior_payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fczone_core::{Alias, Cfg, Zone};
    use serde_json::json;

    fn defined() -> DefinedConfiguration {
        DefinedConfiguration::from_parts(
            vec![
                Alias::new("Dup", vec!["10:00:00:00:00:00:00:01".to_string()]),
                Alias::new("Host1", vec!["10:00:00:00:00:00:00:02".to_string()]),
            ],
            vec![
                Zone::standard("Dup", vec!["Host1".to_string()]),
                Zone::peer(
                    "PeerZone",
                    vec!["Array1".to_string()],
                    vec!["Host1".to_string()],
                ),
            ],
            vec![Cfg::new("prod", vec!["PeerZone".to_string()])],
        )
        .unwrap()
    }

    #[test]
    fn test_alias_wins_name_collision() {
        let defined = defined();
        let plan = ObjectResolver::new(&defined).plan("Dup").unwrap();

        assert_eq!(plan.kind, ObjectKind::Alias);
        assert_eq!(plan.resource_key, "alias/alias-name/Dup");
        assert_eq!(
            plan.prior_payload,
            json!({"member-entry": {"alias-entry-name": ["10:00:00:00:00:00:00:01"]}})
        );
    }

    #[test]
    fn test_zone_and_cfg_plans() {
        let defined = defined();
        let resolver = ObjectResolver::new(&defined);

        let zone = resolver.plan("PeerZone").unwrap();
        assert_eq!(zone.kind, ObjectKind::Zone);
        assert_eq!(
            zone.prior_payload,
            json!({
                "member-entry": {"entry-name": ["Host1"], "principal-entry-name": ["Array1"]},
                "zone-type": 1
            })
        );

        let cfg = resolver.plan("prod").unwrap();
        assert_eq!(cfg.kind, ObjectKind::Cfg);
        assert_eq!(cfg.resource_key, "cfg/cfg-name/prod");
        assert_eq!(cfg.prior_payload, json!({"member-zone": {"zone-name": ["PeerZone"]}}));
    }

    #[test]
    fn test_unknown_name() {
        let defined = defined();
        let resolver = ObjectResolver::new(&defined);

        assert_eq!(resolver.resolve("Ghost"), None);
        match resolver.plan("Ghost") {
            Err(ZoneError::ObjectNotFound { name }) => assert_eq!(name, "Ghost"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
