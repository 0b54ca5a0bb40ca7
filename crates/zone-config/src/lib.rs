//! Fabric zoning configuration
//!
//! Loading of defined/effective configuration documents, deletion request
//! lists, snapshot files and the layered fabric connection settings.

pub mod loader;
pub mod request;
pub mod settings;
pub mod snapshot;

pub use loader::{
    load_defined, load_effective, parse_defined, parse_effective, read_document, unwrap_envelope,
};
pub use request::{parse_identifiers, read_identifier_list, read_identifier_set};
pub use settings::{FabricSettings, Scheme, SettingsOverrides};
pub use snapshot::{default_snapshot_path, write_snapshot};
