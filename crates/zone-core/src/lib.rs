//! Fabric zoning core
//!
//! Configuration model, error taxonomy and the WWN / alias / zone
//! cross-reference index.

pub mod error;
pub mod types;
pub mod wwn;
pub mod xref;

pub use error::{ApplyError, AuthError, ConfigError, ValidationError, ZoneError};
pub use types::*;
pub use wwn::is_wwn;
pub use xref::{CrossReferenceIndex, MemberRole, ZoneMembership};

/// Result type for zoning operations
pub type Result<T> = std::result::Result<T, ZoneError>;
