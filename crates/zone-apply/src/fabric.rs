//! Fabric zoning service interface

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use fczone_config::FabricSettings;
use fczone_core::{ObjectKind, Result};

/// Login credentials for the fabric
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_settings(settings: &FabricSettings) -> Result<Self> {
        let (username, password) = settings.credentials()?;
        Ok(Self::new(username, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated session handle
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Terminal state of a delete call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The object was already absent
    NotFound,
}

/// Remote zoning operations. Configuration documents are returned with their
/// `"Response"` envelope removed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FabricZoningService: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken>;

    async fn fetch_defined_configuration(&self, session: &SessionToken) -> Result<Value>;

    async fn fetch_effective_configuration(&self, session: &SessionToken) -> Result<Value>;

    async fn delete_object(
        &self,
        session: &SessionToken,
        kind: ObjectKind,
        name: &str,
    ) -> Result<DeleteOutcome>;

    async fn create_object(
        &self,
        session: &SessionToken,
        kind: ObjectKind,
        name: &str,
        payload: &Value,
    ) -> Result<()>;

    async fn commit(&self, session: &SessionToken, checksum: &str) -> Result<()>;

    async fn release(&self, session: &SessionToken) -> Result<()>;
}
