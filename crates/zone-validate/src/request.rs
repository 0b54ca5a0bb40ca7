//! Deletion requests

use std::collections::BTreeSet;

/// WWNs and zones an operator wants removed from the fabric
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionRequest {
    pub wwns: BTreeSet<String>,
    pub zones: BTreeSet<String>,
}

impl DeletionRequest {
    pub fn new<W, Z>(wwns: W, zones: Z) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        Z: IntoIterator,
        Z::Item: Into<String>,
    {
        Self {
            wwns: wwns.into_iter().map(Into::into).collect(),
            zones: zones.into_iter().map(Into::into).collect(),
        }
    }

    /// Request that only names WWNs
    pub fn for_wwns<W>(wwns: W) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self::new(wwns, std::iter::empty::<String>())
    }

    pub fn is_empty(&self) -> bool {
        self.wwns.is_empty() && self.zones.is_empty()
    }
}
