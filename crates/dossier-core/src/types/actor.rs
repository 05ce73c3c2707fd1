//! Opaque caller identity recorded as provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the caller performing a mutation.
///
/// Issued by the identity collaborator; the namespace never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap an identity-provider subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// The raw subject string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(subject: &str) -> Self {
        Self::new(subject)
    }
}
