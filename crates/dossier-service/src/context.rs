//! Request context carrying the acting caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dossier_core::types::ActorId;

/// Context for the current request.
///
/// Built by the caller-side guard after authentication and passed into every
/// mutating service method so the engine knows *who* is acting. The engine
/// records the actor as provenance and performs no authorization itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's identity.
    pub actor: ActorId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor: impl Into<ActorId>) -> Self {
        Self {
            actor: actor.into(),
            request_time: Utc::now(),
        }
    }

    /// Context for work the system performs on its own behalf (seeding,
    /// scheduled repair).
    pub fn system() -> Self {
        Self::new("system")
    }
}
