use std::time::Duration;

use thiserror::Error;

use crate::capability::Capability;

/// Failure of an external classifier capability.
///
/// These never escape the pipeline: each component maps them onto its
/// documented fallback.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("{capability} unavailable: {reason}")]
    Unavailable {
        capability: Capability,
        reason: String,
    },

    #[error("{capability} timed out after {}ms", .after.as_millis())]
    Timeout {
        capability: Capability,
        after: Duration,
    },

    #[error("{capability} request failed: {reason}")]
    Request {
        capability: Capability,
        reason: String,
    },

    #[error("{capability} returned a malformed response: {reason}")]
    MalformedResponse {
        capability: Capability,
        reason: String,
    },
}

/// A document the content source could not produce.
#[derive(Debug, Error)]
#[error("document {id} unavailable: {reason}")]
pub struct SourceError {
    pub id: String,
    pub reason: String,
}

impl SourceError {
    #[must_use]
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
