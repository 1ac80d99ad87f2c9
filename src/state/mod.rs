//! Shared application state: the JSON document every surface reads and writes, the character
//! state channel consumed by the renderer, and the daily note log.
//!
//! All document mutations funnel through [actor::DocumentActor] so that the tracker and the
//! HTTP API can never lose each other's updates.

pub mod actor;
pub mod character;
pub mod document;
pub mod notes;
pub mod store;

use thiserror::Error;

/// Errors surfaced by state operations. `Validation` and `NotFound` map to caller mistakes,
/// everything else is an internal failure.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("document io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("state service is unavailable")]
    ServiceClosed,
}
