//! Error types
//!
//! Delivery failure is never an error here: `send` paths report failure
//! in-band as [`crate::types::SendMessageResult`]. The only fallible seam
//! is the verification store, whose backends may have real I/O failures.

use thiserror::Error;

/// Verification store backend errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage backend itself failed (connection loss, serialization)
    #[error("verification store error: {0}")]
    Backend(String),
}
