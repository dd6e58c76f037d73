//! Identifier utilities for the DME client.
//!
//! The record service accepts client-proposed identifiers for new consultations. They must be
//! unique across clients and sort in creation order, so this crate provides:
//! - [`UuidService`]: a UUID in canonical form (32 lowercase hex characters, no hyphens).
//! - [`TimestampUuid`]: a millisecond timestamp prefix plus a canonical UUID, generated
//!   monotonically against the previously issued value.
//!
//! Example timestamp identifier: `20260111T143522.045Z-550e8400e29b41d4a716446655440000`

mod service;

pub use service::{TimestampUuid, Uuid, UuidService};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
