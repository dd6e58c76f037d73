//! Classification of transport failures into [`FaultKind`]s.
//!
//! This is the only place a [`TransportError`] is inspected. Every failure that crosses the
//! record client boundary has been through [`translate`], which keeps the lower-level diagnostic
//! as the error message and nothing more.

use crate::error::{ClientError, FaultKind, Operation, TransportError};

/// Step of the pipeline during which a failure was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opening the runtime, obtaining the root context, looking the name up.
    Resolve,
    /// Checking the resolved object against the expected interface.
    Bind,
    /// Calling an operation on the bound service.
    Invoke,
}

/// Fault kind for `error` observed during `phase` of `operation`.
///
/// Only `getMedicalRecord` can report an unknown record as `NotFound`; the other operations
/// surface it as `RemoteFault`.
pub fn classify(phase: Phase, operation: Operation, error: &TransportError) -> FaultKind {
    use TransportError::*;

    match phase {
        Phase::Resolve => match error {
            NameNotFound(_) | InvalidName(_) | ObjectNotExist(_) => FaultKind::NotFound,
            _ => FaultKind::DirectoryUnavailable,
        },
        Phase::Bind => match error {
            ObjectNotExist(_) => FaultKind::NotFound,
            _ => FaultKind::RemoteFault,
        },
        Phase::Invoke => match (operation, error) {
            (Operation::GetMedicalRecord, RecordNotFound(_)) => FaultKind::NotFound,
            _ => FaultKind::RemoteFault,
        },
    }
}

/// Convert a transport failure into the client error for `operation` on `target`.
pub fn translate(
    phase: Phase,
    operation: Operation,
    target: &str,
    error: TransportError,
) -> ClientError {
    let kind = classify(phase, operation, &error);
    tracing::warn!(%operation, subject = target, ?phase, %kind, "remote call failed: {}", error);
    ClientError::new(kind, operation, target, error.to_string())
}

/// The runtime came up but reported no root naming context.
pub fn directory_absent(target: &str, authority: &str) -> ClientError {
    tracing::warn!(subject = target, authority, "no root naming context");
    ClientError::new(
        FaultKind::DirectoryUnavailable,
        Operation::Connect,
        target,
        format!("no root naming context at {}", authority),
    )
}

/// The name resolved, but not to a record service.
pub fn type_mismatch(target: &str, repository_id: &str) -> ClientError {
    tracing::warn!(subject = target, repository_id, "resolved object failed the interface check");
    ClientError::new(
        FaultKind::TypeMismatch,
        Operation::Connect,
        target,
        format!("object does not implement {}", repository_id),
    )
}
