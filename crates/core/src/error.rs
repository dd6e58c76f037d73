use std::fmt;
use std::time::Duration;

/// Failures raised by a transport implementation.
///
/// These mirror the system and user exceptions of a remote-object runtime. They never leave the
/// facade as-is; [`crate::faults`] classifies them into a [`ClientError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("transport initialisation failed: {0}")]
    Init(String),
    #[error("communication failure: {0}")]
    CommFailure(String),
    #[error("transient failure: {0}")]
    Transient(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("object does not exist: {0}")]
    ObjectNotExist(String),
    #[error("name not found: {0}")]
    NameNotFound(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("bad parameter: {0}")]
    BadParam(String),
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("remote application error: {0}")]
    Application(String),
    #[error("marshalling error: {0}")]
    Marshal(String),
}

impl TransportError {
    /// True when the failure means the connection itself can no longer be trusted.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            TransportError::CommFailure(_)
                | TransportError::Transient(_)
                | TransportError::Timeout(_)
                | TransportError::ObjectNotExist(_)
        )
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Domain-level failure classes surfaced by the record client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The directory could not be reached or has no root context.
    DirectoryUnavailable,
    /// The service name or the patient is unknown.
    NotFound,
    /// The name resolved to an object that does not implement the record service.
    TypeMismatch,
    /// An operation was attempted before a successful `connect()`.
    NotConnected,
    /// Input rejected locally; no remote call was made.
    InvalidArgument,
    /// Any other remote or transport failure during an operation.
    RemoteFault,
}

impl FaultKind {
    /// Whether retrying (after reconnecting, for `RemoteFault`) can succeed without the caller
    /// changing anything.
    pub fn is_retryable(self) -> bool {
        matches!(self, FaultKind::DirectoryUnavailable | FaultKind::RemoteFault)
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FaultKind::DirectoryUnavailable => "directory unavailable",
            FaultKind::NotFound => "not found",
            FaultKind::TypeMismatch => "type mismatch",
            FaultKind::NotConnected => "not connected",
            FaultKind::InvalidArgument => "invalid argument",
            FaultKind::RemoteFault => "remote fault",
        };
        f.write_str(label)
    }
}

/// Client operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    GetMedicalRecord,
    UpdateMedicalRecord,
    AddConsultation,
    GetAllPatientIds,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Connect => "connect",
            Operation::GetMedicalRecord => "getMedicalRecord",
            Operation::UpdateMedicalRecord => "updateMedicalRecord",
            Operation::AddConsultation => "addConsultation",
            Operation::GetAllPatientIds => "getAllPatientIds",
        };
        f.write_str(name)
    }
}

/// A classified failure returned by the record client.
///
/// The display form names the operation, its target and the fault kind. The lower-level
/// diagnostic is kept only as [`ClientError::message`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed for '{target}': {kind}")]
pub struct ClientError {
    kind: FaultKind,
    operation: Operation,
    target: String,
    message: String,
}

impl ClientError {
    pub fn new(
        kind: FaultKind,
        operation: Operation,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            operation,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn not_connected(operation: Operation, target: impl Into<String>) -> Self {
        Self::new(
            FaultKind::NotConnected,
            operation,
            target,
            "connect() has not completed successfully",
        )
    }

    pub fn invalid_argument(
        operation: Operation,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(FaultKind::InvalidArgument, operation, target, message)
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidInput(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
