//! Contracts consumed from the remote-object runtime.
//!
//! The runtime itself (connection management, marshalling, the broker's threading) lives behind
//! these traits. The record client only ever sees:
//! - a [`Transport`], injected at construction, which opens a [`TransportHandle`] per session;
//! - the handle's root [`NamingContext`], which resolves names to [`ObjectReference`]s;
//! - the [`MedicalRecordService`] stub an object reference yields once it has passed `is_a`.

use crate::config::ServiceEndpoint;
use crate::error::TransportResult;
use crate::model::{Consultation, MedicalRecord};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Entry point into a remote-object runtime.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Initialise the runtime against the directory at `endpoint.host:endpoint.port`.
    async fn open(&self, endpoint: &ServiceEndpoint) -> TransportResult<Box<dyn TransportHandle>>;
}

/// An initialised runtime session. Owns network resources until shut down or dropped.
#[async_trait]
pub trait TransportHandle: Send + Sync {
    /// Look up a bootstrap object such as `"NameService"`. `Ok(None)` means the runtime has no
    /// such reference configured.
    async fn resolve_initial_references(
        &self,
        id: &str,
    ) -> TransportResult<Option<Box<dyn NamingContext>>>;

    /// Release everything the session holds. Must be safe to call more than once.
    async fn shutdown(&self);
}

/// One component of a hierarchical name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameComponent {
    pub id: String,
    pub kind: String,
}

impl NameComponent {
    /// A component with an empty kind, the form used for service registrations.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: String::new(),
        }
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}.{}", self.id, self.kind)
        }
    }
}

#[async_trait]
pub trait NamingContext: Send + Sync {
    async fn resolve(&self, name: &[NameComponent]) -> TransportResult<ObjectReference>;
}

/// Runtime side of an object reference.
#[async_trait]
pub trait RemoteObject: Send + Sync + fmt::Debug {
    /// Ask the remote object whether it implements the interface `repository_id`.
    async fn is_a(&self, repository_id: &str) -> TransportResult<bool>;

    /// Stub for the record service interface, without checking that the object implements it.
    fn record_service_stub(&self) -> Arc<dyn MedicalRecordService>;
}

/// Opaque handle identifying a remote object.
#[derive(Clone, Debug)]
pub struct ObjectReference(Arc<dyn RemoteObject>);

impl ObjectReference {
    pub fn new(object: Arc<dyn RemoteObject>) -> Self {
        Self(object)
    }

    pub(crate) fn object(&self) -> &dyn RemoteObject {
        self.0.as_ref()
    }
}

/// The record service contract as exposed by the remote object.
#[async_trait]
pub trait MedicalRecordService: Send + Sync {
    async fn get_medical_record(&self, patient_id: &str) -> TransportResult<MedicalRecord>;

    async fn update_medical_record(&self, record: &MedicalRecord) -> TransportResult<bool>;

    async fn add_consultation(
        &self,
        patient_id: &str,
        consultation: &Consultation,
    ) -> TransportResult<String>;

    async fn get_all_patient_ids(&self) -> TransportResult<Vec<String>>;
}

/// Bound a remote call by `timeout`; an elapsed deadline becomes [`TransportError::Timeout`].
///
/// [`TransportError::Timeout`]: crate::error::TransportError::Timeout
pub(crate) async fn with_deadline<T, F>(timeout: std::time::Duration, call: F) -> TransportResult<T>
where
    F: std::future::Future<Output = TransportResult<T>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| crate::error::TransportError::Timeout(timeout))?
}
