//! # DME Core
//!
//! Client-side pipeline for the remote medical record service:
//! - [`DirectoryResolver`]: looks the service up by name in the runtime's naming service
//! - [`TypedBinder`]: checks the resolved object implements the record service interface
//! - [`RecordClient`]: the facade exposing record operations over the bound reference
//! - [`faults`]: classification of transport failures into [`FaultKind`]s
//!
//! **No transport concerns**: the remote-object runtime is consumed through the traits in
//! [`transport`]. The gRPC implementation lives in `transport-grpc`.

pub mod binder;
pub mod client;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod faults;
pub mod model;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use binder::{MedicalRecordServiceRef, TypedBinder};
pub use client::{RecordClient, SessionState};
pub use config::{ClientConfig, ServiceEndpoint};
pub use directory::DirectoryResolver;
pub use error::{
    ClientError, ClientResult, ConfigError, ConfigResult, FaultKind, Operation, TransportError,
    TransportResult,
};
pub use model::{Consultation, MedicalRecord, Patient, Prescription};
pub use transport::{
    MedicalRecordService, NameComponent, NamingContext, ObjectReference, RemoteObject, Transport,
    TransportHandle,
};

pub use dme_types::{NonEmptyText, PatientId, TextError};
