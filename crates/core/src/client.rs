//! The record client facade.
//!
//! [`RecordClient`] owns one session with the record service. It starts disconnected; a
//! successful [`RecordClient::connect`] resolves the service name and binds the result to the
//! record service interface. Every operation requires that binding and fails with `NotConnected`
//! otherwise.
//!
//! A connectivity fault during an operation (communication failure, transient failure, timeout,
//! vanished object) releases the session and puts the client back in the disconnected state; the
//! caller decides whether to `connect()` again. There is no automatic retry.

use crate::binder::{MedicalRecordServiceRef, TypedBinder};
use crate::config::{ClientConfig, ServiceEndpoint};
use crate::directory::DirectoryResolver;
use crate::error::{ClientError, ClientResult, Operation, TransportResult};
use crate::faults::{self, Phase};
use crate::model::{Consultation, MedicalRecord};
use crate::transport::{with_deadline, Transport, TransportHandle};
use dme_types::{NonEmptyText, PatientId};
use dme_uuid::TimestampUuid;
use std::future::Future;
use std::sync::Arc;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

#[derive(Default)]
struct ConnectionState {
    handle: Option<Box<dyn TransportHandle>>,
    service: Option<MedicalRecordServiceRef>,
}

impl ConnectionState {
    async fn release(&mut self) {
        self.service = None;
        if let Some(handle) = self.handle.take() {
            handle.shutdown().await;
        }
    }
}

/// Client for the remote medical record service.
///
/// Operations take `&mut self`, so one client never has overlapping calls in flight. Share it
/// between tasks behind a `tokio::sync::Mutex` if needed.
pub struct RecordClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    resolver: DirectoryResolver,
    binder: TypedBinder,
    state: ConnectionState,
    last_consultation_id: Option<TimestampUuid>,
}

impl RecordClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let timeout = config.request_timeout();
        Self {
            config,
            transport,
            resolver: DirectoryResolver::new(timeout),
            binder: TypedBinder::new(timeout),
            state: ConnectionState::default(),
            last_consultation_id: None,
        }
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        self.config.endpoint()
    }

    pub fn state(&self) -> SessionState {
        if self.state.service.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Resolve the service in the directory and bind it.
    ///
    /// Any existing session is released first. On failure nothing acquired during the attempt is
    /// kept and the client stays disconnected.
    ///
    /// # Errors
    ///
    /// `DirectoryUnavailable`, `NotFound` or `TypeMismatch`; `RemoteFault` if the interface
    /// check itself fails in transit.
    pub async fn connect(&mut self) -> ClientResult<()> {
        self.state.release().await;

        let endpoint = self.config.endpoint().clone();
        let target = endpoint.service_name();
        tracing::info!(%endpoint, "connecting to record service");

        let handle = with_deadline(self.config.request_timeout(), self.transport.open(&endpoint))
            .await
            .map_err(|e| faults::translate(Phase::Resolve, Operation::Connect, target, e))?;

        let bound = match self.resolver.resolve(handle.as_ref(), &endpoint).await {
            Ok(reference) => self.binder.bind(&reference, target).await,
            Err(e) => Err(e),
        };

        match bound {
            Ok(service) => {
                self.state = ConnectionState {
                    handle: Some(handle),
                    service: Some(service),
                };
                tracing::info!(%endpoint, "connected to record service");
                Ok(())
            }
            Err(e) => {
                handle.shutdown().await;
                Err(e)
            }
        }
    }

    /// Release the session. The client can `connect()` again afterwards.
    pub async fn close(&mut self) {
        if self.state.handle.is_some() {
            tracing::info!(endpoint = %self.config.endpoint(), "closing record service session");
        }
        self.state.release().await;
    }

    /// Fetch the record of `patient_id`. The result is a snapshot of server state.
    ///
    /// The id is normalised before it is sent: surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty id (no remote call is made), `NotFound` if the service
    /// does not know the patient, `RemoteFault` otherwise.
    pub async fn get_medical_record(&mut self, patient_id: &str) -> ClientResult<MedicalRecord> {
        let op = Operation::GetMedicalRecord;
        let service = self.bound(op, patient_id)?;
        let patient_id = PatientId::new(patient_id).map_err(|e| {
            ClientError::invalid_argument(op, patient_id, format!("patient id: {}", e))
        })?;

        let id = patient_id.as_str();
        self.invoke(op, id, service.service().get_medical_record(id))
            .await
    }

    /// Send the full record to the service and return its acknowledgement.
    ///
    /// `record` is not modified; read the record again to observe the server's view. Every
    /// failure of the call, including an unknown record, is a `RemoteFault`.
    pub async fn update_medical_record(&mut self, record: &MedicalRecord) -> ClientResult<bool> {
        let op = Operation::UpdateMedicalRecord;
        let service = self.bound(op, &record.record_id)?;

        self.invoke(
            op,
            &record.record_id,
            service.service().update_medical_record(record),
        )
        .await
    }

    /// Record a new consultation for `patient_id` and return the id the service reports.
    ///
    /// The consultation is stamped with a client-generated, monotonically increasing id, the
    /// current time and the configured doctor id. The service may assign a different id.
    /// `patient_id` is trimmed of surrounding whitespace before it is sent.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty id, symptoms or diagnosis (no remote call is made),
    /// `RemoteFault` for any failure of the call, including an unknown patient.
    pub async fn add_consultation(
        &mut self,
        patient_id: &str,
        symptoms: &str,
        diagnosis: &str,
    ) -> ClientResult<String> {
        let op = Operation::AddConsultation;
        let service = self.bound(op, patient_id)?;

        let invalid = |field: &str, e: dme_types::TextError| {
            ClientError::invalid_argument(op, patient_id, format!("{}: {}", field, e))
        };
        let patient_id = PatientId::new(patient_id).map_err(|e| invalid("patient id", e))?;
        let symptoms = NonEmptyText::new(symptoms).map_err(|e| invalid("symptoms", e))?;
        let diagnosis = NonEmptyText::new(diagnosis).map_err(|e| invalid("diagnosis", e))?;

        let uid = TimestampUuid::generate(self.last_consultation_id.as_ref());
        let consultation = Consultation {
            consultation_id: uid.to_string(),
            date: uid.iso_timestamp(),
            doctor_id: self.config.doctor_id().to_string(),
            symptoms: symptoms.into_inner(),
            diagnosis: diagnosis.into_inner(),
        };
        self.last_consultation_id = Some(uid);

        let id = patient_id.as_str();
        self.invoke(
            op,
            id,
            service.service().add_consultation(id, &consultation),
        )
        .await
    }

    /// All patient ids, in the order the service declares them.
    pub async fn get_all_patient_ids(&mut self) -> ClientResult<Vec<String>> {
        let op = Operation::GetAllPatientIds;
        let target = self.config.endpoint().service_name().to_string();
        let service = self.bound(op, &target)?;

        self.invoke(op, &target, service.service().get_all_patient_ids())
            .await
    }

    fn bound(&self, op: Operation, target: &str) -> ClientResult<MedicalRecordServiceRef> {
        self.state
            .service
            .clone()
            .ok_or_else(|| ClientError::not_connected(op, target))
    }

    async fn invoke<T, F>(&mut self, op: Operation, target: &str, call: F) -> ClientResult<T>
    where
        F: Future<Output = TransportResult<T>>,
    {
        tracing::debug!(operation = %op, subject = target, "invoking record service");
        match with_deadline(self.config.request_timeout(), call).await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_connectivity() {
                    tracing::info!(operation = %op, "connectivity lost, session released");
                    self.state.release().await;
                }
                Err(faults::translate(Phase::Invoke, op, target, e))
            }
        }
    }
}
