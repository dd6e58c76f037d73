//! In-memory transport used by the unit tests.
//!
//! Every entry point bumps a counter so tests can assert exactly which round trips happened.

use crate::config::ServiceEndpoint;
use crate::constants::{MEDICAL_RECORD_SERVICE_REPOSITORY_ID, NAME_SERVICE_ID};
use crate::error::{TransportError, TransportResult};
use crate::model::{Consultation, MedicalRecord, Patient, Prescription};
use crate::transport::{
    MedicalRecordService, NameComponent, NamingContext, ObjectReference, RemoteObject, Transport,
    TransportHandle,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct CallCounts {
    opens: AtomicUsize,
    shutdowns: AtomicUsize,
    root_lookups: AtomicUsize,
    resolves: AtomicUsize,
    is_a: AtomicUsize,
    get_record: AtomicUsize,
    update_record: AtomicUsize,
    add_consultation: AtomicUsize,
    list_ids: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

impl CallCounts {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn is_a(&self) -> usize {
        self.is_a.load(Ordering::SeqCst)
    }

    pub fn get_record(&self) -> usize {
        self.get_record.load(Ordering::SeqCst)
    }

    pub fn add_consultation(&self) -> usize {
        self.add_consultation.load(Ordering::SeqCst)
    }

    /// Calls made on the record service interface (excluding `is_a`).
    pub fn operations(&self) -> usize {
        self.get_record()
            + self.update_record.load(Ordering::SeqCst)
            + self.add_consultation()
            + self.list_ids.load(Ordering::SeqCst)
    }
}

pub(crate) fn sample_record(patient_id: &str) -> MedicalRecord {
    MedicalRecord {
        record_id: "REC001".into(),
        patient: Patient {
            patient_id: patient_id.into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: "1980-05-15".into(),
            gender: "MALE".into(),
        },
        consultations: vec![Consultation {
            consultation_id: "CONS001".into(),
            date: "2024-01-15T10:30:00".into(),
            doctor_id: "DOC001".into(),
            symptoms: "Fever, cough".into(),
            diagnosis: "Common cold".into(),
        }],
        prescriptions: vec![Prescription {
            prescription_id: "PRES001".into(),
            medication: "Paracetamol".into(),
            dosage: "500mg".into(),
            frequency: "Every 6 hours".into(),
            start_date: "2024-01-15".into(),
            end_date: "2024-01-20".into(),
        }],
    }
}

/// Scriptable record service.
#[derive(Debug)]
pub(crate) struct MockRecordService {
    calls: Arc<CallCounts>,
    record: Mutex<Option<MedicalRecord>>,
    patient_ids: Mutex<Vec<String>>,
    update_ack: Mutex<bool>,
    failure: Mutex<Option<TransportError>>,
    delay: Mutex<Option<Duration>>,
    assigned_consultation_id: Mutex<Option<String>>,
    received_consultations: Mutex<Vec<(String, Consultation)>>,
    received_updates: Mutex<Vec<MedicalRecord>>,
}

impl MockRecordService {
    fn new(calls: Arc<CallCounts>) -> Self {
        Self {
            calls,
            record: Mutex::new(None),
            patient_ids: Mutex::new(vec!["PAT001".into(), "PAT002".into()]),
            update_ack: Mutex::new(true),
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            assigned_consultation_id: Mutex::new(None),
            received_consultations: Mutex::new(Vec::new()),
            received_updates: Mutex::new(Vec::new()),
        }
    }

    pub fn set_record(&self, record: MedicalRecord) {
        *self.record.lock().unwrap() = Some(record);
    }

    pub fn set_patient_ids(&self, ids: Vec<&str>) {
        *self.patient_ids.lock().unwrap() = ids.into_iter().map(String::from).collect();
    }

    pub fn set_update_ack(&self, ack: bool) {
        *self.update_ack.lock().unwrap() = ack;
    }

    /// Fail every following call with `error` until [`MockRecordService::recover`].
    pub fn fail_with(&self, error: TransportError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Reply to `add_consultation` with `id` instead of echoing the client's id.
    pub fn assign_consultation_id(&self, id: &str) {
        *self.assigned_consultation_id.lock().unwrap() = Some(id.to_string());
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn received_consultations(&self) -> Vec<(String, Consultation)> {
        self.received_consultations.lock().unwrap().clone()
    }

    pub fn received_updates(&self) -> Vec<MedicalRecord> {
        self.received_updates.lock().unwrap().clone()
    }

    async fn enter(&self, counter: &AtomicUsize) -> TransportResult<()> {
        bump(counter);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MedicalRecordService for MockRecordService {
    async fn get_medical_record(&self, patient_id: &str) -> TransportResult<MedicalRecord> {
        self.enter(&self.calls.get_record).await?;
        let record = self.record.lock().unwrap().clone();
        Ok(record.unwrap_or_else(|| sample_record(patient_id)))
    }

    async fn update_medical_record(&self, record: &MedicalRecord) -> TransportResult<bool> {
        self.enter(&self.calls.update_record).await?;
        self.received_updates.lock().unwrap().push(record.clone());
        Ok(*self.update_ack.lock().unwrap())
    }

    async fn add_consultation(
        &self,
        patient_id: &str,
        consultation: &Consultation,
    ) -> TransportResult<String> {
        self.enter(&self.calls.add_consultation).await?;
        self.received_consultations
            .lock()
            .unwrap()
            .push((patient_id.to_string(), consultation.clone()));
        let assigned = self.assigned_consultation_id.lock().unwrap().clone();
        Ok(assigned.unwrap_or_else(|| consultation.consultation_id.clone()))
    }

    async fn get_all_patient_ids(&self) -> TransportResult<Vec<String>> {
        self.enter(&self.calls.list_ids).await?;
        Ok(self.patient_ids.lock().unwrap().clone())
    }
}

/// A remote object with a configurable interface id.
#[derive(Clone, Debug)]
pub(crate) struct MockObject {
    repository_id: String,
    is_a_failure: Option<TransportError>,
    calls: Arc<CallCounts>,
    service: Arc<MockRecordService>,
}

impl MockObject {
    pub fn with_repository_id(repository_id: &str) -> Self {
        let calls = Arc::new(CallCounts::default());
        Self {
            repository_id: repository_id.to_string(),
            is_a_failure: None,
            service: Arc::new(MockRecordService::new(calls.clone())),
            calls,
        }
    }

    pub fn record_service() -> Self {
        Self::with_repository_id(MEDICAL_RECORD_SERVICE_REPOSITORY_ID)
    }

    pub fn fail_is_a(mut self, error: TransportError) -> Self {
        self.is_a_failure = Some(error);
        self
    }

    pub fn reference(&self) -> ObjectReference {
        ObjectReference::new(Arc::new(self.clone()))
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    pub fn service(&self) -> &MockRecordService {
        &self.service
    }
}

#[async_trait]
impl RemoteObject for MockObject {
    async fn is_a(&self, repository_id: &str) -> TransportResult<bool> {
        bump(&self.calls.is_a);
        if let Some(error) = &self.is_a_failure {
            return Err(error.clone());
        }
        Ok(self.repository_id == repository_id)
    }

    fn record_service_stub(&self) -> Arc<dyn MedicalRecordService> {
        self.service.clone()
    }
}

#[derive(Clone, Debug, Default)]
enum RootContext {
    #[default]
    Present,
    Absent,
    Fail(TransportError),
}

/// Transport whose directory is a map of names to mock objects.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockTransport {
    calls: Arc<CallCounts>,
    directory: Arc<Mutex<HashMap<String, ObjectReference>>>,
    root: RootContext,
    open_failure: Option<TransportError>,
    naming_delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_root_context(mut self) -> Self {
        self.root = RootContext::Absent;
        self
    }

    pub fn fail_root_context(mut self, error: TransportError) -> Self {
        self.root = RootContext::Fail(error);
        self
    }

    pub fn fail_open(mut self, error: TransportError) -> Self {
        self.open_failure = Some(error);
        self
    }

    pub fn with_naming_delay(mut self, delay: Duration) -> Self {
        self.naming_delay = Some(delay);
        self
    }

    pub fn register(&self, name: &str, object: MockObject) {
        self.directory
            .lock()
            .unwrap()
            .insert(name.to_string(), object.reference());
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    async fn naming_round_trip(&self) {
        if let Some(delay) = self.naming_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, _endpoint: &ServiceEndpoint) -> TransportResult<Box<dyn TransportHandle>> {
        bump(&self.calls.opens);
        if let Some(error) = &self.open_failure {
            return Err(error.clone());
        }
        Ok(Box::new(MockHandle {
            transport: self.clone(),
        }))
    }
}

struct MockHandle {
    transport: MockTransport,
}

#[async_trait]
impl TransportHandle for MockHandle {
    async fn resolve_initial_references(
        &self,
        id: &str,
    ) -> TransportResult<Option<Box<dyn NamingContext>>> {
        bump(&self.transport.calls.root_lookups);
        self.transport.naming_round_trip().await;
        if id != NAME_SERVICE_ID {
            return Ok(None);
        }
        match &self.transport.root {
            RootContext::Present => Ok(Some(Box::new(MockNamingContext {
                transport: self.transport.clone(),
            }))),
            RootContext::Absent => Ok(None),
            RootContext::Fail(error) => Err(error.clone()),
        }
    }

    async fn shutdown(&self) {
        bump(&self.transport.calls.shutdowns);
    }
}

struct MockNamingContext {
    transport: MockTransport,
}

#[async_trait]
impl NamingContext for MockNamingContext {
    async fn resolve(&self, name: &[NameComponent]) -> TransportResult<ObjectReference> {
        bump(&self.transport.calls.resolves);
        self.transport.naming_round_trip().await;
        let [component] = name else {
            return Err(TransportError::InvalidName(format!(
                "expected one name component, got {}",
                name.len()
            )));
        };
        self.transport
            .directory
            .lock()
            .unwrap()
            .get(&component.id)
            .cloned()
            .ok_or_else(|| TransportError::NameNotFound(component.to_string()))
    }
}
