//! `dme-core` transport traits over `tonic` channels.

use crate::convert::{
    consultation_to_pb, name_to_pb, record_from_pb, record_to_pb, status_to_transport_error,
};
use api_shared::pb::{
    AddConsultationReq, GetAllPatientIdsReq, GetMedicalRecordReq, IsAReq, ObjectRef, ResolveReq,
    UpdateMedicalRecordReq,
};
use api_shared::{MedicalRecordServiceClient, NamingClient, ObjectClient};
use dme_core::constants::NAME_SERVICE_ID;
use dme_core::{
    Consultation, MedicalRecord, MedicalRecordService, NameComponent, NamingContext,
    ObjectReference, RemoteObject, ServiceEndpoint, Transport, TransportError, TransportHandle,
    TransportResult,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Opens sessions against a `dme.v1` naming service.
#[derive(Clone, Debug)]
pub struct GrpcTransport {
    connect_timeout: Duration,
}

impl GrpcTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    fn endpoint(&self, authority: &str) -> TransportResult<Endpoint> {
        Endpoint::from_shared(format!("http://{}", authority))
            .map(|e| e.connect_timeout(self.connect_timeout))
            .map_err(|e| TransportError::Init(format!("invalid address '{}': {}", authority, e)))
    }
}

#[tonic::async_trait]
impl Transport for GrpcTransport {
    async fn open(&self, endpoint: &ServiceEndpoint) -> TransportResult<Box<dyn TransportHandle>> {
        let authority = endpoint.authority();
        let channel = self
            .endpoint(&authority)?
            .connect()
            .await
            .map_err(|e| TransportError::CommFailure(format!("{}: {}", authority, e)))?;

        tracing::debug!(%authority, "naming service channel open");
        Ok(Box::new(GrpcHandle {
            transport: self.clone(),
            authority,
            channel: Mutex::new(Some(channel)),
        }))
    }
}

/// A session with the naming service. Dropping the channel closes the connection.
struct GrpcHandle {
    transport: GrpcTransport,
    authority: String,
    channel: Mutex<Option<Channel>>,
}

impl GrpcHandle {
    fn channel(&self) -> TransportResult<Channel> {
        self.channel
            .lock()
            .map_err(|_| TransportError::Init("session state poisoned".into()))?
            .clone()
            .ok_or_else(|| {
                TransportError::CommFailure(format!("session with {} is shut down", self.authority))
            })
    }
}

#[tonic::async_trait]
impl TransportHandle for GrpcHandle {
    async fn resolve_initial_references(
        &self,
        id: &str,
    ) -> TransportResult<Option<Box<dyn NamingContext>>> {
        if id != NAME_SERVICE_ID {
            return Ok(None);
        }
        let channel = self.channel()?;
        Ok(Some(Box::new(GrpcNamingContext {
            transport: self.transport.clone(),
            client: NamingClient::new(channel.clone()),
            channel,
        })))
    }

    async fn shutdown(&self) {
        if let Ok(mut channel) = self.channel.lock() {
            if channel.take().is_some() {
                tracing::debug!(authority = %self.authority, "naming service channel closed");
            }
        }
    }
}

struct GrpcNamingContext {
    transport: GrpcTransport,
    client: NamingClient<Channel>,
    channel: Channel,
}

impl GrpcNamingContext {
    /// Objects with no endpoint of their own live next to the naming service.
    fn object_channel(&self, reference: &ObjectRef) -> TransportResult<Channel> {
        if reference.endpoint.is_empty() {
            return Ok(self.channel.clone());
        }
        self.transport
            .endpoint(&reference.endpoint)
            .map(|e| e.connect_lazy())
            .map_err(|e| TransportError::Marshal(e.to_string()))
    }
}

#[tonic::async_trait]
impl NamingContext for GrpcNamingContext {
    async fn resolve(&self, name: &[NameComponent]) -> TransportResult<ObjectReference> {
        let display: Vec<String> = name.iter().map(ToString::to_string).collect();
        let display = display.join("/");

        let response = self
            .client
            .clone()
            .resolve(ResolveReq {
                name: name_to_pb(name),
            })
            .await
            .map_err(|s| status_to_transport_error(s, TransportError::NameNotFound))?
            .into_inner();

        let reference = response
            .reference
            .ok_or_else(|| TransportError::NameNotFound(display))?;
        let channel = self.object_channel(&reference)?;

        Ok(ObjectReference::new(Arc::new(GrpcObject {
            object_key: reference.object_key,
            channel,
        })))
    }
}

#[derive(Debug)]
struct GrpcObject {
    object_key: String,
    channel: Channel,
}

#[tonic::async_trait]
impl RemoteObject for GrpcObject {
    async fn is_a(&self, repository_id: &str) -> TransportResult<bool> {
        let response = ObjectClient::new(self.channel.clone())
            .is_a(IsAReq {
                object_key: self.object_key.clone(),
                repository_id: repository_id.to_string(),
            })
            .await
            .map_err(|s| status_to_transport_error(s, TransportError::ObjectNotExist))?;
        Ok(response.into_inner().result)
    }

    fn record_service_stub(&self) -> Arc<dyn MedicalRecordService> {
        Arc::new(GrpcRecordService {
            object_key: self.object_key.clone(),
            client: MedicalRecordServiceClient::new(self.channel.clone()),
        })
    }
}

struct GrpcRecordService {
    object_key: String,
    client: MedicalRecordServiceClient<Channel>,
}

#[tonic::async_trait]
impl MedicalRecordService for GrpcRecordService {
    async fn get_medical_record(&self, patient_id: &str) -> TransportResult<MedicalRecord> {
        let response = self
            .client
            .clone()
            .get_medical_record(GetMedicalRecordReq {
                object_key: self.object_key.clone(),
                patient_id: patient_id.to_string(),
            })
            .await
            .map_err(|s| status_to_transport_error(s, TransportError::RecordNotFound))?;
        record_from_pb(response.into_inner())
    }

    async fn update_medical_record(&self, record: &MedicalRecord) -> TransportResult<bool> {
        let response = self
            .client
            .clone()
            .update_medical_record(UpdateMedicalRecordReq {
                object_key: self.object_key.clone(),
                record: Some(record_to_pb(record)),
            })
            .await
            .map_err(|s| status_to_transport_error(s, TransportError::RecordNotFound))?;
        Ok(response.into_inner().ok)
    }

    async fn add_consultation(
        &self,
        patient_id: &str,
        consultation: &Consultation,
    ) -> TransportResult<String> {
        let response = self
            .client
            .clone()
            .add_consultation(AddConsultationReq {
                object_key: self.object_key.clone(),
                patient_id: patient_id.to_string(),
                consultation: Some(consultation_to_pb(consultation)),
            })
            .await
            .map_err(|s| status_to_transport_error(s, TransportError::RecordNotFound))?;
        Ok(response.into_inner().consultation_id)
    }

    async fn get_all_patient_ids(&self) -> TransportResult<Vec<String>> {
        let response = self
            .client
            .clone()
            .get_all_patient_ids(GetAllPatientIdsReq {
                object_key: self.object_key.clone(),
            })
            .await
            .map_err(|s| status_to_transport_error(s, TransportError::ObjectNotExist))?;
        Ok(response.into_inner().patient_ids)
    }
}
