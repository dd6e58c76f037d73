//! Conversions between `dme.v1` wire messages and the core model, and from gRPC statuses to
//! transport errors.

use api_shared::pb;
use dme_core::{
    Consultation, MedicalRecord, NameComponent, Patient, Prescription, TransportError,
    TransportResult,
};
use tonic::{Code, Status};

pub fn name_to_pb(name: &[NameComponent]) -> Vec<pb::NameComponent> {
    name.iter()
        .map(|c| pb::NameComponent {
            id: c.id.clone(),
            kind: c.kind.clone(),
        })
        .collect()
}

pub fn patient_from_pb(p: pb::Patient) -> Patient {
    Patient {
        patient_id: p.patient_id,
        first_name: p.first_name,
        last_name: p.last_name,
        date_of_birth: p.date_of_birth,
        gender: p.gender,
    }
}

pub fn patient_to_pb(p: &Patient) -> pb::Patient {
    pb::Patient {
        patient_id: p.patient_id.clone(),
        first_name: p.first_name.clone(),
        last_name: p.last_name.clone(),
        date_of_birth: p.date_of_birth.clone(),
        gender: p.gender.clone(),
    }
}

pub fn consultation_from_pb(c: pb::Consultation) -> Consultation {
    Consultation {
        consultation_id: c.consultation_id,
        date: c.date,
        doctor_id: c.doctor_id,
        symptoms: c.symptoms,
        diagnosis: c.diagnosis,
    }
}

pub fn consultation_to_pb(c: &Consultation) -> pb::Consultation {
    pb::Consultation {
        consultation_id: c.consultation_id.clone(),
        date: c.date.clone(),
        doctor_id: c.doctor_id.clone(),
        symptoms: c.symptoms.clone(),
        diagnosis: c.diagnosis.clone(),
    }
}

pub fn prescription_from_pb(p: pb::Prescription) -> Prescription {
    Prescription {
        prescription_id: p.prescription_id,
        medication: p.medication,
        dosage: p.dosage,
        frequency: p.frequency,
        start_date: p.start_date,
        end_date: p.end_date,
    }
}

pub fn prescription_to_pb(p: &Prescription) -> pb::Prescription {
    pb::Prescription {
        prescription_id: p.prescription_id.clone(),
        medication: p.medication.clone(),
        dosage: p.dosage.clone(),
        frequency: p.frequency.clone(),
        start_date: p.start_date.clone(),
        end_date: p.end_date.clone(),
    }
}

/// Convert a wire record. A record without a patient is a malformed reply.
pub fn record_from_pb(record: pb::MedicalRecord) -> TransportResult<MedicalRecord> {
    let patient = record.patient.ok_or_else(|| {
        TransportError::Marshal(format!("record '{}' has no patient", record.record_id))
    })?;

    Ok(MedicalRecord {
        record_id: record.record_id,
        patient: patient_from_pb(patient),
        consultations: record
            .consultations
            .into_iter()
            .map(consultation_from_pb)
            .collect(),
        prescriptions: record
            .prescriptions
            .into_iter()
            .map(prescription_from_pb)
            .collect(),
    })
}

pub fn record_to_pb(record: &MedicalRecord) -> pb::MedicalRecord {
    pb::MedicalRecord {
        record_id: record.record_id.clone(),
        patient: Some(patient_to_pb(&record.patient)),
        consultations: record.consultations.iter().map(consultation_to_pb).collect(),
        prescriptions: record.prescriptions.iter().map(prescription_to_pb).collect(),
    }
}

/// Map a gRPC status to a transport error.
///
/// `NOT_FOUND` means different things per call (unknown name, vanished object, unknown
/// patient), so the caller supplies the variant through `not_found`.
pub fn status_to_transport_error(
    status: Status,
    not_found: impl FnOnce(String) -> TransportError,
) -> TransportError {
    let message = status.message().to_string();
    match status.code() {
        Code::Unavailable => TransportError::CommFailure(message),
        Code::DeadlineExceeded | Code::ResourceExhausted | Code::Aborted | Code::Cancelled => {
            TransportError::Transient(message)
        }
        Code::NotFound => not_found(message),
        Code::InvalidArgument | Code::OutOfRange => TransportError::BadParam(message),
        Code::DataLoss => TransportError::Marshal(message),
        _ => TransportError::Application(format!("{:?}: {}", status.code(), message)),
    }
}
