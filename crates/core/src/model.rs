//! Medical record data model.
//!
//! These are the values exchanged with the record service. Everything the client hands back is a
//! point-in-time copy of server state; nothing here holds a live link to the server.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default)]
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO-8601 date, e.g. `1980-05-15`.
    pub date_of_birth: String,
    pub gender: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    /// Proposed by the client for new consultations; the service may assign its own.
    pub consultation_id: String,
    /// ISO-8601 date-time.
    pub date: String,
    pub doctor_id: String,
    pub symptoms: String,
    pub diagnosis: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    #[serde(default)]
    pub prescription_id: String,
    pub medication: String,
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub record_id: String,
    pub patient: Patient,
    /// Chronological; the client only ever appends.
    #[serde(default)]
    pub consultations: Vec<Consultation>,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
}

impl MedicalRecord {
    /// Parse a record from its JSON representation (camelCase field names).
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

impl fmt::Display for MedicalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Medical Record ===")?;
        writeln!(f, "Record ID: {}", self.record_id)?;
        writeln!(
            f,
            "Patient: {} {}",
            self.patient.first_name, self.patient.last_name
        )?;
        writeln!(f, "Date of Birth: {}", self.patient.date_of_birth)?;
        writeln!(f, "Gender: {}", self.patient.gender)?;

        writeln!(f, "Consultations:")?;
        for consultation in &self.consultations {
            writeln!(f, "  - {}: {}", consultation.date, consultation.diagnosis)?;
        }

        write!(f, "Prescriptions:")?;
        for prescription in &self.prescriptions {
            write!(
                f,
                "\n  - {}: {}",
                prescription.medication, prescription.dosage
            )?;
        }
        Ok(())
    }
}
