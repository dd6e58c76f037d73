//! # API Shared
//!
//! Wire definitions of the DME remote-object runtime, shared by every gRPC-speaking crate.
//!
//! Contains:
//! - Protobuf-generated message types for the naming, object and record services (`pb` module)
//! - The generated client stubs, re-exported at the crate root
//!
//! The generated code is placed into OUT_DIR at build time by the build script.

pub mod pb {
    tonic::include_proto!("dme.v1");
}

pub use pb::medical_record_service_client::MedicalRecordServiceClient;
pub use pb::naming_client::NamingClient;
pub use pb::object_client::ObjectClient;

#[cfg(test)]
mod tests {
    use super::pb::{GetAllPatientIdsRes, ResolveRes};
    use prost::Message;

    #[test]
    fn test_patient_ids_keep_wire_order() {
        let res = GetAllPatientIdsRes {
            patient_ids: vec!["PAT002".into(), "PAT001".into(), "PAT002".into()],
        };

        let decoded = GetAllPatientIdsRes::decode(res.encode_to_vec().as_slice()).unwrap();

        assert_eq!(decoded.patient_ids, vec!["PAT002", "PAT001", "PAT002"]);
    }

    #[test]
    fn test_missing_nested_message_decodes_as_none() {
        let decoded = ResolveRes::decode(&b""[..]).unwrap();
        assert!(decoded.reference.is_none());
    }
}
