//! Narrowing of an object reference to the record service interface.

use crate::constants::MEDICAL_RECORD_SERVICE_REPOSITORY_ID;
use crate::error::{ClientResult, Operation};
use crate::faults::{self, Phase};
use crate::transport::{with_deadline, MedicalRecordService, ObjectReference};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A reference that has passed the interface check once, at bind time.
#[derive(Clone)]
pub struct MedicalRecordServiceRef {
    stub: Arc<dyn MedicalRecordService>,
}

impl MedicalRecordServiceRef {
    pub fn service(&self) -> &dyn MedicalRecordService {
        self.stub.as_ref()
    }
}

impl fmt::Debug for MedicalRecordServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MedicalRecordServiceRef").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct TypedBinder {
    request_timeout: Duration,
}

impl TypedBinder {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }

    /// Check that `reference` implements the record service and return its typed stub.
    ///
    /// A `TypeMismatch` means the name resolved to the wrong kind of object. It is a deployment
    /// or versioning problem; retrying will not help.
    pub async fn bind(
        &self,
        reference: &ObjectReference,
        target: &str,
    ) -> ClientResult<MedicalRecordServiceRef> {
        let object = reference.object();
        let implements = with_deadline(
            self.request_timeout,
            object.is_a(MEDICAL_RECORD_SERVICE_REPOSITORY_ID),
        )
        .await
        .map_err(|e| faults::translate(Phase::Bind, Operation::Connect, target, e))?;

        if !implements {
            return Err(faults::type_mismatch(
                target,
                MEDICAL_RECORD_SERVICE_REPOSITORY_ID,
            ));
        }

        Ok(MedicalRecordServiceRef {
            stub: object.record_service_stub(),
        })
    }
}
