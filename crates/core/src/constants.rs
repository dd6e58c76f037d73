//! Constants used throughout the DME core crate.

use std::time::Duration;

/// Identifier passed to `resolve_initial_references` to obtain the root naming context.
pub const NAME_SERVICE_ID: &str = "NameService";

/// Repository id every bound service object must report via `is_a`.
pub const MEDICAL_RECORD_SERVICE_REPOSITORY_ID: &str =
    "IDL:MedicalDME/Corba/MedicalRecordService:1.0";

/// Name under which the record service is registered in the directory.
pub const DEFAULT_SERVICE_NAME: &str = "MedicalRecordService";

/// Default directory host.
pub const DEFAULT_NAMING_HOST: &str = "localhost";

/// Default directory port.
pub const DEFAULT_NAMING_PORT: u16 = 1050;

/// Upper bound on a single remote call, including the directory round trips.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Doctor id stamped on consultations created by this client.
pub const DEFAULT_DOCTOR_ID: &str = "DME_CLIENT";
