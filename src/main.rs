use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dme_core::{ClientConfig, RecordClient};
use transport_grpc::GrpcTransport;

/// Patient used by the demonstration run.
const DEMO_PATIENT_ID: &str = "PAT001";

/// Demonstration run against the DME record service.
///
/// Connects through the naming service, then in order: lists all patients, fetches one record,
/// adds one consultation. A failed connect ends the process with a non-zero status; a failed
/// step is reported and the run moves on to the next one.
///
/// # Environment Variables
/// - `DME_NAMING_HOST`: naming service host (default: "localhost")
/// - `DME_NAMING_PORT`: naming service port (default: 1050)
/// - `DME_SERVICE_NAME`: registered service name (default: "MedicalRecordService")
/// - `DME_REQUEST_TIMEOUT_MS`: per-call timeout in milliseconds (default: 10000)
/// - `DME_DOCTOR_ID`: doctor id stamped on new consultations (default: "DME_CLIENT")
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("dme=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env_values(
        std::env::var("DME_NAMING_HOST").ok(),
        std::env::var("DME_NAMING_PORT").ok(),
        std::env::var("DME_SERVICE_NAME").ok(),
        std::env::var("DME_REQUEST_TIMEOUT_MS").ok(),
        std::env::var("DME_DOCTOR_ID").ok(),
    )?;

    tracing::info!("++ Connecting to {}", config.endpoint());

    let transport = Arc::new(GrpcTransport::new(config.request_timeout()));
    let mut client = RecordClient::new(config, transport);

    if let Err(e) = client.connect().await {
        eprintln!("Failed to connect to the medical record service: {}", e);
        tracing::error!("connect error: {}", e.message());
        return Ok(ExitCode::FAILURE);
    }
    println!("Successfully connected to the medical record service");

    println!("\n1. Getting all patients...");
    match client.get_all_patient_ids().await {
        Ok(ids) => {
            println!("=== All Patients ===");
            for id in ids {
                println!("  - {}", id);
            }
        }
        Err(e) => eprintln!("Error getting patients: {}", e),
    }

    println!("\n2. Getting specific medical record...");
    reconnect_if_needed(&mut client).await;
    match client.get_medical_record(DEMO_PATIENT_ID).await {
        Ok(record) => println!("{}", record),
        Err(e) => eprintln!("Error retrieving record: {}", e),
    }

    println!("\n3. Adding a consultation...");
    reconnect_if_needed(&mut client).await;
    match client
        .add_consultation(DEMO_PATIENT_ID, "Headache, nausea", "Migraine")
        .await
    {
        Ok(id) => println!("Consultation added with ID: {}", id),
        Err(e) => eprintln!("Error adding consultation: {}", e),
    }

    client.close().await;
    println!("\nDemonstration completed");

    Ok(ExitCode::SUCCESS)
}

/// A connectivity fault in one step drops the session; try once to get it back for the next.
async fn reconnect_if_needed(client: &mut RecordClient) {
    if client.is_connected() {
        return;
    }
    tracing::info!("session lost, reconnecting");
    if let Err(e) = client.connect().await {
        eprintln!("Reconnect failed: {}", e);
    }
}
