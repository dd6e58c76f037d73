use clap::{Args, Parser, Subcommand};
use dme_core::{ClientConfig, MedicalRecord, RecordClient};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use transport_grpc::GrpcTransport;

#[derive(Parser)]
#[command(name = "dme")]
#[command(about = "DME medical record service client")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Naming service host
    #[arg(long, env = "DME_NAMING_HOST", global = true)]
    host: Option<String>,
    /// Naming service port
    #[arg(long, env = "DME_NAMING_PORT", global = true)]
    port: Option<String>,
    /// Name the record service is registered under
    #[arg(long, env = "DME_SERVICE_NAME", global = true)]
    service_name: Option<String>,
    /// Per-call timeout in milliseconds
    #[arg(long, env = "DME_REQUEST_TIMEOUT_MS", global = true)]
    timeout_ms: Option<String>,
    /// Doctor id stamped on new consultations
    #[arg(long, env = "DME_DOCTOR_ID", global = true)]
    doctor_id: Option<String>,
}

impl ConnectionArgs {
    fn into_config(self) -> Result<ClientConfig, dme_core::ConfigError> {
        ClientConfig::from_env_values(
            self.host,
            self.port,
            self.service_name,
            self.timeout_ms,
            self.doctor_id,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all patient ids
    List,
    /// Show a patient's medical record
    Get {
        /// Patient id, e.g. PAT001
        patient_id: String,
    },
    /// Add a consultation to a patient's record
    AddConsultation {
        /// Patient id
        patient_id: String,
        /// Presenting symptoms
        symptoms: String,
        /// Diagnosis
        diagnosis: String,
    },
    /// Replace a medical record with the contents of a JSON file
    Update {
        /// Path to the record JSON (camelCase field names)
        path: PathBuf,
    },
}

fn load_record(path: &Path) -> Result<MedicalRecord, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let record = MedicalRecord::from_json(&contents)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(record)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'dme --help' for commands");
        return ExitCode::SUCCESS;
    };

    // Validate the input file before touching the network.
    let update_record = match &command {
        Commands::Update { path } => match load_record(path) {
            Ok(record) => Some(record),
            Err(e) => {
                eprintln!("Error loading record: {}", e);
                return ExitCode::FAILURE;
            }
        },
        _ => None,
    };

    let config = match cli.connection.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let transport = Arc::new(GrpcTransport::new(config.request_timeout()));
    let mut client = RecordClient::new(config, transport);

    if let Err(e) = client.connect().await {
        eprintln!("Failed to connect: {}", e);
        return ExitCode::FAILURE;
    }

    let outcome = match command {
        Commands::List => client.get_all_patient_ids().await.map(|ids| {
            if ids.is_empty() {
                println!("No patients found.");
            }
            for id in ids {
                println!("{}", id);
            }
        }),
        Commands::Get { patient_id } => client
            .get_medical_record(&patient_id)
            .await
            .map(|record| println!("{}", record)),
        Commands::AddConsultation {
            patient_id,
            symptoms,
            diagnosis,
        } => client
            .add_consultation(&patient_id, &symptoms, &diagnosis)
            .await
            .map(|id| println!("Consultation added with ID: {}", id)),
        Commands::Update { .. } => match update_record {
            Some(record) => client
                .update_medical_record(&record)
                .await
                .map(|ok| println!("Update acknowledged: {}", ok)),
            None => Ok(()),
        },
    };

    client.close().await;

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
