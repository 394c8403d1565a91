//! cdfup — upload a local file to Cognite Data Fusion.
//!
//! Connection settings come from the COGNITE_* environment variables (a
//! `.env` file is honored); everything about the upload itself is a flag.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use cdfup_cli::{init_tracing, parse_metadata_pair};
use cdfup_core::config::{
    ConnectionConfig, UploadRequest, DEFAULT_FALLBACK_SPACE, DEFAULT_TARGET_SPACE,
};
use cdfup_core::error::UploadError;
use cdfup_core::models::UploadOutcome;
use cdfup_remote::CdfRemote;

#[derive(Parser)]
#[command(name = "cdfup", about = "Upload a local file to Cognite Data Fusion")]
struct Cli {
    /// Path to the local file to upload
    file: PathBuf,

    /// Target space external id
    #[arg(long, default_value = DEFAULT_TARGET_SPACE)]
    space: String,

    /// Fallback space external id, auto-created when the target is absent
    #[arg(long, default_value = DEFAULT_FALLBACK_SPACE)]
    fallback_space: String,

    /// External id for the file entity (defaults to the file name)
    #[arg(long)]
    external_id: Option<String>,

    /// Display name for the file entity (defaults to the file name)
    #[arg(long)]
    name: Option<String>,

    /// Source tag recorded on the file entity
    #[arg(long)]
    source: Option<String>,

    /// MIME type (guessed from the file extension when omitted)
    #[arg(long)]
    mime_type: Option<String>,

    /// Metadata entry, key=value (repeatable)
    #[arg(long = "metadata", value_name = "KEY=VALUE")]
    metadata: Vec<String>,
}

fn build_request(cli: &Cli) -> Result<UploadRequest, UploadError> {
    let external_id = cli.external_id.clone().unwrap_or_else(|| {
        cli.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let mut request = UploadRequest::new(cli.file.clone(), external_id);
    request.target_space = cli.space.clone();
    request.fallback_space = cli.fallback_space.clone();
    request.file_name = cli.name.clone();
    request.source = cli.source.clone();
    request.mime_type = cli.mime_type.clone();
    for raw in &cli.metadata {
        let (key, value) = parse_metadata_pair(raw).map_err(UploadError::Configuration)?;
        request.metadata.insert(key, value);
    }
    request.validate()?;
    Ok(request)
}

async fn run(cli: Cli) -> Result<UploadOutcome, UploadError> {
    // All local validation happens before the connection config is even
    // read, and the config is read before any remote call.
    let request = build_request(&cli)?;
    let connection = ConnectionConfig::from_env()?;

    let remote = CdfRemote::new(&connection)
        .map_err(|e| UploadError::Configuration(e.to_string()))?;

    info!(
        project = %connection.project,
        file = %request.local_path.display(),
        space = %request.target_space,
        "Starting upload workflow"
    );
    cdfup_workflow::run(&remote, &request).await
}

fn print_summary(outcome: &UploadOutcome) {
    let entity = &outcome.entity;
    println!("Uploaded '{}' ({} bytes)", entity.name, outcome.bytes_sent);
    println!("  space:       {}", entity.space);
    println!("  external id: {}", entity.external_id);
    println!("  internal id: {}", entity.id);
    println!("  uploaded:    {}", entity.uploaded);
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error [{}/{}]: {}", err.stage(), err.error_code(), err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
