//! Configuration module
//!
//! Connection settings come from the environment (the same `COGNITE_*`
//! variables the platform's own tooling uses); the per-run upload request is
//! an explicit struct built by the CLI. Everything is validated before any
//! remote call is made.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Default primary space when the caller does not name one.
pub const DEFAULT_TARGET_SPACE: &str = "sdk_doc_integration_space";

/// Well-known fallback space, auto-provisioned when the primary is absent.
pub const DEFAULT_FALLBACK_SPACE: &str = "demo_space";

/// Credentials and endpoints for the remote platform.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    pub project: String,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub base_url: String,
}

impl ConnectionConfig {
    /// Load the connection config from the environment. All five variables
    /// are required; missing ones are reported together in a single error.
    pub fn from_env() -> Result<Self, UploadError> {
        let mut missing: Vec<&'static str> = Vec::new();
        let mut get = |name: &'static str| match env::var(name) {
            Ok(value) if !value.is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let project = get("COGNITE_PROJECT");
        let client_id = get("COGNITE_CLIENT_ID");
        let client_secret = get("COGNITE_CLIENT_SECRET");
        let tenant_id = get("COGNITE_TENANT_ID");
        let base_url = get("COGNITE_BASE_URL");

        if !missing.is_empty() {
            return Err(UploadError::Configuration(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(ConnectionConfig {
            project,
            client_id,
            client_secret,
            tenant_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// OAuth2 token endpoint for the client-credentials flow.
    pub fn token_url(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.tenant_id
        )
    }

    /// OAuth2 scope granting access to the platform API.
    pub fn scope(&self) -> String {
        format!("{}/.default", self.base_url)
    }
}

/// One upload run: which local file goes where, under what identity.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub target_space: String,
    pub fallback_space: String,
    pub file_external_id: String,
    pub file_name: Option<String>,
    pub source: Option<String>,
    pub mime_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl UploadRequest {
    pub fn new(local_path: impl Into<PathBuf>, file_external_id: impl Into<String>) -> Self {
        UploadRequest {
            local_path: local_path.into(),
            target_space: DEFAULT_TARGET_SPACE.to_string(),
            fallback_space: DEFAULT_FALLBACK_SPACE.to_string(),
            file_external_id: file_external_id.into(),
            file_name: None,
            source: None,
            mime_type: None,
            metadata: HashMap::new(),
        }
    }

    /// Check identifier fields before any remote call is made.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.file_external_id.is_empty() {
            return Err(UploadError::Configuration(
                "File external id must not be empty".to_string(),
            ));
        }
        if self.target_space.is_empty() {
            return Err(UploadError::Configuration(
                "Target space must not be empty".to_string(),
            ));
        }
        if self.fallback_space.is_empty() {
            return Err(UploadError::Configuration(
                "Fallback space must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Display name for the entity: explicit name if given, otherwise the
    /// local file's base name.
    pub fn effective_file_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| {
            self.local_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.file_external_id.clone())
        })
    }

    /// MIME type for the entity: explicit type if given, otherwise guessed
    /// from the file extension.
    pub fn effective_mime_type(&self) -> String {
        self.mime_type
            .clone()
            .unwrap_or_else(|| guess_mime_type(&self.local_path).to_string())
    }
}

/// Guess a MIME type from the file extension, falling back to
/// `application/octet-stream` for anything unrecognized.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "html" | "htm" => "text/html",
        "md" => "text/markdown",
        "parquet" => "application/vnd.apache.parquet",
        _ => "application/octet-stream",
    }
}
