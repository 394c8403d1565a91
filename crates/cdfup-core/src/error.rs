//! Error types module
//!
//! All workflow failures are unified under the `UploadError` enum. Each
//! variant corresponds to one failure mode of the upload pipeline; none of
//! them is retried automatically — re-running the whole workflow is the
//! recovery path, which the remote platform's idempotent creates make safe.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Remote platform unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Failed to create space '{space}': {reason}")]
    SpaceCreationFailed { space: String, reason: String },

    #[error("File entity lookup failed: {0}")]
    EntityLookupFailed(String),

    #[error("File entity creation failed: {0}")]
    EntityCreationFailed(String),

    #[error("Local file not found or not readable: {}", .0.display())]
    LocalFileNotFound(PathBuf),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

impl UploadError {
    /// Name of the workflow stage that produced this error, for operator
    /// output and logs.
    pub fn stage(&self) -> &'static str {
        match self {
            UploadError::Configuration(_) => "configuration",
            UploadError::RemoteUnavailable(_) => "space-resolution",
            UploadError::SpaceCreationFailed { .. } => "space-resolution",
            UploadError::EntityLookupFailed(_) => "entity-provisioning",
            UploadError::EntityCreationFailed(_) => "entity-provisioning",
            UploadError::LocalFileNotFound(_) => "local-file-check",
            UploadError::UploadFailed(_) => "content-upload",
        }
    }

    /// Machine-readable error code (e.g. "UPLOAD_FAILED").
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Configuration(_) => "CONFIGURATION_ERROR",
            UploadError::RemoteUnavailable(_) => "REMOTE_UNAVAILABLE",
            UploadError::SpaceCreationFailed { .. } => "SPACE_CREATION_FAILED",
            UploadError::EntityLookupFailed(_) => "ENTITY_LOOKUP_FAILED",
            UploadError::EntityCreationFailed(_) => "ENTITY_CREATION_FAILED",
            UploadError::LocalFileNotFound(_) => "LOCAL_FILE_NOT_FOUND",
            UploadError::UploadFailed(_) => "UPLOAD_FAILED",
        }
    }

    /// Process exit code. Configuration failures exit 2 (bad invocation,
    /// nothing was attempted remotely); every workflow-stage failure exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            UploadError::Configuration(_) => 2,
            _ => 1,
        }
    }
}
