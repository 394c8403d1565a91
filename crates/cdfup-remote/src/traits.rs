//! Remote proxy abstraction trait
//!
//! This module defines the trait every remote backend must implement, plus
//! the transport-level error type. "Not found" is an ordinary result here
//! (`Ok(false)` / `Ok(None)`), never an error: the workflow's fallback logic
//! is written as explicit existence checks, not exception handling.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use cdfup_core::models::{EntityRef, FileEntity, FileEntitySpec, Space};

/// Transport-level remote call errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl RemoteError {
    /// Whether this error came from the auth layer (token exchange or a
    /// 401/403 response) rather than the operation itself.
    pub fn is_auth(&self) -> bool {
        matches!(self, RemoteError::Auth(_))
    }
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote platform operations consumed by the upload workflow.
///
/// The concrete implementation is the CDF REST API; tests substitute a
/// call-counting mock. Every method is a single logical remote round trip —
/// the workflow sequences them strictly and never fans out.
#[async_trait]
pub trait RemoteProxy: Send + Sync {
    /// Check whether a data-modeling space exists.
    async fn space_exists(&self, space_id: &str) -> RemoteResult<bool>;

    /// Create a space. Idempotent on the remote side: re-applying the same
    /// identifier and attributes is a no-op update.
    async fn create_space(
        &self,
        space_id: &str,
        name: &str,
        description: &str,
    ) -> RemoteResult<Space>;

    /// Fetch a file entity by its natural key, `None` if absent.
    async fn get_file_entity(
        &self,
        space_id: &str,
        external_id: &str,
    ) -> RemoteResult<Option<FileEntity>>;

    /// Create a file entity. The platform returns the fully populated record
    /// including the internal id and `uploaded=false`.
    async fn create_file_entity(&self, spec: &FileEntitySpec) -> RemoteResult<FileEntity>;

    /// Push file content to an already-provisioned entity and return the
    /// entity's post-upload state (`uploaded=true` on success).
    async fn upload_content(&self, entity: &EntityRef, data: Bytes) -> RemoteResult<FileEntity>;
}
