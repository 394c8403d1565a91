//! Content upload.

use std::path::Path;

use bytes::Bytes;
use tracing::info;

use cdfup_core::error::UploadError;
use cdfup_core::models::{EntityRef, FileEntity, UploadOutcome};
use cdfup_remote::RemoteProxy;

/// Check that `path` resolves to a readable regular file. Runs before any
/// remote round trip so a typo'd path costs nothing.
pub fn check_local_file(path: &Path) -> Result<(), UploadError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(UploadError::LocalFileNotFound(path.to_path_buf())),
    }
}

/// Push the local file's bytes to an already-provisioned entity.
///
/// The file is read immediately before the remote call and the handle is
/// released on every exit path. Success requires the returned entity to
/// report `uploaded=true`; a transfer the platform accepted without flipping
/// the flag is still a failure.
pub async fn upload_content(
    remote: &dyn RemoteProxy,
    local_path: &Path,
    entity: &FileEntity,
) -> Result<UploadOutcome, UploadError> {
    check_local_file(local_path)?;

    let data = tokio::fs::read(local_path)
        .await
        .map_err(|_| UploadError::LocalFileNotFound(local_path.to_path_buf()))?;
    let bytes_sent = data.len() as u64;

    info!(
        path = %local_path.display(),
        bytes = bytes_sent,
        entity = %EntityRef::of(entity),
        "Uploading file content"
    );

    let refreshed = remote
        .upload_content(&EntityRef::of(entity), Bytes::from(data))
        .await
        .map_err(|e| UploadError::UploadFailed(e.to_string()))?;

    if !refreshed.uploaded {
        return Err(UploadError::UploadFailed(format!(
            "Platform accepted the content but entity {} still reports uploaded=false",
            EntityRef::of(&refreshed)
        )));
    }

    info!(
        entity = %EntityRef::of(&refreshed),
        id = refreshed.id,
        "Content upload confirmed"
    );
    Ok(UploadOutcome {
        entity: refreshed,
        bytes_sent,
    })
}
