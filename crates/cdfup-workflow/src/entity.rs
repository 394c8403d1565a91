//! File entity provisioning.

use tracing::info;

use cdfup_core::error::UploadError;
use cdfup_core::models::{FileEntity, FileEntitySpec};
use cdfup_remote::RemoteProxy;

/// Ensure a file entity exists at `(spec.space, spec.external_id)`.
///
/// An existing entity is returned unchanged — its metadata is never
/// overwritten, so re-runs after a partial failure are safe. The caller is
/// responsible for having resolved `spec.space` to an existing space first.
pub async fn ensure_file_entity(
    remote: &dyn RemoteProxy,
    spec: &FileEntitySpec,
) -> Result<FileEntity, UploadError> {
    let existing = remote
        .get_file_entity(&spec.space, &spec.external_id)
        .await
        .map_err(|e| UploadError::EntityLookupFailed(e.to_string()))?;

    if let Some(entity) = existing {
        info!(
            space = %entity.space,
            external_id = %entity.external_id,
            id = entity.id,
            uploaded = entity.uploaded,
            "File entity already exists"
        );
        return Ok(entity);
    }

    let created = remote
        .create_file_entity(spec)
        .await
        .map_err(|e| UploadError::EntityCreationFailed(e.to_string()))?;

    info!(
        space = %created.space,
        external_id = %created.external_id,
        id = created.id,
        "File entity created"
    );
    Ok(created)
}
