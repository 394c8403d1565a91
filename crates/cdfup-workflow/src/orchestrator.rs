//! Workflow orchestration.

use tracing::info;

use cdfup_core::config::UploadRequest;
use cdfup_core::error::UploadError;
use cdfup_core::models::{FileEntitySpec, UploadOutcome};
use cdfup_remote::RemoteProxy;

/// Run the full upload workflow: resolve space, ensure the file entity,
/// upload content. Short-circuits on the first failure and never rolls back
/// earlier stages — remote creates are idempotent, so a re-run resumes from
/// the point of failure without duplicates.
///
/// The local path is validated before the first remote call; a missing file
/// costs zero round trips.
pub async fn run(
    remote: &dyn RemoteProxy,
    request: &UploadRequest,
) -> Result<UploadOutcome, UploadError> {
    request.validate()?;
    crate::upload::check_local_file(&request.local_path)?;

    let space = crate::space::resolve_space(
        remote,
        &request.target_space,
        &request.fallback_space,
    )
    .await?;

    let spec = FileEntitySpec {
        external_id: request.file_external_id.clone(),
        space,
        name: request.effective_file_name(),
        mime_type: Some(request.effective_mime_type()),
        source: request.source.clone(),
        metadata: request.metadata.clone(),
    };
    let entity = crate::entity::ensure_file_entity(remote, &spec).await?;

    let outcome = crate::upload::upload_content(remote, &request.local_path, &entity).await?;

    info!(
        space = %outcome.entity.space,
        external_id = %outcome.entity.external_id,
        id = outcome.entity.id,
        bytes = outcome.bytes_sent,
        "Upload workflow finished"
    );
    Ok(outcome)
}
