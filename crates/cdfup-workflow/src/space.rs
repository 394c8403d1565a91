//! Space resolution with fallback.

use tracing::{info, warn};

use cdfup_core::error::UploadError;
use cdfup_remote::RemoteProxy;

/// Resolve the space the upload should target.
///
/// The primary space wins whenever it exists and is never auto-created; only
/// the fallback is provisioned, with a display name derived from its
/// identifier. A failed existence check is `RemoteUnavailable` (distinct
/// from "not found") and aborts the workflow without further remote calls.
pub async fn resolve_space(
    remote: &dyn RemoteProxy,
    primary_id: &str,
    fallback_id: &str,
) -> Result<String, UploadError> {
    let primary_found = remote
        .space_exists(primary_id)
        .await
        .map_err(|e| UploadError::RemoteUnavailable(e.to_string()))?;
    if primary_found {
        info!(space = primary_id, "Target space found");
        return Ok(primary_id.to_string());
    }
    warn!(space = primary_id, fallback = fallback_id, "Target space not found, trying fallback");

    let fallback_found = remote
        .space_exists(fallback_id)
        .await
        .map_err(|e| UploadError::RemoteUnavailable(e.to_string()))?;
    if fallback_found {
        info!(space = fallback_id, "Fallback space found");
        return Ok(fallback_id.to_string());
    }

    info!(space = fallback_id, "Fallback space not found, creating it");
    let created = remote
        .create_space(
            fallback_id,
            &display_name_for(fallback_id),
            "Fallback space provisioned automatically by the file uploader",
        )
        .await
        .map_err(|e| UploadError::SpaceCreationFailed {
            space: fallback_id.to_string(),
            reason: e.to_string(),
        })?;

    info!(space = %created.space, "Fallback space created");
    Ok(created.space)
}

/// Derive a human-readable display name from a space identifier:
/// `demo_space` becomes "Demo Space".
pub fn display_name_for(space_id: &str) -> String {
    space_id
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
