//! Data models for the upload workflow.
//!
//! These are tagged records holding only the fields the workflow touches —
//! deliberately not a reproduction of the remote platform's full schema type
//! system. Wire structs in the remote crate serialize to/from these shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A data-modeling space: a named logical namespace in the remote platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub space: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A file-metadata record as returned by the remote platform.
///
/// The natural key is `(space, external_id)`; `id` is the platform-assigned
/// internal numeric identifier. `uploaded` flips to true only after the
/// file's content has been received by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntity {
    pub id: i64,
    pub external_id: String,
    pub space: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub uploaded: bool,
}

/// Write-side description of a file entity, before the platform has assigned
/// its internal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntitySpec {
    pub external_id: String,
    pub space: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Reference to an already-provisioned file entity, by natural key or by
/// internal id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    External { space: String, external_id: String },
    Internal(i64),
}

impl EntityRef {
    pub fn of(entity: &FileEntity) -> Self {
        EntityRef::External {
            space: entity.space.clone(),
            external_id: entity.external_id.clone(),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::External { space, external_id } => {
                write!(f, "{}/{}", space, external_id)
            }
            EntityRef::Internal(id) => write!(f, "#{}", id),
        }
    }
}

/// Terminal outcome of a successful workflow run. Not persisted anywhere —
/// used by the orchestrator and CLI to report status.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub entity: FileEntity,
    pub bytes_sent: u64,
}
