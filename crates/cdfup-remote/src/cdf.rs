//! CDF v1 REST implementation of the remote proxy.
//!
//! Lookups go through the POST `byids` endpoints with `ignoreUnknownIds` so
//! a miss comes back as an empty item list rather than an error status.
//! Content upload is a three-step round trip behind one trait method:
//! request an upload link, PUT the bytes to it, refetch the entity to
//! observe the `uploaded` flag.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::traits::{RemoteError, RemoteProxy, RemoteResult};
use cdfup_core::config::ConnectionConfig;
use cdfup_core::models::{EntityRef, FileEntity, FileEntitySpec, Space};

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Reqwest-backed client for the CDF v1 API.
pub struct CdfRemote {
    http: reqwest::Client,
    base_url: String,
    project: String,
    auth: TokenProvider,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemsRequest<T> {
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_unknown_ids: Option<bool>,
}

#[derive(Deserialize)]
struct ItemsResponse<T> {
    items: Vec<T>,
}

#[derive(Serialize)]
struct SpaceIdItem {
    space: String,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
enum FileIdItem {
    #[serde(rename_all = "camelCase")]
    External { external_id: String, space: String },
    Internal { id: i64 },
}

impl FileIdItem {
    fn from_ref(entity: &EntityRef) -> Self {
        match entity {
            EntityRef::External { space, external_id } => FileIdItem::External {
                external_id: external_id.clone(),
                space: space.clone(),
            },
            EntityRef::Internal(id) => FileIdItem::Internal { id: *id },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadLinkResponse {
    upload_url: String,
}

impl CdfRemote {
    pub fn new(config: &ConnectionConfig) -> RemoteResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let auth = TokenProvider::new(http.clone(), config);
        Ok(CdfRemote {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project: config.project.clone(),
            auth,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/projects/{}{}", self.base_url, self.project, path)
    }

    /// POST a JSON body to a project-scoped path and deserialize the
    /// response, mapping HTTP failures onto `RemoteError`.
    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteResult<T> {
        let token = self.auth.bearer_token().await?;
        let url = self.api_url(path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(RemoteError::Auth(format!("{}: {}", status, message)));
            }
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to parse response as JSON: {}", e)))
    }
}

#[async_trait]
impl RemoteProxy for CdfRemote {
    async fn space_exists(&self, space_id: &str) -> RemoteResult<bool> {
        debug!(space = space_id, "Checking space existence");
        let request = ItemsRequest {
            items: vec![SpaceIdItem {
                space: space_id.to_string(),
            }],
            ignore_unknown_ids: Some(true),
        };
        let response: ItemsResponse<Space> =
            self.post_json("/models/spaces/byids", &request).await?;
        Ok(!response.items.is_empty())
    }

    async fn create_space(
        &self,
        space_id: &str,
        name: &str,
        description: &str,
    ) -> RemoteResult<Space> {
        debug!(space = space_id, "Applying space");
        let request = ItemsRequest {
            items: vec![Space {
                space: space_id.to_string(),
                name: Some(name.to_string()),
                description: Some(description.to_string()),
            }],
            ignore_unknown_ids: None,
        };
        let response: ItemsResponse<Space> = self.post_json("/models/spaces", &request).await?;
        response.items.into_iter().next().ok_or_else(|| RemoteError::Api {
            status: 200,
            message: "Space apply returned no items".to_string(),
        })
    }

    async fn get_file_entity(
        &self,
        space_id: &str,
        external_id: &str,
    ) -> RemoteResult<Option<FileEntity>> {
        debug!(space = space_id, external_id, "Fetching file entity");
        let request = ItemsRequest {
            items: vec![FileIdItem::External {
                external_id: external_id.to_string(),
                space: space_id.to_string(),
            }],
            ignore_unknown_ids: Some(true),
        };
        let response: ItemsResponse<FileEntity> =
            self.post_json("/files/byids", &request).await?;
        Ok(response.items.into_iter().next())
    }

    async fn create_file_entity(&self, spec: &FileEntitySpec) -> RemoteResult<FileEntity> {
        debug!(space = %spec.space, external_id = %spec.external_id, "Creating file entity");
        // The create response carries an uploadUrl alongside the metadata;
        // it is ignored here because the upload step requests a fresh link
        // (the entity may predate this run).
        self.post_json("/files", spec).await
    }

    async fn upload_content(&self, entity: &EntityRef, data: Bytes) -> RemoteResult<FileEntity> {
        debug!(entity = %entity, bytes = data.len(), "Uploading file content");
        let link: UploadLinkResponse = self
            .post_json(
                "/files/uploadlink",
                &ItemsRequest {
                    items: vec![FileIdItem::from_ref(entity)],
                    ignore_unknown_ids: None,
                },
            )
            .await?;

        // The upload URL is pre-signed; no bearer header.
        let response = self
            .http
            .put(&link.upload_url)
            .body(data)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("Content upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Refetch so the caller sees the post-upload state.
        let request = ItemsRequest {
            items: vec![FileIdItem::from_ref(entity)],
            ignore_unknown_ids: Some(true),
        };
        let refreshed: ItemsResponse<FileEntity> =
            self.post_json("/files/byids", &request).await?;
        refreshed.items.into_iter().next().ok_or_else(|| RemoteError::Api {
            status: 200,
            message: format!("File entity {} vanished after upload", entity),
        })
    }
}
