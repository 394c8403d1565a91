//! Workflow tests against a call-counting in-memory remote.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use cdfup_core::config::UploadRequest;
use cdfup_core::models::{EntityRef, FileEntity, FileEntitySpec, Space};
use cdfup_remote::{RemoteError, RemoteProxy, RemoteResult};
use cdfup_workflow::{ensure_file_entity, resolve_space, run, upload_content};

#[derive(Default)]
struct CallCounts {
    space_exists: usize,
    create_space: usize,
    get_file_entity: usize,
    create_file_entity: usize,
    upload_content: usize,
}

impl CallCounts {
    fn total(&self) -> usize {
        self.space_exists
            + self.create_space
            + self.get_file_entity
            + self.create_file_entity
            + self.upload_content
    }
}

#[derive(Default)]
struct MockState {
    spaces: HashSet<String>,
    entities: HashMap<(String, String), FileEntity>,
    next_id: i64,
    calls: CallCounts,
    fail_space_exists: bool,
    fail_create_space: bool,
    stuck_upload_flag: bool,
}

/// In-memory remote platform with per-operation call counters.
#[derive(Default)]
struct MockRemote {
    state: Mutex<MockState>,
}

impl MockRemote {
    fn new() -> Self {
        let mock = MockRemote::default();
        mock.state.lock().unwrap().next_id = 1000;
        mock
    }

    fn with_space(self, space_id: &str) -> Self {
        self.state.lock().unwrap().spaces.insert(space_id.to_string());
        self
    }

    fn with_entity(self, entity: FileEntity) -> Self {
        self.state.lock().unwrap().entities.insert(
            (entity.space.clone(), entity.external_id.clone()),
            entity,
        );
        self
    }

    fn failing_space_checks(self) -> Self {
        self.state.lock().unwrap().fail_space_exists = true;
        self
    }

    fn failing_space_creates(self) -> Self {
        self.state.lock().unwrap().fail_create_space = true;
        self
    }

    /// Content transfers are accepted but the entity never reports
    /// `uploaded=true`, like a platform that acknowledged the PUT without
    /// registering the content.
    fn with_stuck_upload_flag(self) -> Self {
        self.state.lock().unwrap().stuck_upload_flag = true;
        self
    }

    fn counts<R>(&self, read: impl FnOnce(&CallCounts) -> R) -> R {
        read(&self.state.lock().unwrap().calls)
    }

    fn has_space(&self, space_id: &str) -> bool {
        self.state.lock().unwrap().spaces.contains(space_id)
    }
}

#[async_trait]
impl RemoteProxy for MockRemote {
    async fn space_exists(&self, space_id: &str) -> RemoteResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.space_exists += 1;
        if state.fail_space_exists {
            return Err(RemoteError::Auth("token exchange rejected".to_string()));
        }
        Ok(state.spaces.contains(space_id))
    }

    async fn create_space(
        &self,
        space_id: &str,
        name: &str,
        description: &str,
    ) -> RemoteResult<Space> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_space += 1;
        if state.fail_create_space {
            return Err(RemoteError::Api {
                status: 403,
                message: "space quota exceeded".to_string(),
            });
        }
        state.spaces.insert(space_id.to_string());
        Ok(Space {
            space: space_id.to_string(),
            name: Some(name.to_string()),
            description: Some(description.to_string()),
        })
    }

    async fn get_file_entity(
        &self,
        space_id: &str,
        external_id: &str,
    ) -> RemoteResult<Option<FileEntity>> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_file_entity += 1;
        Ok(state
            .entities
            .get(&(space_id.to_string(), external_id.to_string()))
            .cloned())
    }

    async fn create_file_entity(&self, spec: &FileEntitySpec) -> RemoteResult<FileEntity> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_file_entity += 1;
        state.next_id += 1;
        let entity = FileEntity {
            id: state.next_id,
            external_id: spec.external_id.clone(),
            space: spec.space.clone(),
            name: spec.name.clone(),
            mime_type: spec.mime_type.clone(),
            source: spec.source.clone(),
            metadata: spec.metadata.clone(),
            uploaded: false,
        };
        state.entities.insert(
            (entity.space.clone(), entity.external_id.clone()),
            entity.clone(),
        );
        Ok(entity)
    }

    async fn upload_content(&self, entity: &EntityRef, _data: Bytes) -> RemoteResult<FileEntity> {
        let mut state = self.state.lock().unwrap();
        state.calls.upload_content += 1;
        let key = match entity {
            EntityRef::External { space, external_id } => {
                (space.clone(), external_id.clone())
            }
            EntityRef::Internal(_) => {
                return Err(RemoteError::Api {
                    status: 400,
                    message: "mock only supports external refs".to_string(),
                })
            }
        };
        let stuck = state.stuck_upload_flag;
        match state.entities.get_mut(&key) {
            Some(stored) => {
                if !stuck {
                    stored.uploaded = true;
                }
                Ok(stored.clone())
            }
            None => Err(RemoteError::Api {
                status: 404,
                message: "file entity not found".to_string(),
            }),
        }
    }
}

fn sample_entity(space: &str, external_id: &str, uploaded: bool) -> FileEntity {
    FileEntity {
        id: 7,
        external_id: external_id.to_string(),
        space: space.to_string(),
        name: "sample.txt".to_string(),
        mime_type: Some("text/plain".to_string()),
        source: Some("manual_upload_script".to_string()),
        metadata: HashMap::new(),
        uploaded,
    }
}

fn sample_spec(space: &str, external_id: &str) -> FileEntitySpec {
    FileEntitySpec {
        external_id: external_id.to_string(),
        space: space.to_string(),
        name: "sample.txt".to_string(),
        mime_type: Some("text/plain".to_string()),
        source: Some("manual_upload_script".to_string()),
        metadata: HashMap::new(),
    }
}

fn sample_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn sample_request(path: &std::path::Path) -> UploadRequest {
    let mut request = UploadRequest::new(path, "my_sample_file");
    request.source = Some("manual_upload_script".to_string());
    request
        .metadata
        .insert("description".to_string(), "Sample file".to_string());
    request
}

#[tokio::test]
async fn primary_space_wins_regardless_of_fallback() {
    let remote = MockRemote::new()
        .with_space("sdk_doc_integration_space")
        .with_space("demo_space");
    let resolved = resolve_space(&remote, "sdk_doc_integration_space", "demo_space")
        .await
        .unwrap();
    assert_eq!(resolved, "sdk_doc_integration_space");
    assert_eq!(remote.counts(|c| c.space_exists), 1);
    assert_eq!(remote.counts(|c| c.create_space), 0);
}

#[tokio::test]
async fn existing_fallback_is_used_without_create() {
    let remote = MockRemote::new().with_space("demo_space");
    let resolved = resolve_space(&remote, "sdk_doc_integration_space", "demo_space")
        .await
        .unwrap();
    assert_eq!(resolved, "demo_space");
    assert_eq!(remote.counts(|c| c.space_exists), 2);
    assert_eq!(remote.counts(|c| c.create_space), 0);
}

#[tokio::test]
async fn missing_fallback_is_created_exactly_once() {
    let remote = MockRemote::new();
    let resolved = resolve_space(&remote, "sdk_doc_integration_space", "demo_space")
        .await
        .unwrap();
    assert_eq!(resolved, "demo_space");
    assert_eq!(remote.counts(|c| c.create_space), 1);
    assert!(remote.has_space("demo_space"));
    // The primary is never auto-created.
    assert!(!remote.has_space("sdk_doc_integration_space"));
}

#[tokio::test]
async fn failed_existence_check_is_remote_unavailable() {
    let remote = MockRemote::new().failing_space_checks();
    let err = resolve_space(&remote, "sdk_doc_integration_space", "demo_space")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "REMOTE_UNAVAILABLE");
    // No further calls after the failed check.
    assert_eq!(remote.counts(|c| c.space_exists), 1);
    assert_eq!(remote.counts(|c| c.create_space), 0);
}

#[tokio::test]
async fn failed_fallback_create_is_space_creation_failed() {
    let remote = MockRemote::new().failing_space_creates();
    let err = resolve_space(&remote, "sdk_doc_integration_space", "demo_space")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "SPACE_CREATION_FAILED");
    assert!(err.to_string().contains("demo_space"));
}

#[tokio::test]
async fn ensure_file_entity_is_idempotent() {
    let remote = MockRemote::new().with_space("demo_space");
    let spec = sample_spec("demo_space", "my_sample_file");

    let first = ensure_file_entity(&remote, &spec).await.unwrap();
    let second = ensure_file_entity(&remote, &spec).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(remote.counts(|c| c.create_file_entity), 1);
    assert_eq!(remote.counts(|c| c.get_file_entity), 2);
}

#[tokio::test]
async fn existing_entity_metadata_is_not_overwritten() {
    let mut existing = sample_entity("demo_space", "my_sample_file", false);
    existing
        .metadata
        .insert("owner".to_string(), "data-team".to_string());
    let remote = MockRemote::new()
        .with_space("demo_space")
        .with_entity(existing);

    let mut spec = sample_spec("demo_space", "my_sample_file");
    spec.metadata
        .insert("owner".to_string(), "someone-else".to_string());

    let entity = ensure_file_entity(&remote, &spec).await.unwrap();
    assert_eq!(entity.metadata["owner"], "data-team");
    assert_eq!(remote.counts(|c| c.create_file_entity), 0);
}

#[tokio::test]
async fn upload_never_calls_remote_for_missing_local_file() {
    let remote = MockRemote::new();
    let entity = sample_entity("demo_space", "my_sample_file", false);
    let err = upload_content(&remote, std::path::Path::new("/no/such/sample.txt"), &entity)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "LOCAL_FILE_NOT_FOUND");
    assert_eq!(remote.counts(|c| c.total()), 0);
}

#[tokio::test]
async fn unconfirmed_upload_flag_is_upload_failed() {
    let entity = sample_entity("demo_space", "my_sample_file", false);
    let remote = MockRemote::new()
        .with_space("demo_space")
        .with_entity(entity.clone())
        .with_stuck_upload_flag();
    let file = sample_file("hello\n");

    let err = upload_content(&remote, file.path(), &entity)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "UPLOAD_FAILED");
    assert!(err.to_string().contains("uploaded=false"));
    assert_eq!(remote.counts(|c| c.upload_content), 1);
}

#[tokio::test]
async fn end_to_end_both_spaces_missing() {
    let remote = MockRemote::new();
    let file = sample_file("This is a sample file for testing the uploader.\n");
    let request = sample_request(file.path());

    let outcome = run(&remote, &request).await.unwrap();

    assert!(remote.has_space("demo_space"));
    assert_eq!(outcome.entity.space, "demo_space");
    assert_eq!(outcome.entity.external_id, "my_sample_file");
    assert!(outcome.entity.uploaded);
    assert_eq!(outcome.bytes_sent, 48);
    assert_eq!(remote.counts(|c| c.create_space), 1);
    assert_eq!(remote.counts(|c| c.create_file_entity), 1);
    assert_eq!(remote.counts(|c| c.upload_content), 1);
}

#[tokio::test]
async fn end_to_end_entity_already_provisioned() {
    let remote = MockRemote::new()
        .with_space("sdk_doc_integration_space")
        .with_entity(sample_entity(
            "sdk_doc_integration_space",
            "my_sample_file",
            false,
        ));
    let file = sample_file("hello\n");
    let mut request = sample_request(file.path());
    request.target_space = "sdk_doc_integration_space".to_string();

    let outcome = run(&remote, &request).await.unwrap();

    assert!(outcome.entity.uploaded);
    assert_eq!(outcome.entity.space, "sdk_doc_integration_space");
    // Entity creation was skipped; the upload went straight through.
    assert_eq!(remote.counts(|c| c.create_file_entity), 0);
    assert_eq!(remote.counts(|c| c.create_space), 0);
    assert_eq!(remote.counts(|c| c.upload_content), 1);
}

#[tokio::test]
async fn end_to_end_missing_local_file_makes_zero_remote_calls() {
    let remote = MockRemote::new().with_space("demo_space");
    let request = sample_request(std::path::Path::new("/no/such/sample.txt"));

    let err = run(&remote, &request).await.unwrap_err();

    assert_eq!(err.error_code(), "LOCAL_FILE_NOT_FOUND");
    assert_eq!(err.stage(), "local-file-check");
    assert_eq!(remote.counts(|c| c.total()), 0);
}

#[tokio::test]
async fn end_to_end_auth_failure_stops_before_entity_calls() {
    let remote = MockRemote::new().failing_space_checks();
    let file = sample_file("hello\n");
    let request = sample_request(file.path());

    let err = run(&remote, &request).await.unwrap_err();

    assert_eq!(err.error_code(), "REMOTE_UNAVAILABLE");
    assert_eq!(remote.counts(|c| c.get_file_entity), 0);
    assert_eq!(remote.counts(|c| c.create_file_entity), 0);
    assert_eq!(remote.counts(|c| c.upload_content), 0);
}

#[tokio::test]
async fn orchestrator_rejects_empty_external_id_before_remote_calls() {
    let remote = MockRemote::new();
    let file = sample_file("hello\n");
    let mut request = sample_request(file.path());
    request.file_external_id = String::new();

    let err = run(&remote, &request).await.unwrap_err();

    assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    assert_eq!(remote.counts(|c| c.total()), 0);
}
