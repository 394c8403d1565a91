//! The upload-with-fallback workflow.
//!
//! Three causally ordered stages over the remote proxy, sequenced by the
//! orchestrator:
//!
//! 1. [`space::resolve_space`] — find the primary space or fall back to the
//!    auto-provisionable secondary.
//! 2. [`entity::ensure_file_entity`] — idempotently provision the
//!    file-metadata entity in the resolved space.
//! 3. [`upload::upload_content`] — push the local file's bytes and confirm
//!    the entity reports `uploaded=true`.
//!
//! Every stage failure aborts the remaining sequence; nothing is rolled
//! back, because remote creates are idempotent and a re-run resumes safely.

pub mod entity;
pub mod orchestrator;
pub mod space;
pub mod upload;

pub use entity::ensure_file_entity;
pub use orchestrator::run;
pub use space::resolve_space;
pub use upload::upload_content;
