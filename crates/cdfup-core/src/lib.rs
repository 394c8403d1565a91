//! Core types for the CDF uploader workspace.
//!
//! This crate holds the pieces shared by the remote proxy, the workflow, and
//! the CLI: data models for spaces and file entities, the environment-sourced
//! configuration, and the workflow error taxonomy. It performs no I/O.

pub mod config;
pub mod error;
pub mod models;

pub use config::{ConnectionConfig, UploadRequest};
pub use error::UploadError;
pub use models::{EntityRef, FileEntity, FileEntitySpec, Space, UploadOutcome};
