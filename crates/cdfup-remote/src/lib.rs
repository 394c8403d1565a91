//! Remote client proxy for Cognite Data Fusion.
//!
//! The workflow crate talks to the platform exclusively through the
//! [`RemoteProxy`] trait defined here; [`CdfRemote`] is the reqwest-backed
//! implementation against the CDF v1 REST API, authenticating with an OAuth2
//! client-credentials bearer token.

pub mod auth;
pub mod cdf;
pub mod traits;

pub use auth::TokenProvider;
pub use cdf::CdfRemote;
pub use traits::{RemoteError, RemoteProxy, RemoteResult};
