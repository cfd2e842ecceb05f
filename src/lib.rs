//! An API for issuing identity fraud credentials.
//!
//! A relying party starts a session, obtains an authorization code, and
//! exchanges a `client_credentials` grant for an opaque bearer token. The
//! token authorizes fraud checks against a third-party provider and the
//! retrieval of the evidence those checks produced.
//!
//! Storage, time, and the provider call are supplied by the host through the
//! traits in [`provider`]. [`Endpoint`] bundles a provider implementation and
//! [`Config`] for use by an HTTP layer.

pub mod check;
pub mod config;
pub mod core;
pub mod credential;
pub mod endpoint;
pub mod error;
pub mod evidence;
pub mod provider;
pub mod session;
pub mod token;
pub mod verify;

pub use crate::config::Config;
pub use crate::endpoint::Endpoint;
pub use crate::error::Error;

/// Result type for fraud check credential operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
