//! # Provider
//!
//! Traits implemented by the host to supply everything external to the
//! library: the current time, session and check result persistence, and the
//! call to the fraud check provider.

use std::future::Future;

pub use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::check::ResultItem;
use crate::check::response::{VerificationRequest, VerificationResponse};
use crate::session::Session;

/// Provider trait bundling the external collaborators the library depends on.
pub trait Provider: Clock + SessionStore + ResultStore + FraudCheck + Clone {}

/// The source of the current time. Injected so expiry checks can be tested.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Secondary indexes a [`SessionStore`] must support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Index {
    /// Sessions by authorization code.
    AuthorizationCode,

    /// Sessions by access token.
    AccessToken,
}

impl Index {
    /// The index name as known to the backing store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorizationCode-index",
            Self::AccessToken => "access-token-index",
        }
    }
}

/// `SessionStore` persists session records. Records are keyed by session id
/// and are also queryable through the secondary indexes in [`Index`].
///
/// Physical deletion of expired records is left to the store (e.g. a TTL
/// attribute); the library never deletes sessions.
pub trait SessionStore: Send + Sync {
    /// Retrieve a session by id. Returns `None` when no record exists.
    fn get(&self, session_id: &str) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// Retrieve every session whose indexed attribute equals `value`. Index
    /// projections may be stale or partial.
    fn query(&self, index: Index, value: &str) -> impl Future<Output = Result<Vec<Session>>> + Send;

    /// Store a new session.
    fn put(&self, session: &Session) -> impl Future<Output = Result<()>> + Send;

    /// Overwrite an existing session. Last write wins.
    fn update(&self, session: &Session) -> impl Future<Output = Result<()>> + Send;
}

/// `ResultStore` persists normalized check results against the session they
/// were performed for.
pub trait ResultStore: Send + Sync {
    /// Store a check result item.
    fn put_result(&self, item: &ResultItem) -> impl Future<Output = Result<()>> + Send;

    /// Retrieve all check result items for a session, in the order stored.
    fn get_results(&self, session_id: &str) -> impl Future<Output = Result<Vec<ResultItem>>> + Send;
}

/// `FraudCheck` performs the call to the third-party fraud check provider.
/// Timeouts, retries, and credentials belong to the implementation.
pub trait FraudCheck: Send + Sync {
    /// Submit a verification request and return the provider's raw response.
    fn check(
        &self, request: &VerificationRequest,
    ) -> impl Future<Output = Result<VerificationResponse>> + Send;
}
