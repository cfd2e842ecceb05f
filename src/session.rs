//! # Session Lifecycle
//!
//! A [`Session`] tracks a single identity fraud check attempt across the
//! authorization, token, and result phases. The [`SessionManager`] is the one
//! place that decides whether a session, authorization code, or access token
//! is still usable.
//!
//! A session carries three independent expiries: its own, the authorization
//! code's, and the access token's. Each is compared against the current time
//! when the session is read. Nothing is purged eagerly; physical deletion of
//! stale records is left to the store.

use anyhow::anyhow;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::Config;
use crate::core::generate;
use crate::provider::{Clock, Index, Provider, SessionStore};
use crate::{Error, Result};

/// A relying party's identity fraud check session.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier (a UUID).
    pub session_id: String,

    /// Time the session expires, in epoch seconds.
    pub expiry_date: i64,

    /// The relying party client the session was started by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Where the relying party expects the authorization response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Opaque relying party state, returned with the authorization response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// The subject the fraud check is performed for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// The most recently issued authorization code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,

    /// Time the authorization code expires, in epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code_expiry_date: Option<i64>,

    /// The most recently issued access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Time the access token expires, in epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_expiry_date: Option<i64>,
}

impl Session {
    /// Whether the session itself has expired at `now` (epoch seconds).
    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        self.expiry_date < now
    }

    /// Whether the authorization code has expired at `now`. A code with no
    /// recorded expiry is treated as expired.
    #[must_use]
    pub fn authorization_code_expired(&self, now: i64) -> bool {
        self.authorization_code_expiry_date.is_none_or(|expiry| expiry < now)
    }

    /// Whether the access token has expired at `now`. A token with no
    /// recorded expiry is treated as expired.
    #[must_use]
    pub fn access_token_expired(&self, now: i64) -> bool {
        self.access_token_expiry_date.is_none_or(|expiry| expiry < now)
    }

    // The session's value for the attribute `index` covers.
    fn indexed_value(&self, index: Index) -> Option<&str> {
        match index {
            Index::AuthorizationCode => self.authorization_code.as_deref(),
            Index::AccessToken => self.access_token.as_deref(),
        }
    }
}

/// Relying party details used to start a new session.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionRequest {
    /// The relying party client.
    pub client_id: Option<String>,

    /// Where the relying party expects the authorization response.
    pub redirect_uri: Option<String>,

    /// Opaque relying party state.
    pub state: Option<String>,

    /// The subject the fraud check is performed for.
    pub subject: Option<String>,
}

/// Creates and validates sessions, authorization codes, and access tokens.
#[derive(Debug)]
pub struct SessionManager<'a, P: Provider> {
    provider: &'a P,
    config: &'a Config,
}

impl<'a, P: Provider> SessionManager<'a, P> {
    /// Create a manager over the given provider and configuration.
    pub const fn new(provider: &'a P, config: &'a Config) -> Self {
        Self { provider, config }
    }

    /// Start a new session with empty authorization code and access token.
    ///
    /// # Errors
    ///
    /// Returns `Error::ServerError` if the session cannot be stored.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self, request: SessionRequest) -> Result<Session> {
        let expiry_date = self
            .expires_at(self.config.session_duration())
            .map_err(|e| Error::ServerError(format!("issue creating session: {e}")))?;
        let session = Session {
            session_id: generate::session_id(),
            expiry_date,
            client_id: request.client_id,
            redirect_uri: request.redirect_uri,
            state: request.state,
            subject: request.subject,
            ..Session::default()
        };

        SessionStore::put(self.provider, &session)
            .await
            .map_err(|e| Error::ServerError(format!("issue saving session: {e}")))?;
        tracing::debug!(session_id = %session.session_id, "session created");

        Ok(session)
    }

    /// Issue a fresh authorization code for the session, replacing any
    /// previous code.
    ///
    /// # Errors
    ///
    /// Returns `Error::ServerError` if the session cannot be updated.
    #[instrument(level = "debug", skip_all, fields(session_id = %session.session_id))]
    pub async fn create_authorization_code(&self, session: &mut Session) -> Result<()> {
        let expiry = self
            .expires_at(self.config.authorization_code_duration())
            .map_err(|e| Error::ServerError(format!("issue creating authorization code: {e}")))?;
        session.authorization_code = Some(generate::auth_code());
        session.authorization_code_expiry_date = Some(expiry);

        SessionStore::update(self.provider, session)
            .await
            .map_err(|e| Error::ServerError(format!("issue saving authorization code: {e}")))
    }

    /// Record an access token against the session. Any authorization code is
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessTokenProcessing` if the session cannot be
    /// updated.
    #[instrument(level = "debug", skip_all, fields(session_id = %session.session_id))]
    pub async fn create_access_token(&self, session: &mut Session, access_token: &str) -> Result<()> {
        let expiry = self
            .expires_at(self.config.access_token_duration())
            .map_err(|e| Error::AccessTokenProcessing(format!("issue creating access token: {e}")))?;
        session.access_token = Some(access_token.to_string());
        session.access_token_expiry_date = Some(expiry);
        session.authorization_code = None;
        session.authorization_code_expiry_date = None;

        SessionStore::update(self.provider, session)
            .await
            .map_err(|e| Error::AccessTokenProcessing(format!("issue saving access token: {e}")))
    }

    /// Retrieve an unexpired session by id. Authorization code and access
    /// token expiries are not checked.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` when no session exists and
    /// `Error::SessionExpired` when the session has expired.
    #[instrument(level = "debug", skip(self))]
    pub async fn validate_session_id(&self, session_id: &str) -> Result<Session> {
        let session = SessionStore::get(self.provider, session_id)
            .await
            .map_err(|e| Error::ServerError(format!("issue retrieving session: {e}")))?;
        let Some(session) = session else {
            return Err(Error::SessionNotFound("session not found".into()));
        };

        if session.is_expired(self.now()) {
            return Err(Error::SessionExpired("session expired".into()));
        }
        Ok(session)
    }

    /// Retrieve the session owning an unexpired access token.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` unless exactly one session holds the
    /// token, `Error::SessionExpired` when that session has expired, and
    /// `Error::AccessTokenExpired` when the token has expired.
    #[instrument(level = "debug", skip_all)]
    pub async fn get_session_by_access_token(&self, access_token: &str) -> Result<Session> {
        self.find(Index::AccessToken, access_token).await
    }

    /// Retrieve the session owning an unexpired authorization code.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` unless exactly one session holds the
    /// code, `Error::SessionExpired` when that session has expired, and
    /// `Error::AuthorizationCodeExpired` when the code has expired.
    #[instrument(level = "debug", skip_all)]
    pub async fn get_session_by_authorization_code(&self, code: &str) -> Result<Session> {
        self.find(Index::AuthorizationCode, code).await
    }

    // Resolve a session through a secondary index. The index hit is only used
    // to learn the session id: the record is re-read by primary key before
    // any expiry decision, as index projections may lag the base record.
    async fn find(&self, index: Index, value: &str) -> Result<Session> {
        let matches = SessionStore::query(self.provider, index, value)
            .await
            .map_err(|e| Error::ServerError(format!("issue querying {}: {e}", index.name())))?;

        let [indexed] = matches.as_slice() else {
            if matches.is_empty() {
                tracing::debug!(index = index.name(), "no session matched index");
            } else {
                tracing::warn!(index = index.name(), matches = matches.len(), "ambiguous index");
            }
            return Err(Error::SessionNotFound("session not found".into()));
        };

        let session = self.validate_session_id(&indexed.session_id).await?;
        if session.indexed_value(index) != Some(value) {
            tracing::warn!(index = index.name(), "index entry is stale");
            return Err(Error::SessionNotFound("session not found".into()));
        }

        let now = self.now();
        match index {
            Index::AuthorizationCode if session.authorization_code_expired(now) => {
                Err(Error::AuthorizationCodeExpired("authorization code expired".into()))
            }
            Index::AccessToken if session.access_token_expired(now) => {
                Err(Error::AccessTokenExpired("access token expired".into()))
            }
            _ => Ok(session),
        }
    }

    fn now(&self) -> i64 {
        Clock::now(self.provider).timestamp()
    }

    // Epoch seconds `ttl` from now.
    fn expires_at(&self, ttl: TimeDelta) -> anyhow::Result<i64> {
        Clock::now(self.provider)
            .checked_add_signed(ttl)
            .map(|expiry| expiry.timestamp())
            .ok_or_else(|| anyhow!("expiry out of range"))
    }
}
