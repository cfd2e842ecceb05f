//! # Endpoint
//!
//! `Endpoint` surfaces the library's operations to an HTTP layer. It owns the
//! host's [`Provider`] and the immutable [`Config`] every operation runs
//! with.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::check::CheckResult;
use crate::config::Config;
use crate::credential::{self, CredentialResponse};
use crate::provider::Provider;
use crate::session::{Session, SessionManager, SessionRequest};
use crate::token::{self, TokenRequest, TokenResponse, ValidationResult};
use crate::verify::{self, VerifyRequest};

/// Response to a successful authorization.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthorizationResponse {
    /// The authorization code issued.
    pub code: String,

    /// Relying party state from the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Where the relying party expects the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

/// Entry point for session, token, verification, and credential requests.
#[derive(Clone, Debug)]
pub struct Endpoint<P: Provider> {
    provider: P,
    config: Config,
}

impl<P: Provider> Endpoint<P> {
    /// Create a new endpoint instance.
    pub const fn new(provider: P, config: Config) -> Self {
        Self { provider, config }
    }

    /// The endpoint's configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Session lifecycle operations.
    pub const fn sessions(&self) -> SessionManager<'_, P> {
        SessionManager::new(&self.provider, &self.config)
    }

    /// Start a new session.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::create_session`].
    pub async fn create_session(&self, request: SessionRequest) -> Result<Session> {
        self.sessions().create_session(request).await
    }

    /// Issue an authorization code for an unexpired session.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` or `Error::SessionExpired` if the
    /// session is unusable and `Error::ServerError` if the code cannot be
    /// stored.
    pub async fn authorize(&self, session_id: &str) -> Result<AuthorizationResponse> {
        let sessions = self.sessions();
        let mut session = sessions.validate_session_id(session_id).await?;
        sessions.create_authorization_code(&mut session).await?;

        Ok(AuthorizationResponse {
            code: session.authorization_code.unwrap_or_default(),
            state: session.state,
            redirect_uri: session.redirect_uri,
        })
    }

    /// Issue an access token.
    ///
    /// # Errors
    ///
    /// See [`token::token`].
    pub async fn token(&self, request: &TokenRequest) -> Result<TokenResponse> {
        token::token(&self.provider, &self.config, request).await
    }

    /// Validate an `Authorization: Bearer` header value.
    pub async fn validate_access_token(&self, authorization: &str) -> ValidationResult {
        token::validate_access_token(&self.provider, &self.config, authorization).await
    }

    /// Run fraud checks for the session owning the bearer token.
    ///
    /// # Errors
    ///
    /// See [`verify::verify`].
    pub async fn verify(
        &self, authorization: &str, request: VerifyRequest,
    ) -> Result<Vec<CheckResult>> {
        verify::verify(&self.provider, &self.config, authorization, request).await
    }

    /// Build credential claims for the session owning the bearer token.
    ///
    /// # Errors
    ///
    /// See [`credential::credential`].
    pub async fn credential(&self, authorization: &str) -> Result<CredentialResponse> {
        credential::credential(&self.provider, &self.config, authorization).await
    }
}
