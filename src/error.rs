//! # Errors
//!
//! Errors raised by the session, token, and check result operations. Each
//! variant renders as an OAuth 2.0 style error object so an HTTP layer can
//! return it without further formatting.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Fraud check credential errors.
#[derive(Error, Debug, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// No session exists for the identifier, authorization code, or access
    /// token presented. Ambiguous secondary index lookups are reported the
    /// same way.
    #[error(r#"{{"error": "access_denied", "error_description": "{0}"}}"#)]
    SessionNotFound(String),

    /// The session exists but its overall expiry has passed.
    #[error(r#"{{"error": "access_denied", "error_description": "{0}"}}"#)]
    SessionExpired(String),

    /// The authorization code exists but has expired.
    #[error(r#"{{"error": "invalid_grant", "error_description": "{0}"}}"#)]
    AuthorizationCodeExpired(String),

    /// The access token exists but has expired.
    #[error(r#"{{"error": "invalid_token", "error_description": "{0}"}}"#)]
    AccessTokenExpired(String),

    /// The token request is missing a required parameter, repeats a
    /// parameter, or uses an unsupported grant.
    #[error(r#"{{"error": "invalid_request", "error_description": "{0}"}}"#)]
    AccessTokenValidation(String),

    /// The access token could not be persisted. This is the only error a
    /// caller may retry.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    AccessTokenProcessing(String),

    /// The bearer token presented to a protected operation is not valid.
    #[error(r#"{{"error": "access_denied", "error_description": "{0}"}}"#)]
    AccessDenied(String),

    /// The fraud check provider returned a response type outside of the
    /// `INFO`, `WARN`, and `ERROR` contract.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    UnexpectedResponseType(String),

    /// The call to the fraud check provider failed.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    ThirdParty(String),

    /// No check results have been stored for the session.
    #[error(r#"{{"error": "invalid_request", "error_description": "{0}"}}"#)]
    ResultNotFound(String),

    /// An unexpected condition prevented the request from being fulfilled.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    ServerError(String),
}

impl Error {
    /// The HTTP status code class an outer handler should respond with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::AccessTokenValidation(_) => 400,
            Self::SessionExpired(_)
            | Self::AuthorizationCodeExpired(_)
            | Self::AccessTokenExpired(_)
            | Self::AccessDenied(_) => 401,
            Self::SessionNotFound(_) | Self::ResultNotFound(_) => 404,
            Self::AccessTokenProcessing(_)
            | Self::UnexpectedResponseType(_)
            | Self::ThirdParty(_)
            | Self::ServerError(_) => 500,
        }
    }

    /// Whether the caller may retry the failed operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::AccessTokenProcessing(_))
    }

    /// The OAuth 2.0 error code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) | Self::SessionExpired(_) | Self::AccessDenied(_) => {
                "access_denied"
            }
            Self::AuthorizationCodeExpired(_) => "invalid_grant",
            Self::AccessTokenExpired(_) => "invalid_token",
            Self::AccessTokenValidation(_) | Self::ResultNotFound(_) => "invalid_request",
            Self::AccessTokenProcessing(_)
            | Self::UnexpectedResponseType(_)
            | Self::ThirdParty(_)
            | Self::ServerError(_) => "server_error",
        }
    }

    /// The human readable description of the error.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::SessionNotFound(d)
            | Self::SessionExpired(d)
            | Self::AuthorizationCodeExpired(d)
            | Self::AccessTokenExpired(d)
            | Self::AccessTokenValidation(d)
            | Self::AccessTokenProcessing(d)
            | Self::AccessDenied(d)
            | Self::UnexpectedResponseType(d)
            | Self::ThirdParty(d)
            | Self::ResultNotFound(d)
            | Self::ServerError(d) => d,
        }
    }

    /// Transform the error into an [`OAuthError`] object.
    #[must_use]
    pub fn to_oauth(&self) -> OAuthError {
        OAuthError { error: self.code().into(), error_description: self.description().into() }
    }
}

/// Error response object, as used in OAuth 2.0 error responses and in the
/// `WWW-Authenticate` challenge of protected resources.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct OAuthError {
    /// Error code.
    pub error: String,

    /// Error description.
    pub error_description: String,
}

impl OAuthError {
    /// An `invalid_token` error, as returned for unusable bearer tokens.
    #[must_use]
    pub fn invalid_token(description: impl Into<String>) -> Self {
        Self { error: "invalid_token".into(), error_description: description.into() }
    }
}

impl From<Error> for OAuthError {
    fn from(err: Error) -> Self {
        err.to_oauth()
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_oauth().serialize(serializer)
    }
}
