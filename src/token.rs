//! # Token Endpoint
//!
//! The Token Endpoint issues an opaque bearer Access Token in exchange for a
//! valid `client_credentials` grant. It is used in the same manner as defined
//! in [RFC6749](https://tools.ietf.org/html/rfc6749#section-4.4).
//!
//! When the request also carries an authorization `code`, the token is bound
//! to the session owning that code and the code is consumed. Otherwise a new
//! session record is created to hold the token.
//!
//! Protected operations present the token in an `Authorization: Bearer`
//! header, checked with [`validate_access_token`].

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::Config;
use crate::core::generate;
use crate::error::OAuthError;
use crate::provider::Provider;
use crate::session::{Session, SessionManager, SessionRequest};
use crate::{Error, Result};

/// The only grant type accepted by the token endpoint.
pub const CLIENT_CREDENTIALS: &str = "client_credentials";

/// A form-encoded token request. Parameters are kept in the order received,
/// duplicates included, so repeated parameters can be rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenRequest {
    params: Vec<(String, String)>,
}

/// A validated token grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    /// Requested scope.
    pub scope: String,

    /// Authorization code to bind the token to, if any.
    pub code: Option<String>,
}

impl TokenRequest {
    /// Create a request from name/value pairs.
    pub fn new<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { params: params.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Decode an `application/x-www-form-urlencoded` request body.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessTokenValidation` if a name or value is not valid
    /// percent-encoded UTF-8.
    pub fn form_decode(body: &str) -> Result<Self> {
        let decode = |s: &str| {
            urlencoding::decode(&s.replace('+', " "))
                .map(|v| v.into_owned())
                .map_err(|e| Error::AccessTokenValidation(format!("invalid form encoding: {e}")))
        };

        let mut params = Vec::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.push((decode(name)?, decode(value)?));
        }
        Ok(Self { params })
    }

    /// Encode the request as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form_encode(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Check the request carries exactly one `grant_type` of
    /// `client_credentials`, exactly one non-empty `scope`, and at most one
    /// `code`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessTokenValidation` describing the first problem
    /// found.
    pub fn validate(&self) -> Result<Grant> {
        let grant_type = self.single("grant_type")?;
        if grant_type != CLIENT_CREDENTIALS {
            return Err(Error::AccessTokenValidation(format!(
                "unsupported `grant_type`: {grant_type}"
            )));
        }

        let scope = self.single("scope")?;
        if scope.trim().is_empty() {
            return Err(Error::AccessTokenValidation("`scope` is empty".into()));
        }

        let code = match self.values("code").as_slice() {
            [] => None,
            [code] => Some((*code).to_string()),
            _ => return Err(Error::AccessTokenValidation("duplicate `code` parameter".into())),
        };

        Ok(Grant { scope: scope.to_string(), code })
    }

    fn values(&self, name: &str) -> Vec<&str> {
        self.params.iter().filter(|(k, _)| k == name).map(|(_, v)| v.as_str()).collect()
    }

    fn single(&self, name: &str) -> Result<&str> {
        match self.values(name).as_slice() {
            [] => Err(Error::AccessTokenValidation(format!("missing `{name}` parameter"))),
            [value] => Ok(*value),
            _ => Err(Error::AccessTokenValidation(format!("duplicate `{name}` parameter"))),
        }
    }
}

/// Access token type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum TokenType {
    /// A bearer token.
    #[default]
    Bearer,
}

/// Successful token response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// The access token issued.
    pub access_token: String,

    /// Always `Bearer`.
    pub token_type: TokenType,

    /// The granted scope.
    pub scope: String,

    /// Lifetime of the access token, in seconds.
    pub expires_in: i64,
}

/// Token request handler.
///
/// # Errors
///
/// Returns `Error::AccessTokenValidation` for a malformed grant and
/// `Error::AccessTokenProcessing` if the session store fails. When the
/// request carries a `code`, not found and expiry errors from the
/// authorization code lookup are returned unchanged.
#[instrument(level = "debug", skip_all)]
pub async fn token(
    provider: &impl Provider, config: &Config, request: &TokenRequest,
) -> Result<TokenResponse> {
    tracing::debug!("token::validate");
    let grant = request.validate()?;

    tracing::debug!("token::process");
    let sessions = SessionManager::new(provider, config);

    let mut session = match &grant.code {
        Some(code) => sessions.get_session_by_authorization_code(code).await.map_err(|e| match e {
            Error::ServerError(d) => {
                Error::AccessTokenProcessing(format!("issue retrieving session: {d}"))
            }
            e => e,
        })?,
        None => sessions.create_session(SessionRequest::default()).await.map_err(|e| {
            Error::AccessTokenProcessing(format!("issue creating session: {}", e.description()))
        })?,
    };

    let access_token = generate::token();
    sessions.create_access_token(&mut session, &access_token).await?;

    Ok(TokenResponse {
        access_token,
        token_type: TokenType::Bearer,
        scope: grant.scope,
        expires_in: config.access_token_ttl,
    })
}

/// The outcome of validating a bearer token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// The session owning the token, when valid.
    pub session: Option<Session>,

    /// Why the token was rejected, when invalid.
    pub error: Option<OAuthError>,
}

impl ValidationResult {
    const fn valid(session: Session) -> Self {
        Self { session: Some(session), error: None }
    }

    const fn invalid(error: OAuthError) -> Self {
        Self { session: None, error: Some(error) }
    }

    /// Whether the token is valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.session.is_some()
    }

    /// Convert into a `Result`, for handlers that continue with the session.
    ///
    /// # Errors
    ///
    /// Returns `Error::ServerError` when the token could not be checked
    /// against the session store, and `Error::AccessDenied` carrying the
    /// validation error description when the token is invalid.
    pub fn into_result(self) -> Result<Session> {
        match (self.session, self.error) {
            (Some(session), _) => Ok(session),
            (None, Some(error)) if error.error == "server_error" => {
                Err(Error::ServerError(error.error_description))
            }
            (None, Some(error)) => Err(Error::AccessDenied(error.error_description)),
            (None, None) => Err(Error::AccessDenied("access token is invalid".into())),
        }
    }
}

/// Validate the value of an `Authorization` header carrying a bearer token.
/// Failures are reported in the result, never as an error.
#[instrument(level = "debug", skip_all)]
pub async fn validate_access_token(
    provider: &impl Provider, config: &Config, authorization: &str,
) -> ValidationResult {
    let Some(access_token) = bearer_token(authorization) else {
        return ValidationResult::invalid(OAuthError::invalid_token(
            "authorization header is not a bearer token",
        ));
    };

    match SessionManager::new(provider, config).get_session_by_access_token(access_token).await {
        Ok(session) => ValidationResult::valid(session),
        Err(Error::ServerError(e)) => {
            tracing::error!("access token lookup failed: {e}");
            ValidationResult::invalid(Error::ServerError(e).to_oauth())
        }
        Err(e) => {
            tracing::debug!("access token rejected: {e}");
            ValidationResult::invalid(OAuthError::invalid_token(e.to_oauth().error_description))
        }
    }
}

// Extract the token from a `Bearer <token>` header value. Scheme and token
// are separated by exactly one space.
fn bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
