//! # Credential Endpoint
//!
//! Builds the claims of an identity fraud credential from the check results
//! stored for the session owning a bearer token. Signing the credential is
//! left to the host.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::Config;
use crate::evidence::{AuditEvidence, EvidenceItem, assemble, build_evidence};
use crate::provider::{Provider, ResultStore};
use crate::token::validate_access_token;
use crate::{Error, Result};

/// Unsigned credential claims.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialResponse {
    /// The credential subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Visible evidence.
    pub evidence: Vec<EvidenceItem>,

    /// Provider audit evidence, one entry per stored result.
    pub audit: Vec<AuditEvidence>,
}

/// Credential request handler.
///
/// # Errors
///
/// Returns `Error::AccessDenied` if the bearer token is invalid,
/// `Error::ResultNotFound` if no check results are stored for the session,
/// and `Error::ServerError` if results cannot be retrieved.
#[instrument(level = "debug", skip_all)]
pub async fn credential(
    provider: &impl Provider, config: &Config, authorization: &str,
) -> Result<CredentialResponse> {
    tracing::debug!("credential::authorize");
    let session = validate_access_token(provider, config, authorization).await.into_result()?;

    tracing::debug!("credential::evidence");
    let items = ResultStore::get_results(provider, &session.session_id)
        .await
        .map_err(|e| Error::ServerError(format!("issue retrieving check results: {e}")))?;

    let evidence = build_evidence(&session.session_id, &items)?;
    let audit = assemble(&items).audit;

    Ok(CredentialResponse { sub: session.subject, evidence: vec![evidence], audit })
}
