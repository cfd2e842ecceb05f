//! # Verification Endpoint
//!
//! Runs fraud checks for the session owning a bearer token. Impersonation
//! risk checks are submitted to the provider as their own transaction; all
//! other checks share one. Each provider response is normalized, mapped to
//! contra-indicators, and stored against the session as a [`ResultItem`].

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::check::mapper::{ContraIndicatorMapper, identity_fraud_score};
use crate::check::normalize::normalize;
use crate::check::response::{PersonIdentity, VerificationRequest};
use crate::check::{CheckResult, CheckType, ResultItem};
use crate::config::Config;
use crate::provider::{FraudCheck, Provider, ResultStore};
use crate::session::Session;
use crate::token::validate_access_token;
use crate::{Error, Result};

/// Checks performed when a request does not name any.
pub const DEFAULT_CHECKS: [CheckType; 4] = [
    CheckType::MortalityCheck,
    CheckType::IdentityTheftCheck,
    CheckType::SyntheticIdentityCheck,
    CheckType::ActivityHistoryCheck,
];

/// Request to run fraud checks for a person.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// The person to check.
    pub person: PersonIdentity,

    /// The checks to run. Defaults to [`DEFAULT_CHECKS`] when empty.
    #[serde(default)]
    pub check_types: Vec<CheckType>,
}

/// Verification request handler. Returns one normalized result per provider
/// transaction, in submission order.
///
/// # Errors
///
/// Returns `Error::AccessDenied` if the bearer token is invalid,
/// `Error::ThirdParty` if the provider call fails,
/// `Error::UnexpectedResponseType` if the provider breaks its response
/// contract, and `Error::ServerError` if a result cannot be stored.
#[instrument(level = "debug", skip_all)]
pub async fn verify(
    provider: &impl Provider, config: &Config, authorization: &str, request: VerifyRequest,
) -> Result<Vec<CheckResult>> {
    tracing::debug!("verify::authorize");
    let session = validate_access_token(provider, config, authorization).await.into_result()?;

    let check_types =
        if request.check_types.is_empty() { DEFAULT_CHECKS.to_vec() } else { request.check_types };
    let (impersonation, fraud): (Vec<_>, Vec<_>) =
        check_types.into_iter().partition(|ct| ct.policy().own_txn);

    let mut results = Vec::new();
    for group in [fraud, impersonation] {
        if group.is_empty() {
            continue;
        }
        let result = check(provider, config, &session, &request.person, group).await?;
        results.push(result);
    }

    Ok(results)
}

// Run a single provider transaction and store its outcome.
async fn check(
    provider: &impl Provider, config: &Config, session: &Session, person: &PersonIdentity,
    check_types: Vec<CheckType>,
) -> Result<CheckResult> {
    tracing::debug!("verify::check");
    let request = VerificationRequest {
        client_reference_id: session.session_id.clone(),
        person: person.clone(),
        check_types,
    };
    let response = FraudCheck::check(provider, &request)
        .await
        .map_err(|e| Error::ThirdParty(format!("fraud check failed: {e}")))?;

    tracing::debug!("verify::normalize");
    let result = normalize(&response)?;

    let contra_indicators =
        ContraIndicatorMapper::new(&config.contra_indicators).map(&result.third_party_fraud_codes);
    let (passed, failed) = if result.executed_successfully {
        (request.check_types, Vec::new())
    } else {
        (Vec::new(), request.check_types)
    };

    let item = ResultItem {
        session_id: session.session_id.clone(),
        check_types: passed,
        failed_check_types: failed,
        transaction_id: result.transaction_id.clone(),
        identity_fraud_score: identity_fraud_score(&result, &contra_indicators),
        decision_score: result.decision_score,
        activity_history_score: result.activity_history_score,
        contra_indicators,
        expiry_date: session.expiry_date,
    };

    ResultStore::put_result(provider, &item)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving check result: {e}")))?;

    Ok(result)
}
