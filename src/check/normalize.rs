//! # Response Normalization
//!
//! Maps a raw provider response into a [`CheckResult`]. The response type
//! declared in the header selects the mapping:
//!
//! - `ERROR` or `WARN`: a failed result carrying the provider's code and
//!   description in its error message.
//! - `INFO`: a successful result. Fraud codes come from the rules of the first
//!   decision element only; any further elements are informational.
//! - anything else: the provider has broken its contract and processing is
//!   aborted with `Error::UnexpectedResponseType`.

use tracing::instrument;

use crate::check::CheckResult;
use crate::check::response::{DecisionElement, ResponseType, VerificationResponse};
use crate::Result;

const NOT_SPECIFIED: &str = "Not specified";

/// Normalize a provider verification response.
///
/// # Errors
///
/// Returns `Error::UnexpectedResponseType` when the response type is not one
/// of `INFO`, `WARN`, or `ERROR`.
#[instrument(level = "debug", skip_all, fields(response_type = %response.response_header.response_type))]
pub fn normalize(response: &VerificationResponse) -> Result<CheckResult> {
    let header = &response.response_header;

    let response_type = header.response_type.parse::<ResponseType>().inspect_err(|e| {
        tracing::error!("provider response rejected: {e}");
    })?;

    let result = match response_type {
        ResponseType::Error | ResponseType::Warn => CheckResult {
            executed_successfully: false,
            error_message: Some(format!(
                "Error code: {}, error description: {}",
                or_not_specified(header.response_code.as_deref()),
                or_not_specified(header.response_message.as_deref()),
            )),
            transaction_id: header.exp_request_id.clone(),
            ..CheckResult::default()
        },
        ResponseType::Info => {
            let primary = response
                .client_response_payload
                .as_ref()
                .and_then(|payload| payload.decision_elements.as_ref())
                .and_then(|elements| elements.first());

            CheckResult {
                executed_successfully: true,
                third_party_fraud_codes: primary.map(fraud_codes).unwrap_or_default(),
                transaction_id: header.exp_request_id.clone(),
                decision_score: primary.and_then(|element| element.score),
                activity_history_score: primary
                    .and_then(|element| element.other_data.as_ref())
                    .and_then(|data| data.activity_history_score),
                ..CheckResult::default()
            }
        }
    };

    tracing::debug!(executed = result.executed_successfully, "response normalized");
    Ok(result)
}

// Rule ids of the decision element, blanks dropped, order preserved.
fn fraud_codes(element: &DecisionElement) -> Vec<String> {
    element
        .rules
        .iter()
        .flatten()
        .map(|rule| rule.rule_id.trim())
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn or_not_specified(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(NOT_SPECIFIED)
}
