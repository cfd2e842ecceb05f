//! Sample provider responses and identities.

use fraud_vc::check::response::{
    Address, ClientResponsePayload, DecisionElement, OtherData, PersonIdentity, ResponseHeader,
    Rule, VerificationResponse,
};

/// A person to run checks against.
#[must_use]
pub fn person() -> PersonIdentity {
    PersonIdentity {
        first_name: "Kenneth".into(),
        middle_names: None,
        surname: "Decerqueira".into(),
        date_of_birth: "1965-07-08".into(),
        addresses: vec![Address {
            building_number: Some("8".into()),
            street_name: "Hadley Road".into(),
            address_locality: "Bath".into(),
            postal_code: "BA2 5AA".into(),
            ..Address::default()
        }],
    }
}

/// A successful (`INFO`) response raising the given fraud codes.
#[must_use]
pub fn info_response(txn: &str, codes: &[&str]) -> VerificationResponse {
    scored_response(txn, codes, None, None)
}

/// A successful (`INFO`) response carrying decision and activity history
/// scores.
#[must_use]
pub fn scored_response(
    txn: &str, codes: &[&str], score: Option<i32>, activity_history_score: Option<i32>,
) -> VerificationResponse {
    let rules = codes
        .iter()
        .map(|code| Rule { rule_id: (*code).to_string(), ..Rule::default() })
        .collect();

    VerificationResponse {
        response_header: ResponseHeader {
            exp_request_id: Some(txn.to_string()),
            response_type: "INFO".into(),
            ..ResponseHeader::default()
        },
        client_response_payload: Some(ClientResponsePayload {
            decision_elements: Some(vec![DecisionElement {
                score,
                rules: Some(rules),
                other_data: activity_history_score
                    .map(|s| OtherData { activity_history_score: Some(s) }),
                ..DecisionElement::default()
            }]),
        }),
    }
}

/// An `ERROR` response.
#[must_use]
pub fn error_response(txn: &str, code: &str, message: &str) -> VerificationResponse {
    VerificationResponse {
        response_header: ResponseHeader {
            exp_request_id: Some(txn.to_string()),
            response_type: "ERROR".into(),
            response_code: Some(code.to_string()),
            response_message: Some(message.to_string()),
            ..ResponseHeader::default()
        },
        client_response_payload: None,
    }
}
