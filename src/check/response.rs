//! # Provider Messages
//!
//! Request and response messages exchanged with the fraud check provider.
//! Responses are a union over the `INFO`, `WARN`, and `ERROR` response types
//! declared in the response header.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::check::CheckType;
use crate::Error;

/// A request to verify a person's identity against a set of fraud checks.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Identifies the session the request is made for. Passed to the
    /// provider as its client reference.
    pub client_reference_id: String,

    /// The person to verify.
    pub person: PersonIdentity,

    /// The checks to perform.
    pub check_types: Vec<CheckType>,
}

/// Identity attributes of the person being checked.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonIdentity {
    /// Given names, in order.
    pub first_name: String,

    /// Middle names, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_names: Option<String>,

    /// Family name.
    pub surname: String,

    /// Date of birth (`YYYY-MM-DD`).
    pub date_of_birth: String,

    /// Current and previous addresses, current first.
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// A postal address.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// Building number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_number: Option<String>,

    /// Building name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,

    /// Street name.
    pub street_name: String,

    /// Town or city.
    pub address_locality: String,

    /// Postal code.
    pub postal_code: String,
}

/// The provider's raw verification response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    /// Response header, including the response type.
    pub response_header: ResponseHeader,

    /// Decision payload. Only meaningful for `INFO` responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_response_payload: Option<ClientResponsePayload>,
}

/// Header common to all provider responses.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseHeader {
    /// The request type echoed back by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,

    /// The client reference sent with the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_reference_id: Option<String>,

    /// Provider transaction id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_request_id: Option<String>,

    /// Declared response type. See [`ResponseType`].
    pub response_type: String,

    /// Provider response code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,

    /// Provider response message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
}

/// Decision payload of an `INFO` response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientResponsePayload {
    /// Decision elements. Element zero carries the primary decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_elements: Option<Vec<DecisionElement>>,
}

/// A single provider decision.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionElement {
    /// Decision text, e.g. `CONTINUE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,

    /// Decision score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,

    /// Rules fired in reaching the decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,

    /// Additional decision data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_data: Option<OtherData>,
}

/// A rule fired by the provider.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    /// Rule identifier. Used as the fraud code.
    pub rule_id: String,

    /// Human readable rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,

    /// Rule score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_score: Option<i32>,
}

/// Additional data attached to a decision element.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherData {
    /// Score reflecting the age of the identity's oldest record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_history_score: Option<i32>,
}

/// Response types the provider may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseType {
    /// The check executed.
    Info,

    /// The check did not execute; the provider issued a warning.
    Warn,

    /// The check did not execute; the provider reported an error.
    Error,
}

impl FromStr for ResponseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err(Error::UnexpectedResponseType(format!("unexpected response type: {s}"))),
        }
    }
}
