//! # Fraud Checks
//!
//! Provider-agnostic check types and results. A raw provider response is
//! normalized into a [`CheckResult`], scored and mapped to contra-indicators,
//! then stored against its session as a [`ResultItem`].

pub mod mapper;
pub mod normalize;
pub mod response;

use serde::{Deserialize, Serialize};

/// The fraud checks a provider can be asked to perform.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckType {
    /// Is the subject recorded as deceased.
    MortalityCheck,

    /// Has the subject's identity been reported as stolen.
    IdentityTheftCheck,

    /// Is the identity a composite of real and fabricated data.
    SyntheticIdentityCheck,

    /// Is someone other than the subject using the identity. Performed as a
    /// separate provider transaction.
    ImpersonationRiskCheck,

    /// How long the identity has an activity footprint.
    ActivityHistoryCheck,
}

/// How a check type is rendered into credential evidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvidencePolicy {
    /// Name used in the evidence's `fraudCheck` field. `None` when the check
    /// is never named in visible evidence.
    pub fraud_check: Option<&'static str>,

    /// Whether the check carries its own provider transaction id.
    pub own_txn: bool,
}

impl CheckType {
    /// The lowercase token for the check type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MortalityCheck => "mortality_check",
            Self::IdentityTheftCheck => "identity_theft_check",
            Self::SyntheticIdentityCheck => "synthetic_identity_check",
            Self::ImpersonationRiskCheck => "impersonation_risk_check",
            Self::ActivityHistoryCheck => "activity_history_check",
        }
    }

    /// Evidence rendering policy for the check type.
    #[must_use]
    pub const fn policy(self) -> EvidencePolicy {
        match self {
            Self::ActivityHistoryCheck => EvidencePolicy { fraud_check: None, own_txn: false },
            Self::ImpersonationRiskCheck => {
                EvidencePolicy { fraud_check: Some(self.name()), own_txn: true }
            }
            _ => EvidencePolicy { fraud_check: Some(self.name()), own_txn: false },
        }
    }
}

/// The normalized outcome of a single provider call.
///
/// A result either executed successfully (with fraud codes and scores) or
/// failed (with an error message), never both.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Whether the provider executed the check.
    pub executed_successfully: bool,

    /// Provider fraud and warning codes, in the order received.
    pub third_party_fraud_codes: Vec<String>,

    /// Why the check did not execute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Provider transaction id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Provider decision score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_score: Option<i32>,

    /// Provider activity history score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_history_score: Option<i32>,
}

/// A check result as stored against a session.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    /// The session the checks were performed for.
    pub session_id: String,

    /// Checks that were performed and passed.
    pub check_types: Vec<CheckType>,

    /// Checks that were attempted and failed.
    pub failed_check_types: Vec<CheckType>,

    /// Provider transaction id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Identity fraud score (0 to 2).
    pub identity_fraud_score: i32,

    /// Provider decision score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_score: Option<i32>,

    /// Provider activity history score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_history_score: Option<i32>,

    /// Contra-indicators raised, in the order first raised.
    pub contra_indicators: Vec<String>,

    /// Time the item may be expunged, in epoch seconds.
    pub expiry_date: i64,
}

impl ResultItem {
    /// Whether the item records an impersonation risk check, attempted or
    /// passed.
    #[must_use]
    pub fn is_impersonation_risk(&self) -> bool {
        self.check_types
            .iter()
            .chain(&self.failed_check_types)
            .any(|ct| *ct == CheckType::ImpersonationRiskCheck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table() {
        assert_eq!(
            CheckType::ActivityHistoryCheck.policy(),
            EvidencePolicy { fraud_check: None, own_txn: false }
        );
        assert_eq!(
            CheckType::ImpersonationRiskCheck.policy(),
            EvidencePolicy { fraud_check: Some("impersonation_risk_check"), own_txn: true }
        );
        assert_eq!(CheckType::MortalityCheck.policy().fraud_check, Some("mortality_check"));
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_string(&CheckType::SyntheticIdentityCheck).expect("serialize");
        assert_eq!(json, r#""SYNTHETIC_IDENTITY_CHECK""#);
    }
}
