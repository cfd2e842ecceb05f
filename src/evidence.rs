//! # Evidence
//!
//! Folds stored [`ResultItem`]s into the evidence block of an identity fraud
//! credential.
//!
//! Visible evidence names each check using the check type's
//! [`EvidencePolicy`](crate::check::EvidencePolicy): activity history checks
//! are listed without a check name and impersonation risk checks carry their
//! own provider transaction id. A parallel audit list keeps one entry per
//! stored item, with every check named, for non-repudiation.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::check::{CheckType, ResultItem};
use crate::{Error, Result};

/// Evidence type for identity fraud checks.
pub const IDENTITY_CHECK: &str = "IdentityCheck";

/// Check method for database-backed checks.
pub const CHECK_METHOD: &str = "data";

/// A single check within an evidence item. Equality is structural.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckDetail {
    /// How the check was performed.
    pub check_method: String,

    /// Name of the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_check: Option<String>,

    /// Transaction id, when the check ran as its own provider transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn: Option<String>,
}

/// Credential evidence summarizing the fraud checks for a session.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EvidenceItem {
    /// Evidence type. Always `IdentityCheck`.
    #[serde(rename = "type")]
    pub type_: String,

    /// Primary provider transaction id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn: Option<String>,

    /// Identity fraud score.
    pub identity_fraud_score: i32,

    /// Provider decision score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_score: Option<i32>,

    /// Provider activity history score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_history_score: Option<i32>,

    /// Contra-indicators.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ci: Vec<String>,

    /// Checks performed that passed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub check_details: Vec<CheckDetail>,

    /// Checks attempted that failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_check_details: Vec<CheckDetail>,
}

/// Audit record of a single stored result item.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditEvidence {
    /// Evidence type. Always `IdentityCheck`.
    #[serde(rename = "type")]
    pub type_: String,

    /// Provider transaction id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn: Option<String>,

    /// Checks performed that passed, every check named.
    pub check_details: Vec<CheckDetail>,

    /// Checks attempted that failed, every check named.
    pub failed_check_details: Vec<CheckDetail>,
}

/// Evidence built item by item.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Assembled {
    /// Visible evidence, one entry per input item.
    pub evidence: Vec<EvidenceItem>,

    /// Audit evidence, one entry per input item.
    pub audit: Vec<AuditEvidence>,
}

/// Build the evidence item for a session from its stored result items.
/// Items belonging to other sessions are ignored.
///
/// The primary item (the first not recording an impersonation risk check)
/// supplies the transaction id and scores. Contra-indicators and checks are
/// merged across items in input order, each appearing once.
///
/// # Errors
///
/// Returns `Error::ResultNotFound` when no item belongs to the session.
#[instrument(level = "debug", skip(items))]
pub fn build_evidence(session_id: &str, items: &[ResultItem]) -> Result<EvidenceItem> {
    let items: Vec<&ResultItem> = items.iter().filter(|i| i.session_id == session_id).collect();

    let Some(primary) = items.iter().find(|i| !i.is_impersonation_risk()).or_else(|| items.first())
    else {
        return Err(Error::ResultNotFound("no check results for session".into()));
    };

    let mut evidence = EvidenceItem {
        type_: IDENTITY_CHECK.into(),
        txn: primary.transaction_id.clone(),
        identity_fraud_score: primary.identity_fraud_score,
        decision_score: primary.decision_score,
        activity_history_score: items.iter().find_map(|i| i.activity_history_score),
        ..EvidenceItem::default()
    };

    for item in &items {
        for ci in &item.contra_indicators {
            push_unique(&mut evidence.ci, ci.clone());
        }
        for check_type in &item.check_types {
            push_unique(&mut evidence.check_details, visible_detail(*check_type, item));
        }
        for check_type in &item.failed_check_types {
            push_unique(&mut evidence.failed_check_details, visible_detail(*check_type, item));
        }
    }

    Ok(evidence)
}

/// Build visible and audit evidence for each item, preserving input order.
#[must_use]
pub fn assemble(items: &[ResultItem]) -> Assembled {
    let mut assembled = Assembled::default();

    for item in items {
        let visible = |types: &[CheckType]| {
            types.iter().map(|ct| visible_detail(*ct, item)).collect::<Vec<_>>()
        };
        let audited = |types: &[CheckType]| {
            types.iter().map(|ct| audit_detail(*ct, item)).collect::<Vec<_>>()
        };

        assembled.evidence.push(EvidenceItem {
            type_: IDENTITY_CHECK.into(),
            txn: item.transaction_id.clone(),
            identity_fraud_score: item.identity_fraud_score,
            decision_score: item.decision_score,
            activity_history_score: item.activity_history_score,
            ci: item.contra_indicators.clone(),
            check_details: visible(&item.check_types),
            failed_check_details: visible(&item.failed_check_types),
        });
        assembled.audit.push(AuditEvidence {
            type_: IDENTITY_CHECK.into(),
            txn: item.transaction_id.clone(),
            check_details: audited(&item.check_types),
            failed_check_details: audited(&item.failed_check_types),
        });
    }

    assembled
}

fn visible_detail(check_type: CheckType, item: &ResultItem) -> CheckDetail {
    let policy = check_type.policy();
    CheckDetail {
        check_method: CHECK_METHOD.into(),
        fraud_check: policy.fraud_check.map(Into::into),
        txn: if policy.own_txn { item.transaction_id.clone() } else { None },
    }
}

fn audit_detail(check_type: CheckType, item: &ResultItem) -> CheckDetail {
    CheckDetail {
        fraud_check: Some(check_type.name().into()),
        ..visible_detail(check_type, item)
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_json_snapshot as assert_snapshot;

    use super::*;

    fn fraud_item() -> ResultItem {
        ResultItem {
            session_id: "session-1".into(),
            check_types: vec![
                CheckType::MortalityCheck,
                CheckType::IdentityTheftCheck,
                CheckType::SyntheticIdentityCheck,
                CheckType::ActivityHistoryCheck,
            ],
            transaction_id: Some("txn-1".into()),
            identity_fraud_score: 1,
            decision_score: Some(90),
            activity_history_score: Some(3),
            contra_indicators: vec!["A01".into()],
            ..ResultItem::default()
        }
    }

    fn impersonation_item() -> ResultItem {
        ResultItem {
            session_id: "session-1".into(),
            failed_check_types: vec![CheckType::ImpersonationRiskCheck],
            transaction_id: Some("txn-2".into()),
            ..ResultItem::default()
        }
    }

    #[test]
    fn single_result() {
        let item = ResultItem {
            session_id: "session-1".into(),
            identity_fraud_score: 5,
            contra_indicators: vec!["A01".into()],
            ..ResultItem::default()
        };

        let evidence = build_evidence("session-1", &[item]).expect("should build");
        assert_eq!(evidence.type_, "IdentityCheck");
        assert_eq!(evidence.identity_fraud_score, 5);
        assert_eq!(evidence.ci, vec!["A01"]);
    }

    #[test]
    fn folds_session_items() {
        let items = vec![impersonation_item(), fraud_item()];
        let evidence = build_evidence("session-1", &items).expect("should build");

        assert_snapshot!(evidence, @r#"
        {
          "type": "IdentityCheck",
          "txn": "txn-1",
          "identityFraudScore": 1,
          "decisionScore": 90,
          "activityHistoryScore": 3,
          "ci": [
            "A01"
          ],
          "checkDetails": [
            {
              "checkMethod": "data",
              "fraudCheck": "mortality_check"
            },
            {
              "checkMethod": "data",
              "fraudCheck": "identity_theft_check"
            },
            {
              "checkMethod": "data",
              "fraudCheck": "synthetic_identity_check"
            },
            {
              "checkMethod": "data"
            }
          ],
          "failedCheckDetails": [
            {
              "checkMethod": "data",
              "fraudCheck": "impersonation_risk_check",
              "txn": "txn-2"
            }
          ]
        }
        "#);
    }

    #[test]
    fn idempotent() {
        let items = vec![fraud_item(), fraud_item()];
        let once = build_evidence("session-1", &items[..1]).expect("should build");
        let twice = build_evidence("session-1", &items).expect("should build");
        assert_eq!(once, twice);
    }

    #[test]
    fn other_sessions_ignored() {
        let err = build_evidence("session-2", &[fraud_item()]).expect_err("should fail");
        assert!(matches!(err, Error::ResultNotFound(_)));
    }

    #[test]
    fn assemble_per_item() {
        let items = vec![fraud_item(), impersonation_item()];
        let assembled = assemble(&items);

        assert_eq!(assembled.evidence.len(), 2);
        assert_eq!(assembled.audit.len(), 2);
        assert_eq!(assembled.audit[0].txn.as_deref(), Some("txn-1"));
        assert_eq!(assembled.audit[1].txn.as_deref(), Some("txn-2"));

        // activity history is named in the audit trail only
        assert_eq!(assembled.evidence[0].check_details[3].fraud_check, None);
        assert_eq!(
            assembled.audit[0].check_details[3].fraud_check.as_deref(),
            Some("activity_history_check")
        );
        assert_eq!(assembled.audit[1].failed_check_details[0].txn.as_deref(), Some("txn-2"));
    }
}
