//! Tests for fraud checks and credential evidence.

mod utils;

use fraud_vc::Error;
use fraud_vc::check::CheckType;
use fraud_vc::verify::VerifyRequest;
use insta::assert_json_snapshot as assert_snapshot;
use rstest::rstest;
use test_utils::{ProviderImpl, sample};
use utils::provider;

fn request(check_types: Vec<CheckType>) -> VerifyRequest {
    VerifyRequest { person: sample::person(), check_types }
}

#[rstest]
#[tokio::test]
async fn contra_indicated(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (session, token) = utils::authorized(&endpoint).await;
    provider.push_response(sample::scored_response("txn-1", &["u101", " ", "X99"], Some(90), Some(2)));

    let results =
        endpoint.verify(&utils::bearer(&token), request(vec![])).await.expect("should verify");
    assert_eq!(results.len(), 1);
    assert!(results[0].executed_successfully);
    assert_eq!(results[0].third_party_fraud_codes, vec!["u101", "X99"]);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].client_reference_id, session.session_id);
    assert_eq!(requests[0].check_types.len(), 4);

    let credential = endpoint.credential(&utils::bearer(&token)).await.expect("should build");
    assert_eq!(credential.sub.as_deref(), Some(utils::SUBJECT));
    assert_snapshot!(credential.evidence, @r#"
    [
      {
        "type": "IdentityCheck",
        "txn": "txn-1",
        "identityFraudScore": 1,
        "decisionScore": 90,
        "activityHistoryScore": 2,
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
        ]
      }
    ]
    "#);

    assert_eq!(credential.audit.len(), 1);
    let audited: Vec<_> =
        credential.audit[0].check_details.iter().filter_map(|d| d.fraud_check.as_deref()).collect();
    assert!(audited.contains(&"activity_history_check"));
}

#[rstest]
#[tokio::test]
async fn clear_result(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;

    endpoint
        .verify(&utils::bearer(&token), request(vec![CheckType::MortalityCheck]))
        .await
        .expect("should verify");

    let credential = endpoint.credential(&utils::bearer(&token)).await.expect("should build");
    let evidence = &credential.evidence[0];
    assert_eq!(evidence.identity_fraud_score, 2);
    assert!(evidence.ci.is_empty());
    assert_eq!(evidence.check_details.len(), 1);
}

#[rstest]
#[tokio::test]
async fn impersonation_transaction(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;
    provider.push_response(sample::info_response("txn-1", &[]));
    provider.push_response(sample::info_response("txn-2", &["u201"]));

    let check_types = vec![CheckType::ImpersonationRiskCheck, CheckType::MortalityCheck];
    let results =
        endpoint.verify(&utils::bearer(&token), request(check_types)).await.expect("should verify");
    assert_eq!(results.len(), 2);

    let requests = provider.requests();
    assert_eq!(requests[0].check_types, vec![CheckType::MortalityCheck]);
    assert_eq!(requests[1].check_types, vec![CheckType::ImpersonationRiskCheck]);

    let credential = endpoint.credential(&utils::bearer(&token)).await.expect("should build");
    let evidence = &credential.evidence[0];
    assert_eq!(evidence.txn.as_deref(), Some("txn-1"));
    assert_eq!(evidence.identity_fraud_score, 2);
    assert_eq!(evidence.ci, vec!["T02"]);

    let impersonation = evidence
        .check_details
        .iter()
        .find(|d| d.fraud_check.as_deref() == Some("impersonation_risk_check"))
        .expect("impersonation check listed");
    assert_eq!(impersonation.txn.as_deref(), Some("txn-2"));
    assert_eq!(credential.audit.len(), 2);
}

#[rstest]
#[tokio::test]
async fn provider_error(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;
    provider.push_response(sample::error_response("txn-1", "1234", "bad request"));

    let results = endpoint
        .verify(&utils::bearer(&token), request(vec![CheckType::IdentityTheftCheck]))
        .await
        .expect("should verify");
    assert!(!results[0].executed_successfully);
    assert_eq!(
        results[0].error_message.as_deref(),
        Some("Error code: 1234, error description: bad request")
    );

    let credential = endpoint.credential(&utils::bearer(&token)).await.expect("should build");
    let evidence = &credential.evidence[0];
    assert_eq!(evidence.identity_fraud_score, 0);
    assert!(evidence.check_details.is_empty());
    assert_eq!(evidence.failed_check_details.len(), 1);
}

#[rstest]
#[tokio::test]
async fn unexpected_response(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;

    let mut response = sample::info_response("txn-1", &[]);
    response.response_header.response_type = "UNKNOWN".into();
    provider.push_response(response);

    let err = endpoint.verify(&utils::bearer(&token), request(vec![])).await.expect_err("rejected");
    assert!(matches!(err, Error::UnexpectedResponseType(_)));

    // nothing was stored
    let err = endpoint.credential(&utils::bearer(&token)).await.expect_err("no results");
    assert!(matches!(err, Error::ResultNotFound(_)));
}

#[rstest]
#[tokio::test]
async fn third_party_failure(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;
    provider.fail_check(true);

    let err = endpoint.verify(&utils::bearer(&token), request(vec![])).await.expect_err("fails");
    assert!(matches!(err, Error::ThirdParty(_)));
    assert_eq!(err.status_code(), 500);
}

#[rstest]
#[tokio::test]
async fn access_denied(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);

    let err = endpoint.verify("Bearer unknown", request(vec![])).await.expect_err("denied");
    assert!(matches!(err, Error::AccessDenied(_)));

    let err = endpoint.credential("").await.expect_err("denied");
    assert_eq!(err.status_code(), 401);
    assert!(provider.requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn store_outage(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;
    provider.fail_reads(true);

    let err = endpoint.verify(&utils::bearer(&token), request(vec![])).await.expect_err("fails");
    assert!(matches!(err, Error::ServerError(_)));
    assert_eq!(err.status_code(), 500);
    assert!(provider.requests().is_empty());

    let err = endpoint.credential(&utils::bearer(&token)).await.expect_err("fails");
    assert!(matches!(err, Error::ServerError(_)));
}

#[rstest]
#[tokio::test]
async fn earlier_transaction_kept(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;

    provider.push_response(sample::info_response("txn-1", &["u101"]));
    let mut rejected = sample::info_response("txn-2", &[]);
    rejected.response_header.response_type = "UNKNOWN".into();
    provider.push_response(rejected);

    let check_types = vec![CheckType::MortalityCheck, CheckType::ImpersonationRiskCheck];
    let err =
        endpoint.verify(&utils::bearer(&token), request(check_types)).await.expect_err("rejected");
    assert!(matches!(err, Error::UnexpectedResponseType(_)));
    assert_eq!(provider.requests().len(), 2);

    // the fraud transaction's result survives
    let credential = endpoint.credential(&utils::bearer(&token)).await.expect("should build");
    let evidence = &credential.evidence[0];
    assert_eq!(evidence.txn.as_deref(), Some("txn-1"));
    assert_eq!(evidence.ci, vec!["A01"]);
    assert_eq!(evidence.check_details.len(), 1);
    assert_eq!(credential.audit.len(), 1);
}

#[rstest]
#[tokio::test]
async fn result_not_saved(provider: ProviderImpl) {
    let endpoint = utils::endpoint(&provider);
    let (_, token) = utils::authorized(&endpoint).await;

    provider.fail_writes(true);
    let err = endpoint
        .verify(&utils::bearer(&token), request(vec![CheckType::MortalityCheck]))
        .await
        .expect_err("fails");
    assert!(matches!(err, Error::ServerError(_)));
    assert!(!err.is_retryable());

    provider.fail_writes(false);
    let err = endpoint.credential(&utils::bearer(&token)).await.expect_err("no results");
    assert!(matches!(err, Error::ResultNotFound(_)));
}
