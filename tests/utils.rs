#![allow(missing_docs, dead_code)]

use std::collections::BTreeMap;

use fraud_vc::session::{Session, SessionRequest};
use fraud_vc::token::{CLIENT_CREDENTIALS, TokenRequest, TokenResponse};
use fraud_vc::{Config, Endpoint};
use rstest::fixture;
use test_utils::ProviderImpl;

pub const SCOPE: &str = "fraud-check";
pub const SUBJECT: &str = "urn:fdc:gov.uk:2022:subject";

#[fixture]
pub fn provider() -> ProviderImpl {
    test_utils::init_tracer();
    ProviderImpl::new()
}

pub fn config() -> Config {
    Config {
        contra_indicators: BTreeMap::from([
            ("u101".to_string(), "A01".to_string()),
            ("u201".to_string(), "T02".to_string()),
        ]),
        ..Config::default()
    }
}

pub fn endpoint(provider: &ProviderImpl) -> Endpoint<ProviderImpl> {
    Endpoint::new(provider.clone(), config())
}

pub fn grant(code: Option<&str>) -> TokenRequest {
    let mut params = vec![("grant_type", CLIENT_CREDENTIALS), ("scope", SCOPE)];
    if let Some(code) = code {
        params.push(("code", code));
    }
    TokenRequest::new(params)
}

pub fn bearer(token: &TokenResponse) -> String {
    format!("Bearer {}", token.access_token)
}

// Run a session through authorization and token exchange.
pub async fn authorized(endpoint: &Endpoint<ProviderImpl>) -> (Session, TokenResponse) {
    let session = endpoint
        .create_session(SessionRequest {
            client_id: Some("relying-party".into()),
            redirect_uri: Some("https://rp.example.com/callback".into()),
            state: Some("xyz".into()),
            subject: Some(SUBJECT.into()),
        })
        .await
        .expect("should create session");

    let authorization = endpoint.authorize(&session.session_id).await.expect("should authorize");
    let token =
        endpoint.token(&grant(Some(&authorization.code))).await.expect("should issue token");

    (session, token)
}
