//! # Test Utilities for Fraud VC
//!
//! An in-memory provider trait implementation that can be used for testing
//! and examples.
//!
//! This crate provides common utilities for the Fraud VC project and is not
//! intended to be used directly.

pub mod sample;

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, Once};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use fraud_vc::check::ResultItem;
use fraud_vc::check::response::{VerificationRequest, VerificationResponse};
use fraud_vc::provider::{self, Clock, FraudCheck, Index, ResultStore, SessionStore};
use fraud_vc::session::Session;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// initalise tracing once for all tests
static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// # Panics
///
/// Panics if the tracing subscriber cannot be set.
pub fn init_tracer() {
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::ERROR).finish();
        tracing::subscriber::set_global_default(subscriber).expect("subscriber set");
    });
}

/// In-memory provider with a settable clock and store failure switches.
#[derive(Clone, Debug)]
pub struct ProviderImpl {
    now: Arc<AtomicI64>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    fail_check: Arc<AtomicBool>,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    stale: Arc<Mutex<Vec<(Index, String, Session)>>>,
    results: Arc<Mutex<Vec<ResultItem>>>,
    responses: Arc<Mutex<VecDeque<VerificationResponse>>>,
    requests: Arc<Mutex<Vec<VerificationRequest>>>,
}

impl Default for ProviderImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderImpl {
    /// Create a provider with the clock set to the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(AtomicI64::new(Utc::now().timestamp())),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_check: Arc::new(AtomicBool::new(false)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            stale: Arc::new(Mutex::new(Vec::new())),
            results: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The clock's current time, in epoch seconds.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Make every subsequent store read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent store write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent fraud check call fail.
    pub fn fail_check(&self, fail: bool) {
        self.fail_check.store(fail, Ordering::SeqCst);
    }

    /// Queue the response returned by the next fraud check call.
    pub fn push_response(&self, response: VerificationResponse) {
        self.responses.lock().expect("should lock").push_back(response);
    }

    /// Fraud check requests received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests.lock().expect("should lock").clone()
    }

    /// Add an index entry that no longer matches the base record, as a
    /// lagging index projection would.
    pub fn add_stale_index(&self, index: Index, value: &str, session: Session) {
        self.stale.lock().expect("should lock").push((index, value.to_string(), session));
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("store down"));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("store unavailable"));
        }
        Ok(())
    }
}

impl provider::Provider for ProviderImpl {}

impl Clock for ProviderImpl {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp(), 0).unwrap_or_default()
    }
}

impl SessionStore for ProviderImpl {
    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        self.check_reads()?;
        Ok(self.sessions.lock().expect("should lock").get(session_id).cloned())
    }

    async fn query(&self, index: Index, value: &str) -> Result<Vec<Session>> {
        self.check_reads()?;
        let indexed = |s: &Session| match index {
            Index::AuthorizationCode => s.authorization_code.as_deref() == Some(value),
            Index::AccessToken => s.access_token.as_deref() == Some(value),
        };

        let mut matches: Vec<Session> =
            self.sessions.lock().expect("should lock").values().filter(|s| indexed(*s)).cloned().collect();
        matches.extend(
            self.stale
                .lock()
                .expect("should lock")
                .iter()
                .filter(|(i, v, _)| *i == index && v == value)
                .map(|(_, _, s)| s.clone()),
        );
        Ok(matches)
    }

    async fn put(&self, session: &Session) -> Result<()> {
        self.check_writes()?;
        self.sessions.lock().expect("should lock").insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<()> {
        self.check_writes()?;
        self.sessions.lock().expect("should lock").insert(session.session_id.clone(), session.clone());
        Ok(())
    }
}

impl ResultStore for ProviderImpl {
    async fn put_result(&self, item: &ResultItem) -> Result<()> {
        self.check_writes()?;
        self.results.lock().expect("should lock").push(item.clone());
        Ok(())
    }

    async fn get_results(&self, session_id: &str) -> Result<Vec<ResultItem>> {
        self.check_reads()?;
        let results = self.results.lock().expect("should lock");
        Ok(results.iter().filter(|r| r.session_id == session_id).cloned().collect())
    }
}

impl FraudCheck for ProviderImpl {
    async fn check(&self, request: &VerificationRequest) -> Result<VerificationResponse> {
        self.requests.lock().expect("should lock").push(request.clone());
        if self.fail_check.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }

        let queued = self.responses.lock().expect("should lock").pop_front();
        Ok(queued.unwrap_or_else(|| sample::info_response(&request.client_reference_id, &[])))
    }
}
