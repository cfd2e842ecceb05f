//! # Contra-Indicators
//!
//! Maps provider fraud codes to contra-indicator (CI) codes and scores the
//! outcome of a check.

use std::collections::BTreeMap;

use crate::check::CheckResult;

/// Score for a check that did not execute.
pub const SCORE_NOT_EXECUTED: i32 = 0;
/// Score for a check that raised at least one contra-indicator.
pub const SCORE_CONTRA_INDICATED: i32 = 1;
/// Score for a check that raised no contra-indicators.
pub const SCORE_CLEAR: i32 = 2;

/// Maps provider fraud codes to contra-indicators.
#[derive(Clone, Copy, Debug)]
pub struct ContraIndicatorMapper<'a> {
    mappings: &'a BTreeMap<String, String>,
}

impl<'a> ContraIndicatorMapper<'a> {
    /// Create a mapper over the configured provider code to CI mappings.
    #[must_use]
    pub const fn new(mappings: &'a BTreeMap<String, String>) -> Self {
        Self { mappings }
    }

    /// Contra-indicators for the provider codes. Unmapped codes raise
    /// nothing. Each CI appears once, in the order first raised.
    #[must_use]
    pub fn map(&self, fraud_codes: &[String]) -> Vec<String> {
        let mut cis: Vec<String> = Vec::new();
        for code in fraud_codes {
            let Some(ci) = self.mappings.get(code) else {
                tracing::debug!(code = %code, "no contra-indicator mapped");
                continue;
            };
            if !cis.contains(ci) {
                cis.push(ci.clone());
            }
        }
        cis
    }
}

/// Identity fraud score for a check result and the contra-indicators it
/// raised.
#[must_use]
pub const fn identity_fraud_score(result: &CheckResult, contra_indicators: &[String]) -> i32 {
    if !result.executed_successfully {
        SCORE_NOT_EXECUTED
    } else if contra_indicators.is_empty() {
        SCORE_CLEAR
    } else {
        SCORE_CONTRA_INDICATED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("u101".to_string(), "A01".to_string()),
            ("u102".to_string(), "A01".to_string()),
            ("t202".to_string(), "T02".to_string()),
        ])
    }

    #[test]
    fn ordered_unique() {
        let mappings = mappings();
        let mapper = ContraIndicatorMapper::new(&mappings);
        let codes = vec!["t202".to_string(), "u101".into(), "zzz".into(), "u102".into()];
        assert_eq!(mapper.map(&codes), vec!["T02", "A01"]);
    }

    #[test]
    fn scores() {
        let failed = CheckResult::default();
        assert_eq!(identity_fraud_score(&failed, &[]), SCORE_NOT_EXECUTED);

        let passed = CheckResult { executed_successfully: true, ..CheckResult::default() };
        assert_eq!(identity_fraud_score(&passed, &[]), SCORE_CLEAR);
        assert_eq!(identity_fraud_score(&passed, &["A01".into()]), SCORE_CONTRA_INDICATED);
    }
}
