use crate::client::ResponseBody;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of one executed test case
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub response_data: Option<ResponseBody>,
}

/// Mutable state of a single tester run
#[derive(Debug, Clone)]
pub struct SessionState {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub authenticated_user_id: Option<String>,
    tests_run: u32,
    tests_passed: u32,
    results: Vec<TestResult>,
    started_at: Instant,
}

impl SessionState {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            bearer_token: None,
            authenticated_user_id: None,
            tests_run: 0,
            tests_passed: 0,
            results: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Count and store a result; returns the stored entry.
    pub fn record(&mut self, result: TestResult) -> &TestResult {
        self.tests_run += 1;
        if result.success {
            self.tests_passed += 1;
        }
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    pub fn tests_run(&self) -> u32 {
        self.tests_run
    }

    pub fn tests_passed(&self) -> u32 {
        self.tests_passed
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    pub fn all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }

    pub fn summary(&self) -> TestSummary {
        let success_rate = if self.tests_run > 0 {
            self.tests_passed as f64 / self.tests_run as f64 * 100.0
        } else {
            0.0
        };

        TestSummary {
            tests_run: self.tests_run,
            tests_passed: self.tests_passed,
            tests_failed: self.tests_run - self.tests_passed,
            success_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub tests_run: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, success: bool) -> TestResult {
        TestResult {
            name: name.to_string(),
            success,
            message: String::new(),
            response_data: None,
        }
    }

    #[test]
    fn test_counters_follow_results() {
        let mut state = SessionState::new("http://h");
        state.record(result("a", true));
        state.record(result("b", false));
        state.record(result("c", true));

        assert_eq!(state.tests_run(), 3);
        assert_eq!(state.tests_passed(), 2);
        assert!(!state.all_passed());

        let names: Vec<_> = state.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        let failed: Vec<_> = state.failed_results().map(|r| r.name.as_str()).collect();
        assert_eq!(failed, ["b"]);
    }

    #[test]
    fn test_empty_summary() {
        let state = SessionState::new("http://h");
        let summary = state.summary();
        assert_eq!(summary.tests_run, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert!(state.all_passed());
    }

    #[test]
    fn test_summary_rate() {
        let mut state = SessionState::new("http://h");
        for i in 0..3 {
            state.record(result(&i.to_string(), i != 0));
        }
        let summary = state.summary();
        assert_eq!(summary.tests_failed, 1);
        assert!((summary.success_rate - 66.666).abs() < 0.01);
    }
}
