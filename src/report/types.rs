use crate::runner::state::{SessionState, TestResult, TestSummary};
use serde::{Deserialize, Serialize};

/// Finished run, as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub session_id: String,
    pub base_url: String,
    pub completed: bool,
    pub results: Vec<TestResult>,
    pub summary: TestSummary,
    pub total_duration_ms: u64,
    pub generated_at: String,
}

impl RunReport {
    /// `completed` is false when the login gate stopped the run.
    pub fn from_session(session: &SessionState, completed: bool) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            base_url: session.base_url.clone(),
            completed,
            results: session.results().to_vec(),
            summary: session.summary(),
            total_duration_ms: session.elapsed_ms(),
            generated_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}
