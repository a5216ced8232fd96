pub mod json;
pub mod junit;
pub mod types;

use crate::runner::state::SessionState;
use anyhow::{Context, Result};
use std::path::Path;

pub use types::RunReport;

/// Write JSON and JUnit reports for a finished session
pub fn write_reports(
    session: &SessionState,
    completed: bool,
    output_dir: &Path,
) -> Result<RunReport> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create report directory {}", output_dir.display())
    })?;

    let report = RunReport::from_session(session, completed);
    json::write_report(&report, output_dir)?;
    junit::write_report(&report, output_dir)?;
    Ok(report)
}
