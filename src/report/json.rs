use super::types::RunReport;
use anyhow::Result;
use std::path::Path;

/// Write `test-results.json` into `output_dir`
pub fn write_report(report: &RunReport, output_dir: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    let path = output_dir.join("test-results.json");
    std::fs::write(&path, json)?;
    println!("    Generated JSON report: {}", path.display());
    Ok(())
}
