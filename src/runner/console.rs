use super::state::{SessionState, TestResult};
use crate::client::HttpMethod;
use colored::Colorize;

const RULE_WIDTH: usize = 60;
const GROUP_RULE_WIDTH: usize = 30;

pub fn print_header() {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", "🚀 TRADING PLATFORM BACKEND API TESTING".bold());
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn print_group_banner(banner: &str) {
    println!("\n{}", banner.bold());
    println!("{}", "-".repeat(GROUP_RULE_WIDTH));
}

pub fn print_request(name: &str, method: HttpMethod, url: &str) {
    println!("\n🔍 Testing {}...", name.cyan());
    println!("    URL: {}", url);
    println!("    Method: {}", method);
}

pub fn print_result(result: &TestResult) {
    if result.success {
        println!(
            "✅ {}: {} - {}",
            result.name,
            "PASSED".green().bold(),
            result.message
        );
    } else {
        println!(
            "❌ {}: {} - {}",
            result.name,
            "FAILED".red().bold(),
            result.message
        );
    }
}

/// Indented detail line under the current test
pub fn print_detail(message: &str) {
    println!("    {}", message);
}

pub fn print_gate_failure(message: &str) {
    println!("❌ {}", message.red());
}

pub fn print_summary(state: &SessionState) {
    let summary = state.summary();

    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{}", "📊 TEST SUMMARY".bold());
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Tests run: {}", summary.tests_run);
    println!("Tests passed: {}", summary.tests_passed.to_string().green());
    println!("Tests failed: {}", summary.tests_failed.to_string().red());
    println!("Success rate: {:.1}%", summary.success_rate);

    let failed: Vec<&TestResult> = state.failed_results().collect();
    if !failed.is_empty() {
        println!("\n❌ {} ({}):", "FAILED TESTS".red().bold(), failed.len());
        for test in failed {
            println!("  - {}: {}", test.name, test.message);
        }
    }
}
