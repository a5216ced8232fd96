pub mod client;
pub mod config;
pub mod report;
pub mod runner;

// Re-export common items
pub use config::Config;
pub use report::write_reports;
pub use runner::ApiTester;
