use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinError;

use tradex_api_tester::config::{Config, DEFAULT_BASE_URL};
use tradex_api_tester::ApiTester;

#[derive(Parser)]
#[command(name = "tradex-api-tester")]
#[command(version)]
#[command(about = "Backend API smoke tests for the TradeX trading platform", long_about = None)]
struct Cli {
    /// Base URL of the platform (without /api)
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Write JSON and JUnit reports into this directory
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let interrupted = Arc::new(Notify::new());
    let handler = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || handler.notify_one()) {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let config = Config {
        base_url: cli.base_url,
        request_timeout_ms: cli.timeout.saturating_mul(1000),
        report_dir: cli.report,
        ..Config::default()
    };

    let suite = tokio::spawn(run(config));

    tokio::select! {
        outcome = suite => exit_code(outcome),
        _ = interrupted.notified() => {
            print_fatal(&format!("⚠️  {}", "Testing interrupted by user".yellow()));
            ExitCode::FAILURE
        }
    }
}

/// Run the suite; Ok(true) only if login passed and nothing failed.
async fn run(config: Config) -> anyhow::Result<bool> {
    let mut tester = ApiTester::new(config)?;
    tester.run().await
}

/// Map the suite task's outcome to the process exit code.
///
/// Errors and panics inside the suite both end as "Unexpected error".
fn exit_code(outcome: Result<anyhow::Result<bool>, JoinError>) -> ExitCode {
    match outcome {
        Ok(Ok(true)) => ExitCode::SUCCESS,
        Ok(Ok(false)) => ExitCode::FAILURE,
        Ok(Err(e)) => {
            print_fatal(&format!("💥 Unexpected error: {:#}", e));
            ExitCode::FAILURE
        }
        Err(join_err) => {
            print_fatal(&format!("💥 Unexpected error: {}", panic_message(join_err)));
            ExitCode::FAILURE
        }
    }
}

fn panic_message(join_err: JoinError) -> String {
    if !join_err.is_panic() {
        return join_err.to_string();
    }
    let payload = join_err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test run panicked".to_string()
    }
}

/// Last words to stdout; a closed pipe must not turn into a second panic.
fn print_fatal(message: &str) {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "\n\n{}", message);
    let _ = stdout.flush();
}

fn init_logging(verbose: bool) {
    logging_builder(env_logger::Env::default(), verbose).init();
}

/// `RUST_LOG` (default `warn`), with `--verbose` raising this crate to debug on top of it.
fn logging_builder(env: env_logger::Env<'_>, verbose: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env.default_filter_or("warn"));
    if verbose {
        builder.filter_module("tradex_api_tester", LevelFilter::Debug);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicking_suite_exits_with_failure() {
        let outcome = tokio::spawn(async {
            if true {
                panic!("failed printing to stdout: Broken pipe");
            }
            Ok::<bool, anyhow::Error>(true)
        })
        .await;

        assert!(outcome.as_ref().is_err_and(|e| e.is_panic()));
        assert_eq!(exit_code(outcome), ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn test_panic_message_is_extracted() {
        let join_err = tokio::spawn(async { panic!("boom {}", 7) }).await.unwrap_err();
        assert_eq!(panic_message(join_err), "boom 7");
    }

    fn debug_enabled(logger: &env_logger::Logger, target: &str) -> bool {
        use log::Log;
        let metadata = log::Metadata::builder()
            .level(log::Level::Debug)
            .target(target)
            .build();
        logger.enabled(&metadata)
    }

    #[test]
    fn test_verbose_overrides_rust_log() {
        std::env::set_var("TRADEX_TESTER_LOG_SET", "error");
        let env = env_logger::Env::new().filter("TRADEX_TESTER_LOG_SET");
        let logger = logging_builder(env, true).build();

        assert!(debug_enabled(&logger, "tradex_api_tester::runner::tester"));
        assert!(!debug_enabled(&logger, "hyper::client"));
    }

    #[test]
    fn test_default_level_hides_request_diagnostics() {
        let env = env_logger::Env::new().filter("TRADEX_TESTER_LOG_UNSET");
        let logger = logging_builder(env, false).build();

        assert!(!debug_enabled(&logger, "tradex_api_tester::runner::tester"));
        assert_eq!(logger.filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(Ok(Ok(true))), ExitCode::SUCCESS);
        assert_eq!(exit_code(Ok(Ok(false))), ExitCode::FAILURE);
        assert_eq!(
            exit_code(Ok(Err(anyhow::anyhow!("report dir not writable")))),
            ExitCode::FAILURE
        );
    }
}
