//! Tracing setup: rolling log file plus stdout
//!
//! Each transfer runs in a `transfer` span. Events inside it carry the
//! account pair and amount, and the span's close event reports how long the
//! attempt was busy and how long it sat idle waiting on row locks.

use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, fmt::format::FmtSpan, prelude::*};

/// Directives used when `RUST_LOG` is unset
///
/// sqlx statement logs stay at warn; the transfer engine follows the
/// configured level unless that is quieter than info.
pub fn default_directives(level: &str) -> String {
    let engine_level = match level.to_ascii_lowercase().as_str() {
        "error" | "warn" => "info".to_string(),
        other => other.to_string(),
    };
    format!(
        "{},sqlx=warn,internal_transfers::transfer={}",
        level, engine_level
    )
}

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop and must live as long as the process.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_keep_sqlx_quiet() {
        assert_eq!(
            default_directives("debug"),
            "debug,sqlx=warn,internal_transfers::transfer=debug"
        );
    }

    #[test]
    fn test_transfer_outcomes_survive_quiet_levels() {
        assert_eq!(
            default_directives("warn"),
            "warn,sqlx=warn,internal_transfers::transfer=info"
        );
        assert!(EnvFilter::try_new(default_directives("error")).is_ok());
    }
}
