//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the level from `LOG_LEVEL` applies to
//! this crate, `tower_http`, and the `security` and `http_access` targets.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn default_directives(level: &str) -> String {
    format!("storefront_server={level},tower_http={level},security={level},http_access={level}")
}

/// Initialize the logger from `LOG_LEVEL` and `LOG_DIR`
pub fn init_logger() {
    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
}

/// Initialize the logger with optional daily-rolling file output
///
/// File output is only enabled when `log_dir` already exists. Calling this
/// twice is harmless; the second call is ignored.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let stdout = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file = log_dir
        .map(Path::new)
        .filter(|path| path.is_dir())
        .map(|path| {
            let appender = tracing_appender::rolling::daily(path, "storefront-server");
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(appender)
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_security_targets() {
        let directives = default_directives("debug");
        assert!(directives.contains("security=debug"));
        assert!(directives.contains("http_access=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger_with_file(Some("warn"), Some("/definitely/not/here"));
        init_logger_with_file(Some("info"), None);
    }
}
