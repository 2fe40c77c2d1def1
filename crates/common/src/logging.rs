//! Tracing setup shared by the viewfinder and its crates.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. Returns false if one was already set.
///
/// `RUST_LOG` takes precedence over `config.level`.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let (writer, to_file) = log_writer(config);
    let builder = fmt::Subscriber::builder()
        .with_env_filter(log_filter(config))
        .with_writer(writer)
        .with_ansi(!to_file)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
    } else {
        tracing::subscriber::set_global_default(builder.finish()).is_ok()
    }
}

fn log_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Append to `config.file` when it can be opened, stderr otherwise.
fn log_writer(config: &LoggingConfig) -> (BoxMakeWriter, bool) {
    let file = config.file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("framecam: cannot open log file {}: {e}", path.display());
                None
            }
        }
    });

    match file {
        Some(file) => (BoxMakeWriter::new(Mutex::new(file)), true),
        None => (BoxMakeWriter::new(std::io::stderr), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framecam.log");
        let config = LoggingConfig {
            file: Some(path.clone()),
            ..LoggingConfig::default()
        };

        let (_, to_file) = log_writer(&config);
        assert!(to_file);
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_file_falls_back_to_stderr() {
        let config = LoggingConfig {
            file: Some("/nonexistent/framecam/dir/framecam.log".into()),
            ..LoggingConfig::default()
        };
        let (_, to_file) = log_writer(&config);
        assert!(!to_file);
    }

    #[test]
    fn test_garbage_level_does_not_panic() {
        let config = LoggingConfig {
            level: "=[not a filter".to_string(),
            ..LoggingConfig::default()
        };
        let _ = log_filter(&config);
    }
}
