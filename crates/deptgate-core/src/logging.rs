#![forbid(unsafe_code)]

//! Logging setup.
//!
//! The terminal owns stdout while the UI runs, so log output goes to a file.
//! Without a configured file no subscriber is installed and every `tracing`
//! call is a no-op.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Filter used when none is configured or the configured one fails to parse.
pub const DEFAULT_FILTER: &str = "info";

/// Where and how much to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Destination file. `None` disables logging.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive string (e.g. `"deptgate=debug,info"`).
    pub filter: Option<String>,
}

/// Parse a filter directive, falling back to [`DEFAULT_FILTER`].
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global file subscriber.
///
/// Returns `Ok(false)` when logging is disabled by config.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init(config: &LogConfig) -> io::Result<bool> {
    let Some(path) = &config.file else {
        return Ok(false);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config.filter.as_deref()))
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    #[cfg(feature = "tracing-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "tracing-json"))]
    let result = builder.try_init();

    result.map_err(io::Error::other)?;
    tracing::info!(path = %path.display(), "file logging initialized");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_file() {
        let installed = init(&LogConfig::default()).expect("no-op init");
        assert!(!installed);
    }

    #[test]
    fn bad_directive_falls_back() {
        let filter = build_filter(Some("deptgate=loudest"));
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::INFO)
        );
    }

    #[test]
    fn good_directive_is_kept() {
        let filter = build_filter(Some("debug"));
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::DEBUG)
        );
    }
}
