#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Args are parsed by hand to keep the binary lean. Every option can also be
//! set through a `DEPTGATE_*` environment variable; explicit flags win.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use crate::identity_store::FileIdentityStore;
use crate::item_source::DEFAULT_ENDPOINT;
use crate::navigation::Route;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const HELP_TEXT: &str = "\
DeptGate: identity-gated posts table and department selector

USAGE:
    deptgate [OPTIONS]

OPTIONS:
    --endpoint=URL       Item list endpoint (default: https://jsonplaceholder.typicode.com/posts)
    --store=PATH         Identity store file (default: $XDG_STATE_HOME/deptgate/store.json)
    --timeout-ms=N       HTTP timeout in milliseconds (default: 10000)
    --log-file=PATH      Write logs to PATH (default: logging off)
    --start=SCREEN       First screen: 'identity' (default) or 'detail'
    --inline             Render in the main screen instead of the alternate screen
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Identity screen:
        Tab / Down       Next field
        Shift-Tab / Up   Previous field
        Enter            Submit
        Esc              Quit
    Detail screen:
        Tab              Switch between table and departments
        Left / Right     Previous / next page
        Home / End       First / last page
        Up / Down        Move in the department list
        Space / Enter    Expand a department or check a sub-department
        q / Esc          Quit
    Ctrl+C               Quit from anywhere

ENVIRONMENT VARIABLES:
    DEPTGATE_ENDPOINT     Override --endpoint
    DEPTGATE_STORE        Override --store
    DEPTGATE_TIMEOUT_MS   Override --timeout-ms
    DEPTGATE_LOG_FILE     Override --log-file
    DEPTGATE_START        Override --start
    DEPTGATE_LOG          Log filter, env-filter syntax (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub endpoint: String,
    /// `None` means the platform default path.
    pub store_path: Option<PathBuf>,
    pub timeout_ms: u64,
    pub log_file: Option<PathBuf>,
    pub inline: bool,
    pub start: Route,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            store_path: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            log_file: None,
            inline: false,
            start: Route::IdentityCapture,
        }
    }
}

impl Opts {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Store path with the platform default filled in.
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(FileIdentityStore::default_path)
    }

    /// Parse the process arguments and environment.
    ///
    /// Prints and exits for `--help`, `--version`, and invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_from(&args, |key| env::var(key).ok()) {
            Ok(CliCommand::Run(opts)) => opts,
            Ok(CliCommand::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(CliCommand::Version) => {
                println!("deptgate {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run(Opts),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A flag or variable had a value that does not parse.
    InvalidValue { name: String, value: String },
    UnknownArgument(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { name, value } => {
                write!(f, "Invalid {name} value: {value}")
            }
            ConfigError::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse `args` (without the program name), reading overrides via `env`.
///
/// # Errors
///
/// Returns [`ConfigError`] for unknown flags and unparseable values.
pub fn parse_from<F>(args: &[String], env: F) -> Result<CliCommand, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    // Environment first, flags override below.
    if let Some(val) = env("DEPTGATE_ENDPOINT") {
        opts.endpoint = non_empty("DEPTGATE_ENDPOINT", &val)?;
    }
    if let Some(val) = env("DEPTGATE_STORE") {
        opts.store_path = Some(PathBuf::from(non_empty("DEPTGATE_STORE", &val)?));
    }
    if let Some(val) = env("DEPTGATE_TIMEOUT_MS") {
        opts.timeout_ms = parse_timeout("DEPTGATE_TIMEOUT_MS", &val)?;
    }
    if let Some(val) = env("DEPTGATE_LOG_FILE") {
        opts.log_file = Some(PathBuf::from(non_empty("DEPTGATE_LOG_FILE", &val)?));
    }
    if let Some(val) = env("DEPTGATE_START") {
        opts.start = parse_route("DEPTGATE_START", &val)?;
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--inline" => opts.inline = true,
            other => {
                if let Some(val) = other.strip_prefix("--endpoint=") {
                    opts.endpoint = non_empty("--endpoint", val)?;
                } else if let Some(val) = other.strip_prefix("--store=") {
                    opts.store_path = Some(PathBuf::from(non_empty("--store", val)?));
                } else if let Some(val) = other.strip_prefix("--timeout-ms=") {
                    opts.timeout_ms = parse_timeout("--timeout-ms", val)?;
                } else if let Some(val) = other.strip_prefix("--log-file=") {
                    opts.log_file = Some(PathBuf::from(non_empty("--log-file", val)?));
                } else if let Some(val) = other.strip_prefix("--start=") {
                    opts.start = parse_route("--start", val)?;
                } else {
                    return Err(ConfigError::UnknownArgument(other.to_string()));
                }
            }
        }
    }

    Ok(CliCommand::Run(opts))
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn non_empty(name: &str, value: &str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(name, value));
    }
    Ok(value.to_string())
}

fn parse_timeout(name: &str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(invalid(name, value)),
    }
}

fn parse_route(name: &str, value: &str) -> Result<Route, ConfigError> {
    match value {
        "identity" => Ok(Route::IdentityCapture),
        "detail" => Ok(Route::Detail),
        _ => Err(invalid(name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(list: &[&str]) -> Opts {
        match parse_from(&args(list), no_env) {
            Ok(CliCommand::Run(opts)) => opts,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run(&[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(opts.timeout(), Duration::from_secs(10));
        assert_eq!(opts.start, Route::IdentityCapture);
        assert!(!opts.inline);
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run(&[
            "--endpoint=http://localhost:8080/posts",
            "--store=/tmp/s.json",
            "--timeout-ms=250",
            "--log-file=/tmp/d.log",
            "--start=detail",
            "--inline",
        ]);
        assert_eq!(opts.endpoint, "http://localhost:8080/posts");
        assert_eq!(opts.store_path, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(opts.timeout_ms, 250);
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/d.log")));
        assert_eq!(opts.start, Route::Detail);
        assert!(opts.inline);
    }

    #[test]
    fn flags_override_env() {
        let env = |key: &str| match key {
            "DEPTGATE_TIMEOUT_MS" => Some("500".to_string()),
            "DEPTGATE_ENDPOINT" => Some("http://env/posts".to_string()),
            _ => None,
        };
        let Ok(CliCommand::Run(opts)) = parse_from(&args(&["--timeout-ms=900"]), env) else {
            panic!("expected run");
        };
        assert_eq!(opts.timeout_ms, 900);
        assert_eq!(opts.endpoint, "http://env/posts");
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(
            parse_from(&args(&["--timeout-ms=abc"]), no_env),
            Err(invalid("--timeout-ms", "abc"))
        );
        assert_eq!(
            parse_from(&args(&["--timeout-ms=0"]), no_env),
            Err(invalid("--timeout-ms", "0"))
        );
        assert_eq!(
            parse_from(&args(&["--start=home"]), no_env),
            Err(invalid("--start", "home"))
        );
        let env = |key: &str| (key == "DEPTGATE_START").then(|| "nowhere".to_string());
        assert!(parse_from(&[], env).is_err());
    }

    #[test]
    fn unknown_argument_is_error() {
        let err = parse_from(&args(&["--bogus"]), no_env).expect_err("unknown");
        assert_eq!(err.to_string(), "Unknown argument: --bogus");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(
            parse_from(&args(&["--help", "--bogus"]), no_env),
            Ok(CliCommand::Help)
        );
        assert_eq!(parse_from(&args(&["-V"]), no_env), Ok(CliCommand::Version));
    }

    #[test]
    fn help_text_lists_env_vars() {
        for var in ["DEPTGATE_ENDPOINT", "DEPTGATE_STORE", "DEPTGATE_LOG", "DEPTGATE_START"] {
            assert!(HELP_TEXT.contains(var), "missing {var}");
        }
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn explicit_store_path_wins() {
        let opts = run(&["--store=/var/tmp/x.json"]);
        assert_eq!(opts.resolved_store_path(), PathBuf::from("/var/tmp/x.json"));
    }
}
