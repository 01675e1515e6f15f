//! Structured logging setup
//!
//! Initializes a `tracing` subscriber writing to stderr, so report output on
//! stdout stays clean. `RUST_LOG` takes precedence over the configured level.
//!
//! # Example
//!
//! ```no_run
//! use qa_feasibility::util::logging;
//!
//! logging::init_logging(logging::LoggingConfig::default());
//!
//! tracing::info!(cases = 3, "Loaded test cases");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Dependencies that are chatty at debug level
const QUIET_DEPENDENCIES: [&str; 4] = ["h2", "hyper", "reqwest", "genai"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for this crate
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Parses a log level name (case-insensitive)
///
/// ```
/// use qa_feasibility::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Some(Level::DEBUG));
/// assert_eq!(parse_level("WARN"), Some(Level::WARN));
/// assert_eq!(parse_level("invalid"), None);
/// ```
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let mut directives = vec![format!("qa_feasibility={}", level)];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|dep| format!("{}=warn", dep)));

    directives
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(EnvFilter::new("warn"), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Initializes the logging system. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}
