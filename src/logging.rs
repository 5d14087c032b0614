//! Structured logging setup
//!
//! Installs a `tracing` subscriber with:
//! - JSON output for production, pretty-print for development
//! - Level selection from `PETS_API_LOG_LEVEL`, overridable by `RUST_LOG`
//! - Credential redaction for the request headers the entry point logs
//!
//! The library itself never installs a subscriber; binaries and tests call
//! [`init_logging`] once.

use crate::config::Environment;
use crate::server::Headers;
use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Placeholder written in place of a redacted header value.
pub const REDACTED: &str = "[REDACTED]";

/// Header names whose values never reach the log when redacting credentials.
pub const CREDENTIAL_HEADERS: [&str; 3] = ["authorization", "cookie", "x-api-key"];

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Redaction level for sensitive data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactionLevel {
    /// No redaction (dev only)
    None,
    /// Redact credential headers
    Credentials,
}

impl RedactionLevel {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => RedactionLevel::None,
            _ => RedactionLevel::Credentials,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub redact_level: RedactionLevel,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Defaults for `environment`, overridden by any `PETS_API_LOG_*` variable that is set
    #[must_use]
    pub fn from_env(environment: Environment) -> Self {
        Self::from_lookup(environment, |key| env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] but reading from `lookup`.
    #[must_use]
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::for_environment(environment);
        if let Some(level) = lookup("PETS_API_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(format) = lookup("PETS_API_LOG_FORMAT") {
            config.format = LogFormat::parse(&format);
        }
        if let Some(redact) = lookup("PETS_API_LOG_REDACT") {
            config.redact_level = RedactionLevel::parse(&redact);
        }
        config
    }

    /// Defaults for a deployment environment.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Dev => Self {
                log_level: "debug".to_string(),
                format: LogFormat::Pretty,
                redact_level: RedactionLevel::None,
                include_location: true,
            },
            Environment::Prod => Self {
                log_level: "info".to_string(),
                format: LogFormat::Json,
                redact_level: RedactionLevel::Credentials,
                include_location: false,
            },
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Copy of `headers` with credential values replaced by [`REDACTED`].
#[must_use]
pub fn redact_headers(headers: &Headers, level: RedactionLevel) -> Headers {
    let mut out = headers.clone();
    if level == RedactionLevel::None {
        return out;
    }
    for name in CREDENTIAL_HEADERS {
        if out.get(name).is_some() {
            out.insert(name, REDACTED);
        }
    }
    out
}

/// Install the global subscriber.
///
/// Output goes to stderr so the CLI can keep stdout for artifacts.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use pets_api::config::Environment;
/// use pets_api::logging::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::from_env(Environment::Prod)).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Json);
    }

    #[test]
    fn test_redaction_level_parse() {
        assert_eq!(RedactionLevel::parse("none"), RedactionLevel::None);
        assert_eq!(RedactionLevel::parse("credentials"), RedactionLevel::Credentials);
        assert_eq!(RedactionLevel::parse("invalid"), RedactionLevel::Credentials);
    }

    #[test]
    fn test_from_lookup_defaults_and_overrides() {
        let config = LogConfig::from_lookup(Environment::Prod, |_| None);
        assert_eq!(config, LogConfig::for_environment(Environment::Prod));
        let config = LogConfig::from_lookup(Environment::Dev, |_| None);
        assert_eq!(config, LogConfig::for_environment(Environment::Dev));

        let vars: HashMap<&str, &str> = HashMap::from([
            ("PETS_API_LOG_LEVEL", "debug"),
            ("PETS_API_LOG_FORMAT", "pretty"),
            ("PETS_API_LOG_REDACT", "none"),
        ]);
        let config =
            LogConfig::from_lookup(Environment::Prod, |k| vars.get(k).map(|v| (*v).to_string()));
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.redact_level, RedactionLevel::None);

        let config = LogConfig::from_lookup(Environment::Dev, |k| {
            (k == "PETS_API_LOG_REDACT").then(|| "credentials".to_string())
        });
        assert_eq!(config.redact_level, RedactionLevel::Credentials);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_environment_defaults() {
        let dev = LogConfig::for_environment(Environment::Dev);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert_eq!(dev.redact_level, RedactionLevel::None);
        let prod = LogConfig::for_environment(Environment::Prod);
        assert_eq!(prod.format, LogFormat::Json);
        assert_eq!(prod.redact_level, RedactionLevel::Credentials);
        assert_eq!(prod.level(), Level::INFO);
    }

    #[test]
    fn test_redact_headers() {
        let mut headers = Headers::new();
        headers.insert("Authorization", "Bearer secret");
        headers.insert("Cookie", "session=1");
        headers.insert("User-Agent", "curl");

        let redacted = redact_headers(&headers, RedactionLevel::Credentials);
        assert_eq!(redacted.get("authorization"), Some(REDACTED));
        assert_eq!(redacted.get("cookie"), Some(REDACTED));
        assert_eq!(redacted.get("user-agent"), Some("curl"));
        assert_eq!(redacted.get("x-api-key"), None);

        let untouched = redact_headers(&headers, RedactionLevel::None);
        assert_eq!(untouched, headers);
    }
}
