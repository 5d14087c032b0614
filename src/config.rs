//! # Configuration Module
//!
//! Process configuration for the pets service, resolved from environment
//! variables once before the first request and then passed by value into the
//! entry point.
//!
//! ## Environment Variables
//!
//! ### `ENVIRONMENT` (required)
//!
//! Either `dev` or `prod`. Selects whether internal error causes are surfaced
//! in error envelopes (`dev`) or always omitted (`prod`). A missing or unknown
//! value is a startup fault.
//!
//! ## Usage
//!
//! ```rust
//! use pets_api::config::{ApiEnv, Environment};
//!
//! let env = ApiEnv::from_lookup(|key| (key == "ENVIRONMENT").then(|| "dev".to_string()))
//!     .expect("valid config");
//! assert_eq!(env.environment, Environment::Dev);
//! ```
//!
//! Tests build a fresh [`ApiEnv`] per case with [`ApiEnv::from_lookup`]
//! instead of mutating the process environment.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of the variable selecting the deployment mode.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Whether internal error causes may be surfaced to callers.
    #[must_use]
    pub fn is_dev(self) -> bool {
        self == Environment::Dev
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigError::Invalid {
                var: ENVIRONMENT_VAR,
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration resolution failure. Raised at startup only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is not set
    Missing { var: &'static str },
    /// Variable is set to a value outside its allowed set
    Invalid { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing { var } => {
                write!(f, "configuration error: {var} is not set (expected 'dev' or 'prod')")
            }
            ConfigError::Invalid { var, value } => write!(
                f,
                "configuration error: {var}='{value}' is invalid (expected 'dev' or 'prod')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated service configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiEnv {
    pub environment: Environment,
}

impl ApiEnv {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(ENVIRONMENT_VAR).ok_or(ConfigError::Missing {
            var: ENVIRONMENT_VAR,
        })?;
        let environment = raw.parse()?;
        Ok(Self { environment })
    }

    /// Render back into variable form, e.g. to seed a deployment or a child process.
    #[must_use]
    pub fn to_env_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert(
            ENVIRONMENT_VAR.to_string(),
            self.environment.as_str().to_string(),
        );
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| {
            if key == ENVIRONMENT_VAR {
                value.map(str::to_string)
            } else {
                None
            }
        }
    }

    #[test]
    fn test_resolves_dev_and_prod() {
        assert_eq!(
            ApiEnv::from_lookup(lookup(Some("dev"))).unwrap().environment,
            Environment::Dev
        );
        assert_eq!(
            ApiEnv::from_lookup(lookup(Some("prod"))).unwrap().environment,
            Environment::Prod
        );
    }

    #[test]
    fn test_only_dev_is_dev() {
        assert!(Environment::Dev.is_dev());
        assert!(!Environment::Prod.is_dev());
    }

    #[test]
    fn test_missing_is_error() {
        assert_eq!(
            ApiEnv::from_lookup(lookup(None)),
            Err(ConfigError::Missing {
                var: ENVIRONMENT_VAR
            })
        );
    }

    #[test]
    fn test_invalid_is_error() {
        let err = ApiEnv::from_lookup(lookup(Some("staging"))).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref value, .. } if value == "staging"));
        assert!(err.to_string().contains("staging"));
        assert!(ApiEnv::from_lookup(lookup(Some("PROD"))).is_err());
    }

    #[test]
    fn test_round_trips_through_env_vars() {
        let env = ApiEnv::new(Environment::Prod);
        let vars = env.to_env_vars();
        assert_eq!(vars.get("ENVIRONMENT").map(String::as_str), Some("prod"));
        let back = ApiEnv::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(back, env);
    }
}
