//! Provider credentials.
//!
//! Keys are read from an environment variable named in configuration and
//! kept in a [`SecretString`] so they never show up in logs or `Debug`
//! output.
//!
//! # Example
//!
//! ```ignore
//! use quirks_models::auth::ApiKey;
//!
//! let key = ApiKey::from_env("OPENAI_API_KEY")?;
//! ```

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Read a key from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialsNotFound`] if the variable is unset or
    /// blank.
    pub fn from_env(var: &str) -> Result<Self> {
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                debug!(var, "loaded API key from environment");
                Ok(Self::new(value.trim()))
            }
            _ => Err(Error::CredentialsNotFound(var.to_string())),
        }
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn debug_output_is_redacted() {
        let key = ApiKey::new("sk-very-secret");
        let debug = format!("{:?}", key);
        assert_eq!(debug, "ApiKey([REDACTED])");
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn expose_secret_returns_value() {
        let key: ApiKey = "sk-abc".into();
        assert_eq!(key.expose_secret(), "sk-abc");
    }

    #[test]
    #[serial]
    fn from_env_reads_variable() {
        // SAFETY: serialised with the other env tests in this module.
        unsafe { env::set_var("QUIRKS_TEST_API_KEY", "  sk-from-env \n") };
        let key = ApiKey::from_env("QUIRKS_TEST_API_KEY").unwrap();
        assert_eq!(key.expose_secret(), "sk-from-env");
        unsafe { env::remove_var("QUIRKS_TEST_API_KEY") };
    }

    #[test]
    #[serial]
    fn from_env_missing_variable_errors() {
        unsafe { env::remove_var("QUIRKS_TEST_MISSING_KEY") };
        let err = ApiKey::from_env("QUIRKS_TEST_MISSING_KEY").unwrap_err();
        assert!(matches!(err, Error::CredentialsNotFound(ref v) if v == "QUIRKS_TEST_MISSING_KEY"));
    }

    #[test]
    #[serial]
    fn from_env_blank_variable_errors() {
        unsafe { env::set_var("QUIRKS_TEST_BLANK_KEY", "   ") };
        assert!(ApiKey::from_env("QUIRKS_TEST_BLANK_KEY").is_err());
        unsafe { env::remove_var("QUIRKS_TEST_BLANK_KEY") };
    }
}
