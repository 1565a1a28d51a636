//! Session credential resolution.
//!
//! The session token may come from the config file or, taking precedence,
//! from the `BLUEFEED_SESSION_TOKEN` environment variable.

use super::types::ApiConfig;

pub const SESSION_TOKEN_ENV: &str = "BLUEFEED_SESSION_TOKEN";

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

impl ApiConfig {
    /// Resolve the session token. Empty values count as unset.
    ///
    /// Called on demand and not cached.
    pub fn resolve_session_token(&self) -> Option<SecureString> {
        std::env::var(SESSION_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| self.session_token.clone().filter(|token| !token.is_empty()))
            .map(SecureString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_does_not_leak() {
        let secret = SecureString::new("session-abc".to_string());

        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("session-abc"));
        assert!(debug_output.contains("••••••••"));

        let display_output = format!("{}", secret);
        assert!(!display_output.contains("session-abc"));

        assert_eq!(secret.expose(), "session-abc");
    }

    #[test]
    fn test_empty_config_token_is_unset() {
        let config = ApiConfig {
            session_token: Some(String::new()),
            ..ApiConfig::default()
        };
        if std::env::var(SESSION_TOKEN_ENV).is_err() {
            assert!(config.resolve_session_token().is_none());
        }
    }
}
