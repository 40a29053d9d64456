//! Bearer-token sources for authenticated API calls.

use crate::error::Error;

/// Supplies the bearer token sent with every API request.
pub trait TokenProvider {
    /// The current access token, without the `Bearer ` prefix.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingToken` when no token is available.
    fn token(&self) -> Result<String, Error>;
}

/// A token fixed at construction, e.g. from `--token`.
#[derive(Debug, Clone)]
pub struct StaticToken(
    /// The token value.
    pub String,
);

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String, Error> {
        if self.0.trim().is_empty() {
            return Err(Error::MissingToken { source_name: "--token".to_string() });
        }
        return Ok(self.0.clone());
    }
}

/// A token read from an environment variable on every request, so a
/// refreshed value is picked up without restarting.
#[derive(Debug, Clone)]
pub struct EnvToken {
    /// Variable name.
    var: String,
}

impl EnvToken {
    /// Read from `var`.
    pub fn new(var: impl Into<String>) -> Self {
        return Self { var: var.into() };
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Result<String, Error> {
        return match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(strip_bearer(&token).to_string()),
            _ => Err(Error::MissingToken { source_name: format!("${}", self.var) }),
        };
    }
}

/// Accept tokens pasted with or without the `Bearer ` scheme prefix.
fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    return token.strip_prefix("Bearer ").unwrap_or(token).trim();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn static_token_round_trips() {
        assert_eq!(StaticToken("abc".to_string()).token().unwrap(), "abc");
    }

    #[test]
    fn blank_static_token_is_missing() {
        let err = StaticToken("  ".to_string()).token().unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));
    }

    #[test]
    fn unset_env_token_names_the_variable() {
        let provider = EnvToken::new("CODEPEEK_TEST_TOKEN_THAT_IS_NEVER_SET");
        let err = provider.token().unwrap_err();
        assert_eq!(err.to_string(), "missing token: $CODEPEEK_TEST_TOKEN_THAT_IS_NEVER_SET is not set");
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(strip_bearer("Bearer eyJhbGciOi"), "eyJhbGciOi");
        assert_eq!(strip_bearer(" eyJhbGciOi\n"), "eyJhbGciOi");
    }
}
