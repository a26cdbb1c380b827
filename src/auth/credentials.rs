//! Construction-time credentials.

use crate::config::{AuthToken, Password, SessionId};

/// Login and password used to obtain a session from the auth endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginCredentials {
    /// The login (user name or email) sent as the `login` form field.
    pub login: String,
    /// The password sent as the `password` form field.
    pub password: Password,
}

/// Credentials supplied when constructing a client.
///
/// A token and a session id may both be given; the session id is installed
/// last and therefore wins, since only one credential is active at a time.
/// Login credentials are only used when neither yields an active credential.
///
/// # Example
///
/// ```rust
/// use drest::auth::Authentication;
///
/// let auth = Authentication::token("Token abc123");
/// assert!(auth.has_credential());
///
/// let auth = Authentication::login("jane@example.com", "hunter2");
/// assert!(!auth.has_credential());
/// assert!(auth.login_credentials().is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Authentication {
    token: Option<AuthToken>,
    session_id: Option<SessionId>,
    login: Option<LoginCredentials>,
}

impl Authentication {
    /// Authenticates with an `Authorization` header token.
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: Some(AuthToken::new(token)),
            ..Self::default()
        }
    }

    /// Authenticates with an existing session id.
    #[must_use]
    pub fn session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(SessionId::new(session_id)),
            ..Self::default()
        }
    }

    /// Authenticates by logging in on first use.
    #[must_use]
    pub fn login(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: Some(LoginCredentials {
                login: login.into(),
                password: Password::new(password),
            }),
            ..Self::default()
        }
    }

    /// Adds a token to these credentials.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(AuthToken::new(token));
        self
    }

    /// Adds a session id to these credentials.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(SessionId::new(session_id));
        self
    }

    /// Adds login credentials used when no token or session id is active.
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.login = Some(LoginCredentials {
            login: login.into(),
            password: Password::new(password),
        });
        self
    }

    /// Returns the configured token, if any.
    #[must_use]
    pub const fn get_token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Returns the configured session id, if any.
    #[must_use]
    pub const fn get_session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Returns the configured login credentials, if any.
    #[must_use]
    pub const fn login_credentials(&self) -> Option<&LoginCredentials> {
        self.login.as_ref()
    }

    /// Returns `true` if a non-empty token or session id is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_empty())
            || self.session_id.as_ref().is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_constructor() {
        let auth = Authentication::token("T");
        assert_eq!(auth.get_token().map(AsRef::as_ref), Some("T"));
        assert!(auth.get_session_id().is_none());
        assert!(auth.has_credential());
    }

    #[test]
    fn test_empty_values_are_not_credentials() {
        let auth = Authentication::token("").with_session_id("");
        assert!(!auth.has_credential());
    }

    #[test]
    fn test_login_debug_masks_password() {
        let auth = Authentication::login("jane", "hunter2");
        let debug = format!("{auth:?}");
        assert!(debug.contains("jane"));
        assert!(!debug.contains("hunter2"));
    }
}
