//! Authentication state machine.
//!
//! [`AuthState`] is owned by the HTTP client and only transitions through
//! [`AuthState::use_token`], [`AuthState::use_session_id`],
//! [`AuthState::mark_failed`] and construction.

use crate::auth::Authentication;
use crate::config::{AuthToken, SessionId};

/// Whether the client currently holds a usable credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// No credential is active.
    Unauthenticated,
    /// A non-empty token or session id is active.
    Authenticated,
    /// The last login attempt failed.
    Failed,
}

/// The credential sent with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    /// Sent as `Authorization: <token>`.
    Token(AuthToken),
    /// Sent as `Cookie: sessionid=<value>`.
    SessionId(SessionId),
}

impl Credential {
    /// Returns the header name and value carrying this credential.
    #[must_use]
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::Token(token) => ("Authorization", token.as_ref().to_string()),
            Self::SessionId(session) => ("Cookie", session.cookie_header()),
        }
    }
}

/// Authentication state of a client.
///
/// Holds the status and at most one active [`Credential`]. Installing a
/// token clears any session id and vice versa.
///
/// # Example
///
/// ```rust
/// use drest::auth::{AuthState, AuthStatus, Credential};
///
/// let mut state = AuthState::default();
/// state.use_token("Token abc");
/// assert_eq!(state.status(), AuthStatus::Authenticated);
///
/// state.use_session_id("xyz");
/// assert!(matches!(state.credential(), Some(Credential::SessionId(_))));
///
/// state.use_session_id("");
/// assert_eq!(state.status(), AuthStatus::Unauthenticated);
/// assert!(state.credential().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    status: AuthStatus,
    credential: Option<Credential>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            credential: None,
        }
    }
}

impl AuthState {
    /// Builds the initial state from construction-time credentials.
    ///
    /// The token is installed first and the session id second, mirroring the
    /// order in which both are applied when a caller supplies them together.
    #[must_use]
    pub fn from_authentication(authentication: Option<&Authentication>) -> Self {
        let mut state = Self::default();
        if let Some(auth) = authentication {
            if let Some(token) = auth.get_token().filter(|t| !t.is_empty()) {
                state.use_token(token.as_ref());
            }
            if let Some(session) = auth.get_session_id().filter(|s| !s.is_empty()) {
                state.use_session_id(session.as_ref());
            }
        }
        state
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> AuthStatus {
        self.status
    }

    /// Returns `true` if the status is [`AuthStatus::Authenticated`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// Returns the active credential, if any.
    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Replaces the active credential with a token.
    ///
    /// An empty value clears the credential.
    pub fn use_token(&mut self, value: impl Into<String>) {
        let token = AuthToken::new(value);
        self.install((!token.is_empty()).then_some(Credential::Token(token)));
    }

    /// Replaces the active credential with a session id.
    ///
    /// An empty value clears the credential.
    pub fn use_session_id(&mut self, value: impl Into<String>) {
        let session = SessionId::new(value);
        self.install((!session.is_empty()).then_some(Credential::SessionId(session)));
    }

    /// Records a failed login attempt.
    pub fn mark_failed(&mut self) {
        self.status = AuthStatus::Failed;
    }

    fn install(&mut self, credential: Option<Credential>) {
        self.status = if credential.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        };
        self.credential = credential;
    }
}
