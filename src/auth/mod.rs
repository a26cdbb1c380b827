//! Authentication types for the Dynamic REST client.
//!
//! This module provides the credentials a client is constructed with and the
//! state machine tracking whether the client is currently authenticated.
//!
//! # Overview
//!
//! - [`Authentication`]: Construction-time credentials (token, session id, login)
//! - [`Credential`]: The single credential currently sent with requests
//! - [`AuthState`] and [`AuthStatus`]: The client's authentication state
//! - [`session`]: Extraction of the `sessionid` cookie from a login response
//!
//! # Credential Forms
//!
//! Dynamic REST APIs accept two mutually exclusive credential forms:
//!
//! - **Token**: sent verbatim in the `Authorization` header.
//! - **Session id**: sent as `Cookie: sessionid=<value>`. A session id can be
//!   supplied up front or obtained by logging in with a login and password.
//!
//! # Example
//!
//! ```rust
//! use drest::auth::{Authentication, AuthState, AuthStatus};
//!
//! let state = AuthState::from_authentication(Some(&Authentication::token("secret")));
//! assert_eq!(state.status(), AuthStatus::Authenticated);
//!
//! let state = AuthState::from_authentication(None);
//! assert_eq!(state.status(), AuthStatus::Unauthenticated);
//! ```

mod credentials;
pub mod session;
mod state;

pub use credentials::{Authentication, LoginCredentials};
pub use state::{AuthState, AuthStatus, Credential};
