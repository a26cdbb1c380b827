//! Session cookie handling for login responses.
//!
//! A successful login against a Dynamic REST API answers with a
//! `Set-Cookie: sessionid=...` header. This module extracts that value so
//! the client can install it as its active credential.

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "sessionid";

/// Returns the `sessionid` value from a list of `Set-Cookie` header values.
///
/// Cookie attributes (`Path`, `HttpOnly`, ...) are ignored. An empty value is
/// treated as absent, since servers clear cookies by setting them empty.
///
/// # Example
///
/// ```rust
/// use drest::auth::session::session_id_from_set_cookie;
///
/// let headers = vec![
///     "csrftoken=abc; Path=/".to_string(),
///     "sessionid=xyz789; HttpOnly; Path=/".to_string(),
/// ];
/// assert_eq!(session_id_from_set_cookie(&headers), Some("xyz789".to_string()));
/// ```
#[must_use]
pub fn session_id_from_set_cookie(set_cookie: &[String]) -> Option<String> {
    set_cookie.iter().find_map(|header| {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        if name.trim() != SESSION_COOKIE {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
