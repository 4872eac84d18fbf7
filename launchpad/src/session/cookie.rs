//! Session cookie handling

use http::header::{HeaderMap, HeaderValue, COOKIE};

use crate::errors::LaunchpadError;
use crate::session::store::SessionId;

/// Session cookie options
#[derive(Debug, Clone)]
pub struct CookieOptions {
    /// Cookie name
    pub name: String,

    /// Add the `Secure` attribute
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: "__session".to_string(),
            secure: false,
        }
    }
}

impl CookieOptions {
    /// Session id from the request's `Cookie` headers.
    ///
    /// Unknown or malformed values are treated as no session.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| value.trim_matches('"').parse().ok())
    }

    /// `Set-Cookie` value for a session id
    pub fn set_cookie(&self, id: &SessionId) -> Result<HeaderValue, LaunchpadError> {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, id);
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
            .map_err(|e| LaunchpadError::SessionError(format!("Invalid cookie: {}", e)))
    }
}
