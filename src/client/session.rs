use std::path::Path;

use tracing::warn;

use crate::io::cookie_jar::{CookieJar, JarError};
use crate::io::paths;
use crate::model::config::SessionConfig;

/// Cookie name the bearer token is stored under
pub const TOKEN_COOKIE: &str = "authToken";

/// Owner of the bearer token.
///
/// Constructed once at startup and shared with the transport and the
/// controller; nothing else reads the cookie jar.
#[derive(Debug)]
pub struct Session {
    jar: CookieJar,
    token_days: i64,
}

impl Session {
    pub fn new(jar: CookieJar, token_days: i64) -> Self {
        Session { jar, token_days }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        let path = config
            .cookie_file
            .clone()
            .unwrap_or_else(paths::default_cookie_file);
        Session::new(CookieJar::new(path), config.token_days)
    }

    pub fn jar_path(&self) -> &Path {
        self.jar.path()
    }

    /// Persist `value` as the token, expiring `days` from now
    pub fn set_token(&self, value: &str, days: i64) -> Result<(), JarError> {
        self.jar.set(TOKEN_COOKIE, value, days)
    }

    /// Persist a freshly issued token with the configured lifetime
    pub fn store_issued(&self, value: &str) -> Result<(), JarError> {
        self.set_token(value, self.token_days)
    }

    /// The current token, or None when absent, expired, or unreadable
    pub fn get_token(&self) -> Option<String> {
        match self.jar.get(TOKEN_COOKIE) {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "could not read session token");
                None
            }
        }
    }

    /// Invalidate the token immediately
    pub fn clear_token(&self) -> Result<(), JarError> {
        self.jar.remove(TOKEN_COOKIE)
    }

    pub fn is_logged_in(&self) -> bool {
        self.get_token().is_some()
    }
}
