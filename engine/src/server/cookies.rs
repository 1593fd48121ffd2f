//! Session cookie plumbing

use crate::auth::TokenSigner;
use crate::config::SessionConfig;
use axum::http::{header, HeaderMap};

/// Reads and writes the signed session cookie
#[derive(Debug, Clone)]
pub struct SessionCookies {
    signer: TokenSigner,
    name: String,
    max_age: u64,
    secure: bool,
}

impl SessionCookies {
    pub fn new(signer: TokenSigner, config: &SessionConfig) -> Self {
        Self {
            signer,
            name: config.cookie_name.clone(),
            max_age: config.ttl_secs,
            secure: config.secure_cookie,
        }
    }

    /// Extract the session token from the request's `Cookie` headers
    ///
    /// Returns `None` when the cookie is absent or its signature is invalid.
    pub fn token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| self.signer.verify(value))
            .map(String::from)
    }

    /// `Set-Cookie` value that stores `token`
    pub fn set(&self, token: &str) -> String {
        self.build(&self.signer.sign(token), self.max_age)
    }

    /// `Set-Cookie` value that removes the cookie
    pub fn clear(&self) -> String {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
