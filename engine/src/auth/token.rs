//! Session token generation and cookie signing
//!
//! The cookie carries `<token>.<hmac-hex>`. The signature is checked in
//! constant time before the token ever reaches the session store, so forged
//! cookies cost no database round trip.

use super::{AuthError, SecretString};
use rand::Rng;
use ring::hmac;
use ring::rand::SystemRandom;

const TOKEN_LEN: usize = 32;

/// Generate a new random session token
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..62u8);
            match idx {
                0..=25 => (b'A' + idx) as char,
                26..=51 => (b'a' + (idx - 26)) as char,
                _ => (b'0' + (idx - 52)) as char,
            }
        })
        .collect()
}

/// Signs and verifies session cookie values
#[derive(Clone)]
pub struct TokenSigner {
    key: hmac::Key,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from a configured secret
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.unsecure().as_bytes()),
        }
    }

    /// Create a signer with a random key that lives as long as the process
    pub fn ephemeral() -> Result<Self, AuthError> {
        let rng = SystemRandom::new();
        let key = hmac::Key::generate(hmac::HMAC_SHA256, &rng)
            .map_err(|_| AuthError::RandomUnavailable)?;
        Ok(Self { key })
    }

    /// Produce the cookie value for `token`
    pub fn sign(&self, token: &str) -> String {
        let tag = hmac::sign(&self.key, token.as_bytes());
        format!("{}.{}", token, hex::encode(tag.as_ref()))
    }

    /// Return the token inside a cookie value if its signature is valid
    pub fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (token, signature) = cookie_value.rsplit_once('.')?;
        if token.len() != TOKEN_LEN {
            return None;
        }
        let signature = hex::decode(signature).ok()?;

        hmac::verify(&self.key, token.as_bytes(), &signature)
            .ok()
            .map(|_| token)
    }
}
