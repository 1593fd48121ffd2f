//! Password hashing
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a random 16-byte salt, stored as
//! `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`. The iteration count
//! travels with the hash, so raising `security.password_iterations` only
//! affects new accounts.

use super::AuthError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Salted one-way password hasher
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl PasswordHasher {
    /// Create a hasher producing hashes with `iterations` rounds
    ///
    /// Zero is bumped to one; the configuration layer enforces a sane floor.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN),
            rng: SystemRandom::new(),
        }
    }

    /// Hash a plaintext password
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        self.rng
            .fill(&mut salt)
            .map_err(|_| AuthError::RandomUnavailable)?;

        let mut hash = [0u8; HASH_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            &salt,
            password.as_bytes(),
            &mut hash,
        );

        Ok(format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(salt),
            hex::encode(hash)
        ))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// The comparison is constant-time. A malformed stored hash never verifies.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some(parsed) = ParsedHash::parse(stored) else {
            tracing::warn!("Stored password hash is malformed");
            return false;
        };

        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            parsed.iterations,
            &parsed.salt,
            password.as_bytes(),
            &parsed.hash,
        )
        .is_ok()
    }

    /// Spend the same effort as a real verification, for unknown accounts
    pub fn dummy_verify(&self, password: &str) {
        let mut out = [0u8; HASH_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            &[0u8; SALT_LEN],
            password.as_bytes(),
            &mut out,
        );
    }
}

struct ParsedHash {
    iterations: NonZeroU32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl ParsedHash {
    fn parse(stored: &str) -> Option<Self> {
        let mut parts = stored.split('$');
        if parts.next()? != SCHEME {
            return None;
        }
        let iterations = NonZeroU32::new(parts.next()?.parse().ok()?)?;
        let salt = hex::decode(parts.next()?).ok()?;
        let hash = hex::decode(parts.next()?).ok()?;

        if parts.next().is_some() || salt.is_empty() || hash.len() != HASH_LEN {
            return None;
        }

        Some(Self {
            iterations,
            salt,
            hash,
        })
    }
}
