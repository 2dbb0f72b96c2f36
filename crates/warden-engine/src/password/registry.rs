//! Named password hash schemes and the dispatch registry.
//!
//! Dispatch is by name lookup, never by conditional branching: adding an
//! algorithm registers a new transform/verify pair and touches no existing
//! code path. Unsalted schemes store plain hex digests; salted schemes
//! produce self-describing digests that embed their own salt and cost and
//! are verified by re-derivation, not digest equality.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use sha2::{Digest, Sha256, Sha512};

use warden_core::error::AuthError;
use warden_core::result::AuthResult;

/// A named pair of pure functions: plaintext to digest, and plaintext +
/// stored digest to a match decision.
pub trait HashScheme: Send + Sync + 'static {
    /// Transforms a plaintext password into its stored digest.
    fn transform(&self, plain: &str) -> AuthResult<String>;

    /// Verifies a plaintext password against a stored digest.
    fn verify(&self, plain: &str, digest: &str) -> AuthResult<bool>;
}

/// Registry mapping algorithm identifiers to hash schemes.
#[derive(Clone)]
pub struct HashRegistry {
    schemes: HashMap<String, Arc<dyn HashScheme>>,
}

impl std::fmt::Debug for HashRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRegistry")
            .field("schemes", &self.schemes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HashRegistry {
    /// Creates a registry with the built-in schemes: `none`, `sha256`,
    /// `sha512`, `bcrypt`, and `argon2`.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            schemes: HashMap::new(),
        };
        registry.register("none", PlainText);
        registry.register("sha256", Sha256Hex);
        registry.register("sha512", Sha512Hex);
        registry.register("bcrypt", Bcrypt);
        registry.register("argon2", Argon2id);
        registry
    }

    /// Registers a scheme under the given identifier, replacing any
    /// existing scheme of the same name.
    pub fn register(&mut self, name: impl Into<String>, scheme: impl HashScheme) {
        self.schemes.insert(name.into(), Arc::new(scheme));
    }

    /// Looks up a scheme by identifier.
    pub fn get(&self, name: &str) -> Option<Arc<dyn HashScheme>> {
        self.schemes.get(name).cloned()
    }

    /// Resolves a scheme by identifier, failing with a fatal configuration
    /// error when it is not registered. Called once at engine
    /// construction, never at first use.
    pub fn resolve(&self, name: &str) -> AuthResult<Arc<dyn HashScheme>> {
        self.get(name).ok_or_else(|| {
            AuthError::configuration(format!("Unsupported password hash algorithm: {name}"))
        })
    }
}

impl Default for HashRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Identity transform, equality verify.
struct PlainText;

impl HashScheme for PlainText {
    fn transform(&self, plain: &str) -> AuthResult<String> {
        Ok(plain.to_string())
    }

    fn verify(&self, plain: &str, digest: &str) -> AuthResult<bool> {
        Ok(plain == digest)
    }
}

/// Unsalted SHA-256 hex digest.
struct Sha256Hex;

impl HashScheme for Sha256Hex {
    fn transform(&self, plain: &str) -> AuthResult<String> {
        Ok(hex::encode(Sha256::digest(plain.as_bytes())))
    }

    fn verify(&self, plain: &str, digest: &str) -> AuthResult<bool> {
        Ok(self.transform(plain)? == digest)
    }
}

/// Unsalted SHA-512 hex digest.
struct Sha512Hex;

impl HashScheme for Sha512Hex {
    fn transform(&self, plain: &str) -> AuthResult<String> {
        Ok(hex::encode(Sha512::digest(plain.as_bytes())))
    }

    fn verify(&self, plain: &str, digest: &str) -> AuthResult<bool> {
        Ok(self.transform(plain)? == digest)
    }
}

/// Salted bcrypt digest (self-describing, embeds cost and salt).
struct Bcrypt;

impl HashScheme for Bcrypt {
    fn transform(&self, plain: &str) -> AuthResult<String> {
        bcrypt::hash(plain, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::internal(format!("Password hashing failed: {e}")))
    }

    fn verify(&self, plain: &str, digest: &str) -> AuthResult<bool> {
        bcrypt::verify(plain, digest)
            .map_err(|e| AuthError::internal(format!("Invalid password digest format: {e}")))
    }
}

/// Salted Argon2id digest (self-describing PHC string).
struct Argon2id;

impl HashScheme for Argon2id {
    fn transform(&self, plain: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    fn verify(&self, plain: &str, digest: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AuthError::internal(format!("Invalid password digest format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}
