//! Access token verification.

use std::sync::Arc;

use jsonwebtoken::{Validation, decode};
use tracing::debug;

use super::claims::Claims;
use super::keys::JwtKeys;

/// Verifies access tokens against the configured keys and algorithm.
///
/// An invalid, expired, or malformed token is a normal
/// authentication-state outcome ("no session"), never an error raised to
/// the caller, so decoding fails closed to `None`.
#[derive(Debug, Clone)]
pub struct JwtDecoder {
    /// Verification keys and algorithm.
    keys: Arc<JwtKeys>,
    /// Validation configuration.
    validation: Validation,
}

impl JwtDecoder {
    /// Creates a new decoder for the given keys.
    pub fn new(keys: Arc<JwtKeys>) -> Self {
        let mut validation = Validation::new(keys.algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self { keys, validation }
    }

    /// Decodes and verifies a token, returning its claims.
    ///
    /// Any failure (bad signature, wrong algorithm, expired, not yet
    /// valid, malformed) yields `None`.
    pub fn decode(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, self.keys.decoding(), &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "Access token rejected");
                None
            }
        }
    }
}
