//! Password policy and hashing configuration.

use serde::{Deserialize, Serialize};

/// Password strength policy and digest algorithm selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Digest algorithm used to store passwords. One of the registered
    /// hash scheme names; `"none"` stores plaintext. An unregistered name
    /// is a fatal configuration error at engine construction.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Minimum password length.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Minimum number of distinct character classes
    /// (lowercase, uppercase, digit, other) a password must contain.
    #[serde(default = "default_min_charsets")]
    pub min_charsets: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            min_length: default_min_length(),
            min_charsets: default_min_charsets(),
        }
    }
}

fn default_algorithm() -> String {
    "none".to_string()
}

fn default_min_length() -> usize {
    10
}

fn default_min_charsets() -> usize {
    3
}
