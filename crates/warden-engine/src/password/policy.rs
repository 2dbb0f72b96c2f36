//! Password policy enforcement for new passwords.

use warden_core::config::password::PasswordConfig;

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length.
    min_length: usize,
    /// Minimum number of distinct character classes.
    min_charsets: usize,
}

impl PasswordPolicy {
    /// Creates a policy from configuration.
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            min_length: config.min_length,
            min_charsets: config.min_charsets,
        }
    }

    /// Checks a password against the policy.
    ///
    /// Strong iff the length meets the minimum and the password draws from
    /// at least the minimum number of character classes (lowercase,
    /// uppercase, digit, other). Each class is a simple membership test,
    /// not a full charset audit.
    pub fn is_strong(&self, password: &str) -> bool {
        password.chars().count() >= self.min_length && num_charsets(password) >= self.min_charsets
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(&PasswordConfig::default())
    }
}

/// Counts the distinct character classes present in `password`.
fn num_charsets(password: &str) -> usize {
    let classes: [fn(char) -> bool; 4] = [
        |c| c.is_ascii_lowercase(),
        |c| c.is_ascii_uppercase(),
        |c| c.is_ascii_digit(),
        |c| !c.is_ascii_alphanumeric(),
    ];
    classes
        .iter()
        .filter(|class| password.chars().any(|c| class(c)))
        .count()
}
