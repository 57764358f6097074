//! Secret handling utilities.
//!
//! Re-exports secrecy types and provides helpers for comparing
//! client credentials without exposing them in logs.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Compare two secrets by value.
pub fn secrets_equal(a: &SecretString, b: &SecretString) -> bool {
    a.expose_secret() == b.expose_secret()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_by_value() {
        let a = SecretString::from("s3cret");
        let b = SecretString::from("s3cret");
        let c = SecretString::from("other");
        assert!(secrets_equal(&a, &b));
        assert!(!secrets_equal(&a, &c));
    }
}
