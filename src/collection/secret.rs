//! Random identifier generation

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default length of a generated secret
pub const DEFAULT_SECRET_LENGTH: usize = 32;

/// Generates a random string of `length` characters from `[A-Za-z0-9]`.
pub fn generate_secret(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_alphabet() {
        for length in [0, 1, 12, DEFAULT_SECRET_LENGTH] {
            let secret = generate_secret(length);
            assert_eq!(secret.len(), length);
            assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate_secret(DEFAULT_SECRET_LENGTH), generate_secret(DEFAULT_SECRET_LENGTH));
    }
}
