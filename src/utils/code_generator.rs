//! Short code generation and validation utilities.
//!
//! Generated codes are fixed-length alphanumeric strings. Uniqueness is not
//! guaranteed here; [`crate::application::services::LinkService`] detects
//! collisions and retries a bounded number of times.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 6;

/// Maximum length of a user-supplied alias.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 32;

/// Reserved codes that cannot be used as short links.
///
/// These collide with fixed routes of the HTTP surface.
pub const RESERVED_CODES: &[&str] = &["api", "health", "search", "shorten", "stats"];

/// Source of candidate short codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Thread-local RNG backed generator producing [`CODE_LENGTH`]-character codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random 6-character code from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns true if `code` shadows a fixed route segment (case-insensitive).
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot be a reserved route segment (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom alias must be 1-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        assert_eq!(generate_code().len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_alphanumeric() {
        for _ in 0..100 {
            assert!(generate_code().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_code_rarely_collides() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();
        // 62^6 possible codes; a thousand draws colliding more than once is vanishingly unlikely
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_random_generator_uses_generate_code() {
        let code = RandomCodeGenerator.generate();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_validate_accepts_short_and_mixed_aliases() {
        for code in ["abc", "123", "a-b-c", "A_B_C", "custom"] {
            assert!(validate_custom_code(code).is_ok(), "{code} should be valid");
        }
    }

    #[test]
    fn test_validate_maximum_length() {
        assert!(validate_custom_code(&"a".repeat(32)).is_ok());
        assert!(validate_custom_code(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_empty_string() {
        let err = validate_custom_code("").unwrap_err();
        assert!(err.to_string().contains("1-32 characters"));
    }

    #[test]
    fn test_validate_special_characters() {
        assert!(validate_custom_code("my code").is_err());
        assert!(validate_custom_code("my/code").is_err());
        assert!(validate_custom_code("code@1").is_err());
    }

    #[test]
    fn test_validate_all_reserved_codes() {
        for &reserved in RESERVED_CODES {
            assert!(
                validate_custom_code(reserved).is_err(),
                "Reserved code '{}' should be invalid",
                reserved
            );
        }
        assert!(validate_custom_code("Search").is_err());
    }
}
