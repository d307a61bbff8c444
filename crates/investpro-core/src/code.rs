//! Access code generation.
//!
//! Codes look like `INV4821730` — a fixed tag, the last six digits of the
//! current unix-millis clock, and a zero-padded random suffix, truncated
//! to ten characters. Uniqueness is not guaranteed here; the registry
//! rejects collisions at register time and the issuance path regenerates.

use chrono::Utc;
use rand::Rng;

/// Tag prefixed to every access code.
pub const CODE_TAG: &str = "INV";

/// Maximum code length after truncation.
pub const CODE_MAX_LEN: usize = 10;

/// Generate a candidate access code.
///
/// Time-derived with a short random suffix, so two codes issued in the
/// same millisecond still differ with high probability.
#[must_use]
pub fn generate() -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let time_suffix = &millis[millis.len().saturating_sub(6)..];
    let random_suffix: u16 = rand::thread_rng().gen_range(0..999);
    let code = format!("{CODE_TAG}{time_suffix}{random_suffix:03}");
    code.chars().take(CODE_MAX_LEN).collect()
}

/// Normalize user input to the stored code form.
///
/// Codes are issued uppercase; the login form accepts any case.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_carry_the_tag() {
        let code = generate();
        assert!(code.starts_with(CODE_TAG));
    }

    #[test]
    fn generated_codes_respect_the_length_cap() {
        for _ in 0..100 {
            assert_eq!(generate().len(), CODE_MAX_LEN);
        }
    }

    #[test]
    fn generated_codes_are_tag_plus_digits() {
        let code = generate();
        assert!(code[CODE_TAG.len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize("  inv001 "), "INV001");
        assert_eq!(normalize("InV123456"), "INV123456");
    }
}
