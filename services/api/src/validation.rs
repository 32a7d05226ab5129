//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Check whether a name belongs to the lot's naming scheme.
///
/// The lot has two zones of ten spots each: `A1`-`A10` and `B1`-`B10`.
/// This predicate is the single source of truth for the scheme; both the
/// preference write path and the allocation-time resolver go through it.
pub fn is_valid_spot_name(name: &str) -> bool {
    static SPOT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SPOT_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[AB](10|[1-9])$").expect("Failed to compile spot name regex"));

    regex.is_match(name)
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_spot_in_both_zones() {
        for zone in ["A", "B"] {
            for n in 1..=10 {
                let name = format!("{}{}", zone, n);
                assert!(is_valid_spot_name(&name), "{} should be valid", name);
            }
        }
    }

    #[test]
    fn rejects_names_outside_the_scheme() {
        for name in ["A0", "A11", "B11", "C1", "a1", "AB1", "A", "10", "", "A1 "] {
            assert!(!is_valid_spot_name(name), "{} should be invalid", name);
        }
    }

    #[test]
    fn rejects_reference_point_names() {
        // Reference points are preferences, not spots.
        for name in ["entrance", "exit", "shop"] {
            assert!(!is_valid_spot_name(name));
        }
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("driver@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }
}
