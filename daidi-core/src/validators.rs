use std::sync::LazyLock;
use regex::Regex;
use crate::{CoreError, CoreResult};

static IRANIAN_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\+98|0)?9\d{9}$").expect("static regex"));
static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("static regex"));
static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("static regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));

/// Mobile number: 09123456789, 9123456789 or +989123456789
pub fn validate_iranian_phone(value: &str) -> CoreResult<()> {
    if IRANIAN_PHONE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!("invalid phone number '{}', expected 09123456789", value)))
    }
}

pub fn validate_postal_code(value: &str) -> CoreResult<()> {
    if POSTAL_CODE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::ValidationError("postal code must be 10 digits".to_string()))
    }
}

pub fn validate_slug(value: &str) -> CoreResult<()> {
    if SLUG.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!("invalid slug '{}'", value)))
    }
}

/// Lower-case words joined by hyphens. Non-latin letters are kept.
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|word| word.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn validate_email(value: &str) -> CoreResult<()> {
    if EMAIL.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!("invalid email address '{}'", value)))
    }
}

pub fn validate_not_empty(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        Err(CoreError::ValidationError(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats() {
        assert!(validate_iranian_phone("09123456789").is_ok());
        assert!(validate_iranian_phone("9123456789").is_ok());
        assert!(validate_iranian_phone("+989123456789").is_ok());

        assert!(validate_iranian_phone("0912345678").is_err());
        assert!(validate_iranian_phone("02188776655").is_err());
        assert!(validate_iranian_phone("+44 7700 900000").is_err());
    }

    #[test]
    fn test_postal_code() {
        assert!(validate_postal_code("1234567890").is_ok());
        assert!(validate_postal_code("12345-67890").is_err());
        assert!(validate_postal_code("123456789").is_err());
    }

    #[test]
    fn test_slug_and_email() {
        assert!(validate_slug("label-digital_normal").is_ok());
        assert!(validate_slug("label digital").is_err());

        assert!(validate_email("sara@example.com").is_ok());
        assert!(validate_email("sara@example").is_err());
        assert!(validate_email("sara example.com").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Wedding Invitation  Cards"), "wedding-invitation-cards");
        assert_eq!(slugify("Logo & Brand-Identity!"), "logo-brand-identity");
        assert_eq!(slugify("چاپ لیبل"), "چاپ-لیبل");
        assert!(validate_slug(&slugify("چاپ لیبل")).is_ok());
        assert_eq!(slugify(" !! "), "");
    }

    #[test]
    fn test_not_empty() {
        assert!(validate_not_empty("message", "  hi ").is_ok());
        let err = validate_not_empty("message", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: message is required");
    }
}
