//! Compiled regular expressions used by DTO validation.

use regex::Regex;
use std::sync::LazyLock;

/// Letters, digits and underscores.
pub static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// E.164 phone number with an optional leading `+`.
pub static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap());

/// Stock keeping unit such as `ABC-1234`.
pub static SKU: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}-\d{4}$").unwrap());

pub static ORDER_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ORD-[A-Z0-9]{8}$").unwrap());

pub static DISCOUNT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6,10}$").unwrap());

/// ISBN-13 without separators.
pub static ISBN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{13}$").unwrap());

/// Dotted-quad shape; octet ranges are not checked.
pub static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").unwrap());

pub static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Lowercase words joined by single hyphens.
pub static URL_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

pub static CREDIT_CARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{4}$").unwrap());

/// Free-text search: letters, digits and spaces.
pub static SEARCH_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 ]+$").unwrap());

pub static LETTERS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku() {
        assert!(SKU.is_match("ABC-1234"));
        assert!(!SKU.is_match("abc-1234"));
        assert!(!SKU.is_match("ABCD-123"));
    }

    #[test]
    fn test_phone() {
        assert!(PHONE.is_match("+14155552671"));
        assert!(PHONE.is_match("4155552671"));
        assert!(!PHONE.is_match("+0123"));
        assert!(!PHONE.is_match("+1234567890123456"));
    }

    #[test]
    fn test_order_id() {
        assert!(ORDER_ID.is_match("ORD-AB12CD34"));
        assert!(!ORDER_ID.is_match("ORD-ab12cd34"));
        assert!(!ORDER_ID.is_match("ORD-AB12"));
    }

    #[test]
    fn test_url_slug() {
        assert!(URL_SLUG.is_match("hello-world-2"));
        assert!(!URL_SLUG.is_match("Hello-World"));
        assert!(!URL_SLUG.is_match("double--hyphen"));
        assert!(!URL_SLUG.is_match("-leading"));
    }

    #[test]
    fn test_isbn_requires_thirteen_digits() {
        assert!(ISBN.is_match("9780134685991"));
        assert!(!ISBN.is_match("978-0134685991"));
        assert!(!ISBN.is_match("978013468599"));
    }
}
