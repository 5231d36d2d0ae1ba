//! String validation, case conversion and masking helpers.
//!
//! Validators return `false` for any input that does not match; masking
//! helpers return the input unchanged when it cannot be masked safely.
//! Case conversion is lossy on repeated underscores: `to_camel_case`
//! collapses them, so snake→camel→snake is not a round trip in general.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("email pattern"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone pattern"));
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("url pattern"));

/// Generates a random UUID without dashes.
#[must_use]
pub fn generate_uuid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Whether the input has a `local@domain` shape with a permissive
/// local-part charset.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Whether the input is a China mobile number: 11 digits, leading `1`,
/// second digit in `3..=9`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Whether the input is an http/https/ftp URL with a non-whitespace body.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

/// Converts `snake_case` to `camelCase`.
///
/// The input is lowercased first; underscores are collapsed and the letter
/// following each run is upper-cased.
#[must_use]
pub fn to_camel_case(input: &str) -> String {
    if input.trim().is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for c in input.to_lowercase().chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Converts `camelCase` to `snake_case`.
///
/// An underscore is inserted before each uppercase transition unless the
/// following character continues a multi-uppercase run, so `userID` becomes
/// `user_id` and `HTTPServer` becomes `h_ttp_server`.
#[must_use]
pub fn to_snake_case(input: &str) -> String {
    if input.trim().is_empty() {
        return input.to_string();
    }
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    let mut in_upper_run = false;
    for (i, &c) in chars.iter().enumerate() {
        let next_upper = chars.get(i + 1).map_or(true, |n| n.is_uppercase());
        if i > 0 && c.is_uppercase() {
            if !in_upper_run || !next_upper {
                out.push('_');
            }
            in_upper_run = true;
        } else {
            in_upper_run = false;
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Replaces the characters in `start..end` with `mask`.
///
/// The range is counted in characters, clamped to the input bounds; when
/// `start > end` the input is returned unchanged.
#[must_use]
pub fn mask(input: &str, start: usize, end: usize, mask: char) -> String {
    if input.trim().is_empty() {
        return input.to_string();
    }
    let mut chars: Vec<char> = input.chars().collect();
    let end = end.min(chars.len());
    if start > end {
        return input.to_string();
    }
    for c in &mut chars[start..end] {
        *c = mask;
    }
    chars.into_iter().collect()
}

/// Masks every local-part character after the first with `*`.
///
/// Inputs that are not valid emails, or whose local part is a single
/// character, are returned unchanged.
#[must_use]
pub fn mask_email(email: &str) -> String {
    if !is_valid_email(email) {
        return email.to_string();
    }
    let at = match email.chars().position(|c| c == '@') {
        Some(i) if i > 1 => i,
        _ => return email.to_string(),
    };
    mask(email, 1, at, '*')
}

/// Masks digits 4-7 of a China mobile number with `*`.
///
/// Inputs that are not valid phone numbers are returned unchanged.
#[must_use]
pub fn mask_phone(phone: &str) -> String {
    if !is_valid_phone(phone) {
        return phone.to_string();
    }
    mask(phone, 3, 7, '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_uuids_are_dashless_and_unique() {
        let a = generate_uuid();
        let b = generate_uuid();
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
        assert_ne!(a, b);
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.com"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("13800138000"));
        assert!(is_valid_phone("19912345678"));
        assert!(!is_valid_phone("2380013800"));
        assert!(!is_valid_phone("1380013800")); // 10 digits
        assert!(!is_valid_phone("12800138000")); // second digit 2
    }

    #[test]
    fn url_validation() {
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(is_valid_url("ftp://files.example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("https://exa mple.com"));
    }

    #[test]
    fn snake_to_camel() {
        assert_eq!(to_camel_case("user_name"), "userName");
        assert_eq!(to_camel_case("a_b_c"), "aBC");
        assert_eq!(to_camel_case("already"), "already");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn camel_to_snake() {
        assert_eq!(to_snake_case("userName"), "user_name");
        assert_eq!(to_snake_case("userID"), "user_id");
        assert_eq!(to_snake_case("HTTPServer"), "h_ttp_server");
        assert_eq!(to_snake_case("simple"), "simple");
    }

    #[test]
    fn case_conversion_is_not_a_round_trip() {
        // Repeated underscores collapse, so the composition is lossy.
        let original = "a__b";
        assert_eq!(to_camel_case(original), "aB");
        assert_ne!(to_snake_case(&to_camel_case(original)), original);
    }

    #[test]
    fn mask_clamps_and_noops() {
        assert_eq!(mask("abcdef", 1, 4, '*'), "a***ef");
        assert_eq!(mask("abc", 1, 99, '*'), "a**");
        assert_eq!(mask("abc", 4, 2, '*'), "abc"); // start > end
        assert_eq!(mask("", 0, 2, '*'), "");
    }

    #[test]
    fn email_masking_preset() {
        assert_eq!(mask_email("ab@example.com"), "a*@example.com");
        assert_eq!(mask_email("alice@example.com"), "a****@example.com");
        assert_eq!(mask_email("a@example.com"), "a@example.com");
        assert_eq!(mask_email("not-an-email"), "not-an-email");
    }

    #[test]
    fn phone_masking_preset() {
        assert_eq!(mask_phone("13800138000"), "138****8000");
        assert_eq!(mask_phone("2380013800"), "2380013800");
    }
}
