//! Phone number utilities
//!
//! Korean mobile numbers arrive in local form (`010-1234-5678`) or E.164
//! (`+82 10 1234 5678`). Everything downstream works on the E.164 form.

use once_cell::sync::Lazy;
use regex::Regex;

// Korean mobile number in local form, separators removed
static KOREAN_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^01[016789]\d{7,8}$").expect("valid korean mobile regex")
});

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").expect("valid e164 regex")
});

const KOREA_PREFIX: &str = "+82";

/// Remove formatting characters, keeping digits and `+`
pub fn strip_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is a Korean mobile number in local form
pub fn is_valid_korean_mobile(phone: &str) -> bool {
    KOREAN_MOBILE_REGEX.is_match(&strip_phone_number(phone))
}

/// Check if a phone number is valid E.164
pub fn is_valid_international_phone(phone: &str) -> bool {
    INTERNATIONAL_PHONE_REGEX.is_match(&strip_phone_number(phone))
}

/// Normalize a phone number to E.164.
///
/// Local Korean mobiles get the `+82` country code. E.164 numbers with the
/// Korean country code must still be mobile numbers, and a redundant trunk
/// zero (`+82 010 ...`) is dropped.
///
/// # Returns
/// `None` when the input is neither a Korean mobile nor a valid E.164 number
pub fn normalize_phone_number(phone: &str) -> Option<String> {
    let stripped = strip_phone_number(phone);

    if KOREAN_MOBILE_REGEX.is_match(&stripped) {
        return Some(format!("{}{}", KOREA_PREFIX, &stripped[1..]));
    }

    if let Some(national) = stripped.strip_prefix(KOREA_PREFIX) {
        let local = if national.starts_with('0') {
            national.to_string()
        } else {
            format!("0{}", national)
        };
        return KOREAN_MOBILE_REGEX
            .is_match(&local)
            .then(|| format!("{}{}", KOREA_PREFIX, &local[1..]));
    }

    if INTERNATIONAL_PHONE_REGEX.is_match(&stripped) {
        return Some(stripped);
    }

    None
}

/// Check if a phone number can be normalized
pub fn is_valid_phone(phone: &str) -> bool {
    normalize_phone_number(phone).is_some()
}

/// Mask a phone number for logs and display (e.g., +8210****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let stripped = strip_phone_number(phone);
    if stripped.len() >= 9 {
        format!("{}****{}", &stripped[0..5], &stripped[stripped.len() - 4..])
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_phone_number() {
        assert_eq!(strip_phone_number("010-1234-5678"), "01012345678");
        assert_eq!(strip_phone_number("+82 10 1234 5678"), "+821012345678");
        assert_eq!(strip_phone_number("(010) 1234-5678"), "01012345678");
    }

    #[test]
    fn test_is_valid_korean_mobile() {
        assert!(is_valid_korean_mobile("01012345678"));
        assert!(is_valid_korean_mobile("011-123-4567"));
        assert!(is_valid_korean_mobile("019-1234-5678"));
        assert!(!is_valid_korean_mobile("02-1234-5678")); // landline
        assert!(!is_valid_korean_mobile("0101234567890")); // too long
    }

    #[test]
    fn test_normalize_local_and_international() {
        assert_eq!(
            normalize_phone_number("010-1234-5678").as_deref(),
            Some("+821012345678")
        );
        assert_eq!(
            normalize_phone_number("+82 10-1234-5678").as_deref(),
            Some("+821012345678")
        );
        assert_eq!(
            normalize_phone_number("+82 010 1234 5678").as_deref(),
            Some("+821012345678")
        );
        assert_eq!(
            normalize_phone_number("+14155552671").as_deref(),
            Some("+14155552671")
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_phone_number(""), None);
        assert_eq!(normalize_phone_number("not a phone"), None);
        assert_eq!(normalize_phone_number("+82 2 1234 5678"), None);
        assert_eq!(normalize_phone_number("12345"), None);
        assert!(!is_valid_phone("+0123456789"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+821012345678"), "+8210****5678");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
