//! Input shape checks shared by the services and the HTTP layer

use once_cell::sync::Lazy;
use regex::Regex;

static ZIPCODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}$").expect("valid zipcode regex"));

/// Length of a one-time password
pub const OTP_CODE_LENGTH: usize = 6;

/// Korean postal codes are exactly five digits
pub fn is_valid_zipcode(zipcode: &str) -> bool {
    ZIPCODE_REGEX.is_match(zipcode)
}

/// Exactly six ASCII digits, no surrounding whitespace
pub fn is_valid_otp_code(code: &str) -> bool {
    code.len() == OTP_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// A monetary amount usable as an order total
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zipcode() {
        assert!(is_valid_zipcode("63100"));
        assert!(is_valid_zipcode("00000"));
        assert!(!is_valid_zipcode("6310"));
        assert!(!is_valid_zipcode("631000"));
        assert!(!is_valid_zipcode("63-10"));
        assert!(!is_valid_zipcode(" 63100"));
    }

    #[test]
    fn test_otp_code() {
        assert!(is_valid_otp_code("123456"));
        assert!(is_valid_otp_code("000000"));
        assert!(!is_valid_otp_code("12345"));
        assert!(!is_valid_otp_code("12345a"));
        assert!(!is_valid_otp_code(" 23456"));
        assert!(!is_valid_otp_code("١٢٣٤٥٦"));
    }

    #[test]
    fn test_amount() {
        assert!(is_valid_amount(0.0));
        assert!(is_valid_amount(49_999.5));
        assert!(!is_valid_amount(-1.0));
        assert!(!is_valid_amount(f64::NAN));
        assert!(!is_valid_amount(f64::INFINITY));
    }
}
