//! Unit tests for code generation

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::services::clock::ManualClock;
use crate::services::otp::{OtpGenerator, OtpServiceConfig};

#[test]
fn test_random_codes_are_six_digits_in_range() {
    for _ in 0..1000 {
        let code = OtpGenerator::random_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        let value: u32 = code.parse().unwrap();
        assert!((100_000..=999_999).contains(&value));
    }
}

#[test]
fn test_generate_hashes_code_and_sets_expiry() {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(now));
    let generator = OtpGenerator::new(&OtpServiceConfig::for_tests(), clock);

    let generated = generator.generate().unwrap();
    assert_ne!(generated.hash, generated.code);
    assert!(bcrypt::verify(&generated.code, &generated.hash).unwrap());
    assert_eq!(generated.expires_at, now + Duration::minutes(5));
}

#[test]
fn test_debug_output_hides_code() {
    let generator = OtpGenerator::new(
        &OtpServiceConfig::for_tests(),
        Arc::new(ManualClock::new(Utc::now())),
    );
    let generated = generator.generate().unwrap();
    assert!(!format!("{:?}", generated).contains(&generated.code));
}
