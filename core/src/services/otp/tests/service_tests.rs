//! Unit tests for the OTP service

use chrono::{Duration, TimeZone, Utc};
use sf_shared::{EnumerationPolicy, LimitRule, RateLimitConfig};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpPurpose, MAX_ATTEMPTS};
use crate::errors::{DomainError, OtpFailure, ValidationError};
use crate::repositories::otp::{InMemoryOtpRepository, OtpRepository};
use crate::repositories::user::InMemoryUserDirectory;
use crate::services::clock::ManualClock;
use crate::services::otp::{OtpService, OtpServiceConfig};
use crate::services::rate_limit::{InMemoryCounterStore, RateLimiter};

use super::mocks::{MockSmsService, SlowReadRepository};

const PHONE: &str = "010-1234-5678";
const E164: &str = "+821012345678";
const IP: &str = "203.0.113.10";

struct Harness {
    clock: Arc<ManualClock>,
    repository: Arc<InMemoryOtpRepository>,
    sms: Arc<MockSmsService>,
    service: OtpService,
}

fn harness_with(
    config: OtpServiceConfig,
    limits: RateLimitConfig,
    sms_fails: bool,
    users: InMemoryUserDirectory,
) -> Harness {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
    ));
    let repository = Arc::new(InMemoryOtpRepository::new());
    let sms = Arc::new(MockSmsService::new(sms_fails));
    let store = Arc::new(InMemoryCounterStore::with_clock(clock.clone()));
    let limiter = Arc::new(RateLimiter::with_clock(store, limits, clock.clone()));

    let service = OtpService::with_clock(
        repository.clone(),
        Arc::new(users),
        sms.clone(),
        limiter,
        config,
        clock.clone(),
    );

    Harness {
        clock,
        repository,
        sms,
        service,
    }
}

fn harness() -> Harness {
    harness_with(
        OtpServiceConfig::for_tests(),
        RateLimitConfig::default(),
        false,
        InMemoryUserDirectory::new(),
    )
}

#[tokio::test]
async fn test_send_code_success() {
    let h = harness();

    let outcome = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    assert_eq!(outcome.expires_in_seconds, 300);

    let record = h.repository.find_by_id(outcome.otp_id).await.unwrap().unwrap();
    assert_eq!(record.phone, E164);
    assert_eq!(record.purpose, OtpPurpose::Signup);
    assert_eq!(record.attempts, 0);
    assert!(!record.verified);

    // Only the hash is stored
    let code = h.sms.get_sent_code(E164).unwrap();
    assert_ne!(record.otp_hash, code);
    assert!(bcrypt::verify(&code, &record.otp_hash).unwrap());
}

#[tokio::test]
async fn test_send_code_invalid_phone() {
    let h = harness();

    let err = h
        .service
        .send_code("02-123-4567", OtpPurpose::Signup, IP)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::InvalidPhone)
    ));
    assert_eq!(h.sms.sent(), 0);
}

#[tokio::test]
async fn test_new_send_supersedes_unverified_records() {
    let h = harness();

    let first = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let second = h
        .service
        .send_code(E164, OtpPurpose::PasswordReset, IP)
        .await;
    // Password reset for an unknown phone answers uniformly without storing
    assert!(second.is_ok());
    let third = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();

    let records = h.repository.records_for_phone(E164).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, third.otp_id);

    let outcome = h.service.verify_code(first.otp_id, "123456", IP).await.unwrap();
    assert_eq!(outcome.failure, Some(OtpFailure::Unavailable));
}

#[tokio::test]
async fn test_verify_code_success_and_single_use() {
    let h = harness();

    let sent = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let code = h.sms.get_sent_code(E164).unwrap();

    let outcome = h.service.verify_code(sent.otp_id, &code, IP).await.unwrap();
    assert!(outcome.verified);
    assert!(outcome.failure.is_none());

    let record = h.repository.find_by_id(sent.otp_id).await.unwrap().unwrap();
    assert!(record.verified);
    assert_eq!(record.verified_at, Some(h.clock_now()));

    // A verified record cannot be verified again
    let again = h.service.verify_code(sent.otp_id, &code, IP).await.unwrap();
    assert!(!again.verified);
    assert_eq!(again.failure, Some(OtpFailure::Unavailable));
}

#[tokio::test]
async fn test_verify_code_wrong_code_consumes_attempts() {
    let h = harness();

    let sent = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let code = h.sms.get_sent_code(E164).unwrap();
    let wrong = if code == "111111" { "222222" } else { "111111" };

    for expected in [2, 1, 0] {
        let outcome = h.service.verify_code(sent.otp_id, wrong, IP).await.unwrap();
        assert!(!outcome.verified);
        assert_eq!(outcome.failure, Some(OtpFailure::Mismatch));
        assert_eq!(outcome.remaining_attempts, Some(expected));
    }

    // Even the right code is refused once attempts are exhausted
    let outcome = h.service.verify_code(sent.otp_id, &code, IP).await.unwrap();
    assert_eq!(outcome.failure, Some(OtpFailure::AttemptsExceeded));
    assert_eq!(outcome.remaining_attempts, Some(0));

    let record = h.repository.find_by_id(sent.otp_id).await.unwrap().unwrap();
    assert_eq!(record.attempts, 3);
    assert!(!record.verified);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_guesses_share_the_attempt_limit() {
    let repository = Arc::new(SlowReadRepository {
        inner: InMemoryOtpRepository::new(),
        delay: std::time::Duration::from_millis(50),
    });
    let sms = Arc::new(MockSmsService::new(false));
    let limiter = Arc::new(RateLimiter::new(
        Arc::new(InMemoryCounterStore::new()),
        RateLimitConfig::default(),
    ));
    let service = Arc::new(OtpService::new(
        repository.clone(),
        Arc::new(InMemoryUserDirectory::new()),
        sms.clone(),
        limiter,
        OtpServiceConfig::for_tests(),
    ));

    let sent = service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let code = sms.get_sent_code(E164).unwrap();
    let wrong = if code == "111111" { "222222" } else { "111111" };

    let mut guesses = vec![wrong.to_string(); 9];
    guesses.push(code);

    let handles: Vec<_> = guesses
        .into_iter()
        .enumerate()
        .map(|(i, guess)| {
            let service = service.clone();
            let ip = format!("198.51.100.{}", i + 1);
            tokio::spawn(async move { service.verify_code(sent.otp_id, &guess, &ip).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap());
    }

    let compared = outcomes
        .iter()
        .filter(|o| o.verified || o.failure == Some(OtpFailure::Mismatch))
        .count();
    assert!(compared as i32 <= MAX_ATTEMPTS, "{} codes compared", compared);
    assert!(outcomes.iter().filter(|o| o.verified).count() <= 1);

    let record = repository.inner.find_by_id(sent.otp_id).await.unwrap().unwrap();
    assert!(record.attempts <= MAX_ATTEMPTS);
}

#[tokio::test]
async fn test_verify_code_expired() {
    let h = harness();

    let sent = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let code = h.sms.get_sent_code(E164).unwrap();

    h.clock.advance(Duration::minutes(5));
    let outcome = h.service.verify_code(sent.otp_id, &code, IP).await.unwrap();
    assert_eq!(outcome.failure, Some(OtpFailure::Expired));

    let record = h.repository.find_by_id(sent.otp_id).await.unwrap().unwrap();
    assert_eq!(record.attempts, 0);
}

#[tokio::test]
async fn test_verify_code_invalid_format_consumes_nothing() {
    let h = harness();

    let sent = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let outcome = h.service.verify_code(sent.otp_id, "12a456", IP).await.unwrap();
    assert_eq!(outcome.failure, Some(OtpFailure::InvalidFormat));

    let record = h.repository.find_by_id(sent.otp_id).await.unwrap().unwrap();
    assert_eq!(record.attempts, 0);
}

#[tokio::test]
async fn test_unknown_id_looks_like_used_code() {
    let h = harness();

    let outcome = h.service.verify_code(Uuid::new_v4(), "123456", IP).await.unwrap();
    assert_eq!(
        outcome,
        crate::services::otp::VerifyCodeOutcome::failed(OtpFailure::Unavailable, None)
    );
}

#[tokio::test]
async fn test_delivery_failure_removes_record() {
    let h = harness_with(
        OtpServiceConfig::for_tests(),
        RateLimitConfig::default(),
        true,
        InMemoryUserDirectory::new(),
    );

    let err = h
        .service
        .send_code(PHONE, OtpPurpose::Signup, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Delivery { .. }));
    assert!(h.repository.is_empty().await);
}

#[tokio::test]
async fn test_failed_resend_keeps_earlier_code() {
    let h = harness();

    let first = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let code = h.sms.get_sent_code(E164).unwrap();

    h.sms.set_failing(true);
    let err = h
        .service
        .send_code(PHONE, OtpPurpose::Signup, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Delivery { .. }));
    h.sms.set_failing(false);

    let outcome = h.service.verify_code(first.otp_id, &code, IP).await.unwrap();
    assert!(outcome.verified);
}

#[tokio::test]
async fn test_phone_limit() {
    let mut limits = RateLimitConfig::default();
    limits.otp_send_per_phone = LimitRule::new(2, 3600);
    let h = harness_with(
        OtpServiceConfig::for_tests(),
        limits,
        false,
        InMemoryUserDirectory::new(),
    );

    h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    h.service.send_code(E164, OtpPurpose::Signup, "198.51.100.1").await.unwrap();
    let err = h
        .service
        .send_code(PHONE, OtpPurpose::Signup, "198.51.100.2")
        .await
        .unwrap_err();

    match err {
        DomainError::RateLimited { rule, reset_at } => {
            assert_eq!(rule, "otp_send_per_phone");
            assert_eq!(reset_at, h.clock_now() + Duration::hours(1));
        }
        other => panic!("Expected rate limited error, got {:?}", other),
    }
    assert_eq!(h.sms.sent(), 2);

    // A new window opens after an hour
    h.clock.advance(Duration::hours(1));
    assert!(h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.is_ok());
}

#[tokio::test]
async fn test_ip_limit_blocks_even_with_phone_quota() {
    let mut limits = RateLimitConfig::default();
    limits.otp_send_per_ip = LimitRule::new(1, 3600);
    let h = harness_with(
        OtpServiceConfig::for_tests(),
        limits,
        false,
        InMemoryUserDirectory::new(),
    );

    h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let err = h
        .service
        .send_code("010-9999-8888", OtpPurpose::Signup, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RateLimited { ref rule, .. } if rule == "otp_send_per_ip"));
    assert!(h.sms.get_sent_code("+821099998888").is_none());
}

#[tokio::test]
async fn test_verify_ip_limit() {
    let mut limits = RateLimitConfig::default();
    limits.otp_verify_per_ip = LimitRule::new(2, 600);
    let h = harness_with(
        OtpServiceConfig::for_tests(),
        limits,
        false,
        InMemoryUserDirectory::new(),
    );

    for _ in 0..2 {
        h.service.verify_code(Uuid::new_v4(), "123456", IP).await.unwrap();
    }
    let err = h
        .service
        .verify_code(Uuid::new_v4(), "123456", IP)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::RateLimited { ref rule, .. } if rule == "otp_verify_per_ip"
    ));
}

#[tokio::test]
async fn test_uniform_policy_hides_unknown_accounts() {
    let h = harness();

    let outcome = h
        .service
        .send_code(PHONE, OtpPurpose::FindId, IP)
        .await
        .unwrap();
    assert_eq!(outcome.expires_in_seconds, 300);
    assert_eq!(h.sms.sent(), 0);
    assert!(h.repository.find_by_id(outcome.otp_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_uniform_policy_limits_members_and_strangers_alike() {
    let h = harness_with(
        OtpServiceConfig::for_tests(),
        RateLimitConfig::default(),
        false,
        InMemoryUserDirectory::with_phones([E164]),
    );
    let limit = RateLimitConfig::default().otp_send_per_phone.max_requests;

    let mut member = Vec::new();
    let mut stranger = Vec::new();
    for i in 1..=limit + 1 {
        let ip = format!("203.0.113.{}", i);
        let result = h.service.send_code(PHONE, OtpPurpose::PasswordReset, &ip).await;
        member.push(result.map(|_| ()).map_err(|e| e.to_string()));

        let ip = format!("198.51.100.{}", i);
        let result = h
            .service
            .send_code("010-9876-5432", OtpPurpose::PasswordReset, &ip)
            .await;
        stranger.push(result.map(|_| ()).map_err(|e| e.to_string()));
    }

    assert_eq!(member, stranger);
    assert_eq!(member.iter().filter(|r| r.is_ok()).count(), limit as usize);
    assert!(member[limit as usize].is_err());
}

#[tokio::test]
async fn test_disclose_policy_reports_unknown_accounts() {
    let config = OtpServiceConfig {
        enumeration_policy: EnumerationPolicy::Disclose,
        ..OtpServiceConfig::for_tests()
    };
    let h = harness_with(
        config,
        RateLimitConfig::default(),
        false,
        InMemoryUserDirectory::new(),
    );

    let err = h
        .service
        .send_code(PHONE, OtpPurpose::PasswordReset, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    assert_eq!(h.sms.sent(), 0);
}

#[tokio::test]
async fn test_recovery_send_for_registered_phone() {
    let h = harness_with(
        OtpServiceConfig::for_tests(),
        RateLimitConfig::default(),
        false,
        InMemoryUserDirectory::with_phones([E164]),
    );

    let outcome = h
        .service
        .send_code(PHONE, OtpPurpose::PasswordReset, IP)
        .await
        .unwrap();
    let record = h.repository.find_by_id(outcome.otp_id).await.unwrap().unwrap();
    assert_eq!(record.purpose, OtpPurpose::PasswordReset);
    assert_eq!(h.sms.sent(), 1);
}

#[tokio::test]
async fn test_verified_proof_grace_period() {
    let h = harness();

    let sent = h.service.send_code(PHONE, OtpPurpose::Signup, IP).await.unwrap();
    let code = h.sms.get_sent_code(E164).unwrap();

    // Not yet verified
    assert!(matches!(
        h.service.verified_proof(sent.otp_id, PHONE, OtpPurpose::Signup).await,
        Err(DomainError::Unauthorized)
    ));

    h.service.verify_code(sent.otp_id, &code, IP).await.unwrap();
    let proof = h
        .service
        .verified_proof(sent.otp_id, E164, OtpPurpose::Signup)
        .await
        .unwrap();
    assert_eq!(proof.id, sent.otp_id);

    // Wrong purpose or phone
    assert!(h
        .service
        .verified_proof(sent.otp_id, PHONE, OtpPurpose::FindId)
        .await
        .is_err());
    assert!(h
        .service
        .verified_proof(sent.otp_id, "010-0000-0000", OtpPurpose::Signup)
        .await
        .is_err());

    // Honoured until expires_at + 10 minutes
    h.clock.advance(Duration::minutes(14) + Duration::seconds(59));
    assert!(h
        .service
        .verified_proof(sent.otp_id, PHONE, OtpPurpose::Signup)
        .await
        .is_ok());

    h.clock.advance(Duration::seconds(1));
    assert!(matches!(
        h.service.verified_proof(sent.otp_id, PHONE, OtpPurpose::Signup).await,
        Err(DomainError::Unauthorized)
    ));
}

impl Harness {
    fn clock_now(&self) -> chrono::DateTime<Utc> {
        crate::services::clock::Clock::now(self.clock.as_ref())
    }
}
