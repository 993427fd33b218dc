//! Main OTP service implementation

use chrono::{DateTime, Utc};
use sf_shared::phone::{mask_phone_number, normalize_phone_number};
use sf_shared::utils::validation::is_valid_otp_code;
use sf_shared::EnumerationPolicy;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::{DomainError, DomainResult, OtpFailure, ValidationError};
use crate::repositories::otp::OtpRepository;
use crate::repositories::user::UserDirectory;
use crate::services::clock::{Clock, SystemClock};
use crate::services::rate_limit::{RateLimitRule, RateLimiter};

use super::config::OtpServiceConfig;
use super::generator::OtpGenerator;
use super::traits::SmsServiceTrait;
use super::types::{SendCodeOutcome, VerifyCodeOutcome};
use super::validator::{OtpValidation, OtpValidator};

/// OTP service for sending and verifying phone verification codes
pub struct OtpService {
    /// Store for verification records
    repository: Arc<dyn OtpRepository>,
    /// Account lookups for recovery flows
    users: Arc<dyn UserDirectory>,
    /// SMS delivery
    sms_service: Arc<dyn SmsServiceTrait>,
    /// Per-address and per-phone limits
    rate_limiter: Arc<RateLimiter>,
    generator: OtpGenerator,
    validator: OtpValidator,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl OtpService {
    /// Create a new OTP service using the wall clock
    pub fn new(
        repository: Arc<dyn OtpRepository>,
        users: Arc<dyn UserDirectory>,
        sms_service: Arc<dyn SmsServiceTrait>,
        rate_limiter: Arc<RateLimiter>,
        config: OtpServiceConfig,
    ) -> Self {
        Self::with_clock(
            repository,
            users,
            sms_service,
            rate_limiter,
            config,
            Arc::new(SystemClock),
        )
    }

    /// Create a new OTP service with an explicit time source
    pub fn with_clock(
        repository: Arc<dyn OtpRepository>,
        users: Arc<dyn UserDirectory>,
        sms_service: Arc<dyn SmsServiceTrait>,
        rate_limiter: Arc<RateLimiter>,
        config: OtpServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let generator = OtpGenerator::new(&config, clock.clone());
        let validator = OtpValidator::new(config.max_attempts, clock.clone());

        Self {
            repository,
            users,
            sms_service,
            rate_limiter,
            generator,
            validator,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    fn expires_in_seconds(&self) -> i64 {
        self.config.code_expiration_minutes * 60
    }

    /// Send a verification code to a phone number
    ///
    /// This method:
    /// 1. Normalizes the phone number
    /// 2. Checks the client address and phone limits
    /// 3. Generates and hashes a new code
    /// 4. Applies the enumeration policy for recovery purposes
    /// 5. Stores the record and sends the code via SMS, removing the record
    ///    if delivery fails
    /// 6. Replaces earlier unverified records for the phone once delivered
    ///
    /// Under the uniform policy a recovery send for a phone without an
    /// account spends the same quota and hashing work as a real one.
    ///
    /// # Arguments
    ///
    /// * `raw_phone` - Phone number as entered (local Korean mobile or E.164)
    /// * `purpose` - Flow the code is for
    /// * `client_ip` - Requesting client address
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeOutcome)` - Record id and seconds until expiry
    /// * `Err(DomainError)` - Invalid phone, rate limited, unknown account
    ///   (disclose policy only), delivery or storage failure
    pub async fn send_code(
        &self,
        raw_phone: &str,
        purpose: OtpPurpose,
        client_ip: &str,
    ) -> DomainResult<SendCodeOutcome> {
        let phone = normalize_phone_number(raw_phone).ok_or(ValidationError::InvalidPhone)?;
        let masked = mask_phone_number(&phone);

        self.rate_limiter
            .enforce(RateLimitRule::OtpSendPerIp, client_ip)
            .await?;
        self.rate_limiter
            .enforce(RateLimitRule::OtpSendPerPhone, &phone)
            .await?;

        let generated = self.generator.generate()?;

        if purpose.requires_existing_account() && !self.users.phone_exists(&phone).await? {
            return match self.config.enumeration_policy {
                EnumerationPolicy::Uniform => {
                    tracing::info!(
                        phone = %masked,
                        purpose = purpose.as_str(),
                        event = "otp_send_suppressed",
                        "No account for phone; answering without sending a code"
                    );
                    Ok(SendCodeOutcome {
                        otp_id: Uuid::new_v4(),
                        expires_in_seconds: self.expires_in_seconds(),
                    })
                }
                EnumerationPolicy::Disclose => Err(DomainError::NotFound {
                    resource: "Account".to_string(),
                }),
            };
        }

        let record = OtpRecord::new(
            phone.clone(),
            purpose,
            generated.hash.clone(),
            self.clock.now(),
            generated.expires_at,
        );
        self.repository.insert(&record).await?;

        tracing::info!(
            phone = %masked,
            purpose = purpose.as_str(),
            otp_id = %record.id,
            event = "otp_generated",
            "Generated new verification code"
        );

        if self.config.log_plaintext_codes {
            tracing::debug!(
                phone = %masked,
                otp_id = %record.id,
                code = %generated.code,
                "Verification code (non-production only)"
            );
        }

        match self
            .sms_service
            .send_verification_code(&phone, &generated.code)
            .await
        {
            Ok(message_id) => {
                tracing::info!(
                    phone = %masked,
                    otp_id = %record.id,
                    message_id = %message_id,
                    event = "otp_sent",
                    "Verification code sent"
                );
            }
            Err(e) => {
                tracing::error!(
                    phone = %masked,
                    otp_id = %record.id,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
                if let Err(cleanup) = self.repository.delete(record.id).await {
                    tracing::warn!(
                        otp_id = %record.id,
                        error = %cleanup,
                        "Failed to remove undelivered verification record"
                    );
                }
                return Err(DomainError::Delivery { message: e });
            }
        }

        let superseded = self
            .repository
            .supersede_unverified(&phone, record.id)
            .await?;
        if superseded > 0 {
            tracing::debug!(
                phone = %masked,
                superseded = superseded,
                "Replaced earlier unverified codes"
            );
        }

        Ok(SendCodeOutcome {
            otp_id: record.id,
            expires_in_seconds: self.expires_in_seconds(),
        })
    }

    /// Verify a submitted code
    ///
    /// Unknown ids and already verified records produce the same
    /// `Unavailable` failure. Every compared code first claims an attempt in
    /// the repository, so concurrent guesses cannot exceed the attempt
    /// ceiling; a successful check gives its attempt back.
    ///
    /// # Arguments
    ///
    /// * `otp_id` - Id returned by `send_code`
    /// * `code` - Code entered by the user
    /// * `client_ip` - Requesting client address
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyCodeOutcome)` - Verification status and details
    /// * `Err(DomainError)` - Rate limited or system error
    pub async fn verify_code(
        &self,
        otp_id: Uuid,
        code: &str,
        client_ip: &str,
    ) -> DomainResult<VerifyCodeOutcome> {
        self.rate_limiter
            .enforce(RateLimitRule::OtpVerifyPerIp, client_ip)
            .await?;

        if !is_valid_otp_code(code) {
            tracing::warn!(
                otp_id = %otp_id,
                code_length = code.len(),
                event = "invalid_code_format",
                "Invalid verification code format provided"
            );
            return Ok(VerifyCodeOutcome::failed(OtpFailure::InvalidFormat, None));
        }

        let record = match self.repository.find_by_id(otp_id).await? {
            Some(record) if !record.verified => record,
            _ => return Ok(unavailable(otp_id)),
        };
        let masked = mask_phone_number(&record.phone);

        if let Some(rejection) = self.validator.precheck(record.expires_at, record.attempts) {
            return Ok(self.rejected(&record, &masked, rejection));
        }

        let attempts_used = match self
            .repository
            .reserve_attempt(record.id, self.config.max_attempts)
            .await?
        {
            Some(attempts) => attempts,
            None => {
                // Another check settled or exhausted the record first
                return match self.repository.find_by_id(otp_id).await? {
                    Some(current) if !current.verified => Ok(self.rejected(
                        &current,
                        &masked,
                        OtpValidation {
                            success: false,
                            failure: Some(OtpFailure::AttemptsExceeded),
                            remaining_attempts: Some(0),
                        },
                    )),
                    _ => Ok(unavailable(otp_id)),
                };
            }
        };

        let validation = self
            .validator
            .check_code(code, &record.otp_hash, attempts_used)?;

        if !validation.success {
            return Ok(self.rejected(&record, &masked, validation));
        }

        if !self
            .repository
            .mark_verified(record.id, self.clock.now())
            .await?
        {
            return Ok(unavailable(otp_id));
        }

        tracing::info!(
            phone = %masked,
            otp_id = %record.id,
            event = "otp_verified_success",
            "Verification code successfully verified"
        );
        Ok(VerifyCodeOutcome::success())
    }

    fn rejected(
        &self,
        record: &OtpRecord,
        masked: &str,
        validation: OtpValidation,
    ) -> VerifyCodeOutcome {
        let failure = validation.failure.unwrap_or(OtpFailure::Mismatch);

        tracing::warn!(
            phone = %masked,
            otp_id = %record.id,
            failure = ?failure,
            remaining_attempts = ?validation.remaining_attempts,
            event = "otp_verification_failed",
            "Verification code rejected"
        );

        VerifyCodeOutcome::failed(failure, validation.remaining_attempts)
    }

    /// Look up a verified record that still proves ownership of `raw_phone`
    ///
    /// # Returns
    ///
    /// * `Ok(OtpRecord)` - Verified record for this phone and purpose, within
    ///   its grace period
    /// * `Err(DomainError::Unauthorized)` - Anything else
    pub async fn verified_proof(
        &self,
        otp_id: Uuid,
        raw_phone: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<OtpRecord> {
        self.verified_proof_at(otp_id, raw_phone, purpose, self.clock.now())
            .await
    }

    async fn verified_proof_at(
        &self,
        otp_id: Uuid,
        raw_phone: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> DomainResult<OtpRecord> {
        let phone = normalize_phone_number(raw_phone).ok_or(DomainError::Unauthorized)?;

        match self.repository.find_by_id(otp_id).await? {
            Some(record)
                if record.phone == phone
                    && record.purpose == purpose
                    && record.is_valid_proof_at(now, self.config.proof_grace_minutes) =>
            {
                Ok(record)
            }
            _ => {
                tracing::warn!(
                    phone = %mask_phone_number(&phone),
                    otp_id = %otp_id,
                    purpose = purpose.as_str(),
                    event = "otp_proof_rejected",
                    "No valid phone verification proof"
                );
                Err(DomainError::Unauthorized)
            }
        }
    }
}

fn unavailable(otp_id: Uuid) -> VerifyCodeOutcome {
    tracing::warn!(
        otp_id = %otp_id,
        event = "otp_unavailable",
        "Verification requested for unknown or settled code"
    );
    VerifyCodeOutcome::failed(OtpFailure::Unavailable, None)
}
