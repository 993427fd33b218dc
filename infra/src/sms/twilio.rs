//! Twilio SMS provider over the REST API
//!
//! One request per message. Delivery failures are reported to the caller,
//! which discards the code; the user asks for a new one.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use super::sms_service::SmsService;
use crate::InfrastructureError;
use sf_shared::phone::mask_phone_number;
use sf_shared::SmsConfig;

/// Twilio rejects bodies longer than this
const MAX_MESSAGE_LENGTH: usize = 1600;

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

pub struct TwilioSmsService {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    messages_url: String,
}

impl TwilioSmsService {
    pub fn new(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        debug!(from = %mask_phone_number(&config.from_number), "Twilio SMS service initialized");

        Ok(Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            messages_url: messages_url(&config.api_base_url, &config.account_sid),
        })
    }
}

fn messages_url(base_url: &str, account_sid: &str) -> String {
    format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        base_url.trim_end_matches('/'),
        account_sid
    )
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        if !phone_number.starts_with('+') {
            return Err(InfrastructureError::Sms(
                "Phone number must be in E.164 format".to_string(),
            ));
        }
        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        let response = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", phone_number),
                ("From", self.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<TwilioErrorBody>().await.ok();
            let detail = body
                .map(|b| {
                    format!(
                        "{} (code {})",
                        b.message.unwrap_or_default(),
                        b.code.unwrap_or_default()
                    )
                })
                .unwrap_or_default();
            error!(
                status = status.as_u16(),
                phone = %mask_phone_number(phone_number),
                detail = %detail,
                "Twilio rejected message"
            );
            return Err(InfrastructureError::Sms(format!(
                "Twilio returned {}: {}",
                status, detail
            )));
        }

        let resource: MessageResource = response.json().await?;
        Ok(resource.sid)
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}
