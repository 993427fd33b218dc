//! SMS delivery configuration module

use serde::{Deserialize, Serialize};

/// SMS provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Log instead of sending. Refused in production.
    #[default]
    Mock,
    Twilio,
}

/// SMS delivery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub provider: SmsProvider,

    /// Twilio Account SID
    #[serde(default)]
    pub account_sid: String,

    /// Twilio Auth Token
    #[serde(default)]
    pub auth_token: String,

    /// Sender number in E.164 form
    #[serde(default)]
    pub from_number: String,

    /// Timeout for provider requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Twilio API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::default(),
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl SmsConfig {
    /// Check that a real provider has its credentials
    pub fn validate(&self) -> Result<(), String> {
        if self.provider == SmsProvider::Mock {
            return Ok(());
        }
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            return Err("sms.account_sid and sms.auth_token are required".to_string());
        }
        if !self.from_number.starts_with('+') {
            return Err("sms.from_number must be in E.164 format (starting with '+')".to_string());
        }
        Ok(())
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_api_base_url() -> String {
    String::from("https://api.twilio.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_needs_no_credentials() {
        assert!(SmsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_twilio_requires_credentials() {
        let mut config = SmsConfig {
            provider: SmsProvider::Twilio,
            ..SmsConfig::default()
        };
        assert!(config.validate().is_err());

        config.account_sid = "AC123".to_string();
        config.auth_token = "secret".to_string();
        config.from_number = "15005550006".to_string();
        assert!(config.validate().is_err());

        config.from_number = "+15005550006".to_string();
        assert!(config.validate().is_ok());
    }
}
