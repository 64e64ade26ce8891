use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::config::OtpConfig;
use crate::error::{OtpError, TransportError};
use crate::external::SmsSender;
use crate::models::OtpIssued;
use crate::services::otp_store::{OtpRecord, OtpStore};
use crate::utils::*;

/// Defaults applied when a request leaves an option unset.
#[derive(Debug, Clone)]
pub struct OtpSettings {
    pub code_length: usize,
    pub ttl_ms: i64,
    pub max_attempts: u32,
    pub send_timeout: std::time::Duration,
    pub template: String,
    pub debug_echo: bool,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self::from(&OtpConfig::default())
    }
}

impl From<&OtpConfig> for OtpSettings {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            ttl_ms: config.ttl_secs.saturating_mul(1000),
            max_attempts: config.max_attempts,
            send_timeout: std::time::Duration::from_secs(config.send_timeout_secs),
            template: config
                .message_template
                .clone()
                .unwrap_or_else(|| DEFAULT_OTP_TEMPLATE.to_string()),
            debug_echo: config.debug_echo,
        }
    }
}

/// Per-request overrides for `OtpService::request_code`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub length: Option<usize>,
    pub ttl_ms: Option<i64>,
    pub template: Option<String>,
    pub debug_echo: Option<bool>,
}

/// Issues and verifies one-time codes bound to phone numbers.
#[derive(Clone)]
pub struct OtpService {
    store: OtpStore,
    sender: Arc<dyn SmsSender>,
    settings: OtpSettings,
}

impl OtpService {
    pub fn new(store: OtpStore, sender: Arc<dyn SmsSender>, settings: OtpSettings) -> Self {
        Self {
            store,
            sender,
            settings,
        }
    }

    /// Generates and records a fresh code for `phone`, then tries to deliver it.
    ///
    /// The code is stored before delivery starts, and delivery problems are only
    /// logged: the caller always gets a result, with `delivered` telling whether
    /// the transport accepted the message.
    pub async fn request_code(&self, phone: &str, options: RequestOptions) -> OtpIssued {
        let length = self.code_length(options.length);
        let ttl_ms = options.ttl_ms.unwrap_or(self.settings.ttl_ms);
        let debug_echo = options.debug_echo.unwrap_or(self.settings.debug_echo);

        let code = generate_numeric_code(length);
        let expires_at = Utc::now()
            .checked_add_signed(Duration::milliseconds(ttl_ms.max(-i64::MAX)))
            .unwrap_or(if ttl_ms < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
        self.store
            .put(phone, OtpRecord::new(code.clone(), expires_at))
            .await;

        let template = options.template.as_deref().unwrap_or(&self.settings.template);
        let message = render_otp_message(template, &code, ttl_ms);

        let delivered = match self.deliver(phone, &message).await {
            Ok(()) => true,
            Err(TransportError::NotConfigured) => false,
            Err(e) => {
                log::error!("OTP delivery to {phone} failed: {e}");
                false
            }
        };

        if !delivered {
            // 短信未发送时仅记录日志，便于开发环境获取验证码
            log::info!("OTP for {phone}: {code}");
        }

        OtpIssued {
            delivered,
            code: debug_echo.then_some(code),
        }
    }

    /// Verifies a submitted code. Surrounding whitespace in `code` is ignored.
    pub async fn check_code(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        self.check_code_at(phone, code, Utc::now()).await
    }

    pub(crate) async fn check_code_at(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        let result = self
            .store
            .verify(phone, code.trim(), now, self.settings.max_attempts)
            .await;

        match &result {
            Ok(()) => log::info!("OTP verified for {phone}"),
            Err(OtpError::TooManyAttempts) => {
                log::warn!("OTP for {phone} discarded after too many invalid attempts")
            }
            Err(e) => log::debug!("OTP check for {phone} failed: {e}"),
        }

        result
    }

    /// Removes expired records. Verification re-checks expiry on its own, so this
    /// only bounds memory held by codes nobody came back for.
    pub async fn sweep_expired(&self) -> usize {
        self.store.remove_expired(Utc::now()).await
    }

    async fn deliver(&self, phone: &str, message: &str) -> Result<(), TransportError> {
        if !self.sender.is_configured() {
            return Err(TransportError::NotConfigured);
        }

        tokio::time::timeout(self.settings.send_timeout, self.sender.send(phone, message))
            .await
            .map_err(|_| TransportError::Timeout)?
    }

    fn code_length(&self, requested: Option<usize>) -> usize {
        let length = requested.unwrap_or(self.settings.code_length);
        let clamped = length.clamp(1, MAX_CODE_LENGTH);
        if clamped != length {
            log::warn!("OTP length {length} out of range, using {clamped}");
        }
        clamped
    }
}
