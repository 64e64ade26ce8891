use crate::config::TwilioConfig;
use crate::error::TransportError;
use crate::external::SmsSender;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Deserialize)]
pub struct SendSmsResponse {
    pub sid: String,
    pub status: String,
}

#[derive(Clone)]
pub struct TwilioService {
    client: Client,
    config: TwilioConfig,
    api_base: String,
}

impl TwilioService {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            api_base: TWILIO_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: String) -> Self {
        self.client = Client::builder()
            .no_proxy()
            .build()
            .expect("reqwest client");
        self.api_base = api_base;
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base, self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioService {
    fn is_configured(&self) -> bool {
        !self.config.account_sid.is_empty()
            && !self.config.auth_token.is_empty()
            && !self.config.from_phone.is_empty()
    }

    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError> {
        if !self.is_configured() {
            return Err(TransportError::NotConfigured);
        }

        let params = [
            ("To", to),
            ("From", self.config.from_phone.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            // 已被接受的消息即视为发送成功，响应体解析失败只记录日志
            match response.json::<SendSmsResponse>().await {
                Ok(sent) => log::info!(
                    "SMS sent to {to}: sid={}, status={}",
                    sent.sid,
                    sent.status
                ),
                Err(e) => log::warn!("SMS to {to} accepted, but response was unreadable: {e}"),
            }
            Ok(())
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(TransportError::Rejected(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )))
        }
    }
}
