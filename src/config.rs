use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub otp: OtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub from_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    pub code_length: usize,
    pub ttl_secs: i64,
    /// Mismatched attempts allowed before the code is discarded; 0 disables the bound.
    pub max_attempts: u32,
    pub send_timeout_secs: u64,
    /// 0 disables the background sweep.
    pub sweep_interval_secs: u64,
    pub message_template: Option<String>,
    /// Echo generated codes in API responses. Development only.
    pub debug_echo: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_secs: 300,
            max_attempts: 5,
            send_timeout_secs: 10,
            sweep_interval_secs: 60,
            message_template: None,
            debug_echo: false,
        }
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 无配置文件时使用默认值，环境变量随后覆盖
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No config file at {config_path}, using defaults and environment");
                Config::default()
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Unable to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {e}")))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("CLIENT_ORIGIN") {
            self.cors.allowed_origins = split_origins(&v);
        }
        if let Ok(v) = env::var("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = v;
        }
        if let Ok(v) = env::var("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = v;
        }
        if let Ok(v) = env::var("TWILIO_FROM_NUMBER") {
            self.twilio.from_phone = v;
        }
        if let Ok(v) = env::var("OTP_CODE_LENGTH")
            && let Ok(n) = v.parse()
        {
            self.otp.code_length = n;
        }
        if let Ok(v) = env::var("OTP_TTL_SECS")
            && let Ok(n) = v.parse()
        {
            self.otp.ttl_secs = n;
        }
        if let Ok(v) = env::var("OTP_MAX_ATTEMPTS")
            && let Ok(n) = v.parse()
        {
            self.otp.max_attempts = n;
        }
        if let Ok(v) = env::var("OTP_SEND_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.otp.send_timeout_secs = n;
        }
        if let Ok(v) = env::var("OTP_SWEEP_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.otp.sweep_interval_secs = n;
        }
        if let Ok(v) = env::var("OTP_MESSAGE_TEMPLATE") {
            self.otp.message_template = Some(v);
        }
        if let Ok(v) = env::var("SEND_OTP_LOG") {
            self.otp.debug_echo = v == "true";
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [otp]
            ttl_secs = 120
            debug_echo = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.otp.ttl_secs, 120);
        assert!(config.otp.debug_echo);
        assert_eq!(config.otp.code_length, 6);
        assert_eq!(config.otp.max_attempts, 5);
        assert!(config.twilio.account_sid.is_empty());
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_debug_echo_off_by_default() {
        let config = Config::parse("").unwrap();
        assert!(!config.otp.debug_echo);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(Config::parse("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
