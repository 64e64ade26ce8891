use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Outcome of a failed verification attempt.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    #[error("No OTP found for this number")]
    NotFound,

    #[error("OTP expired")]
    Expired,

    #[error("Invalid OTP")]
    Mismatch,

    #[error("Too many invalid attempts, request a new OTP")]
    TooManyAttempts,
}

/// Failure of the outbound message transport. Never leaves `OtpService::request_code`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("SMS transport not configured")]
    NotConfigured,

    #[error("SMS rejected by provider: {0}")]
    Rejected(String),

    #[error("SMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMS request timed out")]
    Timeout,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Otp(OtpError::NotFound) => "OTP_NOT_FOUND",
            AppError::Otp(OtpError::Expired) => "OTP_EXPIRED",
            AppError::Otp(OtpError::Mismatch) => "OTP_INVALID",
            AppError::Otp(OtpError::TooManyAttempts) => "OTP_ATTEMPTS_EXCEEDED",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Otp(OtpError::TooManyAttempts) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Otp(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::Otp(err) => {
                log::warn!("OTP verification failed: {err}");
                err.to_string()
            }
            _ => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": self.error_code(),
                "message": message
            }
        }))
    }
}
