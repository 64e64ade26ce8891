use actix_web::{web, HttpRequest, HttpResponse, Result, ResponseError};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{OtpService, RequestOptions};
use crate::utils::normalize_phone;

fn required_phone(value: Option<&str>, message: &str) -> AppResult<String> {
    match value.map(normalize_phone) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(message.to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/auth/send-otp",
    tag = "auth",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP issued", body = SendOtpApiResponse),
        (status = 400, description = "phoneNumber missing")
    )
)]
pub async fn send_otp(
    otp_service: web::Data<OtpService>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse> {
    let phone = match required_phone(request.phone_number.as_deref(), "phoneNumber is required") {
        Ok(phone) => phone,
        Err(e) => return Ok(e.error_response()),
    };

    let issued = otp_service
        .request_code(&phone, RequestOptions::default())
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        issued,
        "OTP sent".to_string(),
    )))
}

#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP verified"),
        (status = 400, description = "Missing fields, or code unknown, expired or wrong"),
        (status = 429, description = "Too many invalid attempts")
    )
)]
pub async fn verify_otp(
    otp_service: web::Data<OtpService>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    const MISSING: &str = "phoneNumber and code are required";

    let phone = match required_phone(request.phone_number.as_deref(), MISSING) {
        Ok(phone) => phone,
        Err(e) => return Ok(e.error_response()),
    };
    let code = match request.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code,
        _ => return Ok(AppError::ValidationError(MISSING.to_string()).error_response()),
    };

    match otp_service.check_code(&phone, code).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
            "OTP verified".to_string(),
        ))),
        Err(e) => Ok(AppError::from(e).error_response()),
    }
}

fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid JSON payload: {err}")).into()
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/send-otp", web::post().to(send_otp))
            .route("/verify-otp", web::post().to(verify_otp)),
    );
}
