use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::auth::send_otp, handlers::auth::verify_otp),
    components(schemas(
        SendOtpRequest,
        VerifyOtpRequest,
        OtpIssued,
        ApiError,
        SendOtpApiResponse,
    )),
    tags((name = "auth", description = "One-time passcode API")),
    info(
        title = "Shop OTP API",
        version = "1.0.0",
        description = "Phone number verification by one-time passcode"
    ),
    servers((url = "/api", description = "Local server"))
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
