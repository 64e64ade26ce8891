pub mod auth;

pub use auth::auth_config;

use actix_web::HttpResponse;
use serde_json::json;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Welcome to the API" }))
}
