use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use shop_otp::{
    config::Config,
    external::{SmsSender, TwilioService},
    handlers,
    middlewares::create_cors,
    services::{OtpService, OtpSettings, OtpStore},
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().map_err(std::io::Error::other)?;

    let twilio_service = TwilioService::new(config.twilio.clone());
    if !twilio_service.is_configured() {
        log::warn!("Twilio not configured, OTP codes will only be logged");
    }
    if config.otp.debug_echo {
        log::warn!("OTP debug echo enabled, codes are returned in API responses");
    }

    let otp_service = OtpService::new(
        OtpStore::new(),
        Arc::new(twilio_service),
        OtpSettings::from(&config.otp),
    );

    tasks::spawn_all(otp_service.clone(), config.otp.sweep_interval_secs);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&allowed_origins))
            .app_data(web::Data::new(otp_service.clone()))
            .configure(swagger_config)
            .route("/", web::get().to(handlers::index))
            .service(web::scope("/api").configure(handlers::auth_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
