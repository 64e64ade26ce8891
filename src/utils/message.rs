pub const DEFAULT_OTP_TEMPLATE: &str =
    "Your verification code is {{code}}. It expires in {{ttl-minutes}} minutes.";

/// Fills `{{code}}` and `{{ttl-minutes}}` placeholders. Minutes are rounded to nearest.
pub fn render_otp_message(template: &str, code: &str, ttl_ms: i64) -> String {
    let minutes = (ttl_ms as f64 / 60_000.0).round() as i64;
    template
        .replace("{{code}}", code)
        .replace("{{ttl-minutes}}", &minutes.to_string())
}
