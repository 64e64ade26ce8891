use regex::Regex;
use std::sync::OnceLock;

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// 去除手机号中的所有空白字符
///
/// Both the send and verify paths key the OTP store by the normalized number.
pub fn normalize_phone(phone: &str) -> String {
    whitespace().replace_all(phone, "").into_owned()
}
