pub mod code_generator;
pub mod message;
pub mod phone;

pub use code_generator::{MAX_CODE_LENGTH, generate_numeric_code};
pub use message::{DEFAULT_OTP_TEMPLATE, render_otp_message};
pub use phone::normalize_phone;
