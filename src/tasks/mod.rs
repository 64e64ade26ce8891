//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup.

use crate::services::OtpService;

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
///
/// A zero `sweep_interval_secs` disables the OTP sweep. Expired codes are then
/// only dropped when a verification touches them or a new code overwrites them.
pub fn spawn_all(otp_service: OtpService, sweep_interval_secs: u64) {
    if sweep_interval_secs == 0 {
        log::info!("OTP expiry sweep disabled");
        return;
    }

    // 定期清理过期验证码
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(sweep_interval_secs));
        loop {
            interval.tick().await;
            let removed = otp_service.sweep_expired().await;
            if removed > 0 {
                log::debug!("Expired OTP records removed: {removed}");
            }
        }
    });
}
