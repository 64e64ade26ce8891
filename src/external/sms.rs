use crate::error::TransportError;
use async_trait::async_trait;

/// Outbound text-message transport used to deliver OTP codes.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Whether the transport has everything it needs to attempt a send.
    /// An unconfigured sender is skipped rather than treated as a failure.
    fn is_configured(&self) -> bool;

    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError>;
}
