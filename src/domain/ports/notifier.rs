use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// A sink for rendered alert messages (terminal, SMS, webhook, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Deliver one alert message.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the message could not be delivered
    /// or the channel is unavailable.
    async fn notify(&self, message: &str) -> Result<(), NotificationError>;
}
