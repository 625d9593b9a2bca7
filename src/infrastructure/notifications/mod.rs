pub mod composite;
pub mod desktop;
pub mod log_file;
pub mod sms;
pub mod terminal;
pub mod webhook;

use crate::application::config::NotificationConfig;
use crate::domain::ports::notifier::{NotificationError, Notifier};

pub use composite::CompositeNotifier;
pub use desktop::DesktopNotifier;
pub use log_file::LogFileNotifier;
pub use sms::SmsNotifier;
pub use terminal::TerminalNotifier;
pub use webhook::WebhookNotifier;

/// Build the composite notifier for the enabled channels.
///
/// # Errors
///
/// Returns `NotificationError` if an enabled channel cannot be set up
/// (bad SMS credentials, HTTP client failure).
pub fn build_notifier(config: &NotificationConfig) -> Result<CompositeNotifier, NotificationError> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if config.terminal {
        notifiers.push(Box::new(TerminalNotifier::new()));
    }
    if config.desktop {
        notifiers.push(Box::new(DesktopNotifier::new()));
    }
    if let Some(ref path) = config.log_file {
        notifiers.push(Box::new(LogFileNotifier::new(path)));
    }
    if let Some(ref url) = config.webhook_url {
        notifiers.push(Box::new(WebhookNotifier::new(url.clone())?));
    }
    if let Some(ref sms) = config.sms {
        notifiers.push(Box::new(SmsNotifier::new(sms)?));
    }
    Ok(CompositeNotifier::new(notifiers))
}
