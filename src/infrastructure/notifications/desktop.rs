use async_trait::async_trait;
use notify_rust::{Notification, Timeout, Urgency};

use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::sensor::SensorKind;

const MAX_BODY_CHARS: usize = 250;

/// Desktop pop-up through the session's notification server.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let summary = summary_for(message);
        let body = truncate(&escape_markup(message), MAX_BODY_CHARS);

        tokio::task::spawn_blocking(move || send_notification(summary, &body))
            .await
            .map_err(|e| NotificationError::SendFailed(format!("desktop task failed: {e}")))?
    }
}

fn send_notification(summary: &str, body: &str) -> Result<(), NotificationError> {
    Notification::new()
        .appname("pitwatch")
        .summary(summary)
        .body(body)
        .urgency(Urgency::Critical)
        .timeout(Timeout::Milliseconds(10_000))
        .show()
        .map_err(|_| {
            NotificationError::ChannelUnavailable(
                "desktop notification server unreachable".to_string(),
            )
        })?;

    Ok(())
}

fn summary_for(message: &str) -> &'static str {
    if message.starts_with(SensorKind::Food.headline()) {
        "pitwatch \u{2014} food stall"
    } else if message.starts_with(SensorKind::Smoker.headline()) {
        "pitwatch \u{2014} smoker alert"
    } else {
        "pitwatch"
    }
}

// Truncates on Unicode scalar values (not grapheme clusters).
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    }
}

/// Notification servers may interpret a subset of HTML in the body.
fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
