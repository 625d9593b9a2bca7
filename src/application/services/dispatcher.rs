use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::alert::AlertEvent;
use crate::domain::ports::notifier::{NotificationError, Notifier};

#[derive(Error, Debug)]
#[error("failed to dispatch {sensor} alert: {source}")]
pub struct DispatchError {
    pub sensor: String,
    #[source]
    pub source: NotificationError,
}

/// Renders alert events and hands them to a notification sink, once each.
///
/// Delivery failures are returned, never retried.
#[derive(Clone)]
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// # Errors
    ///
    /// Returns `DispatchError` wrapping the sink's `NotificationError`.
    pub async fn dispatch(&self, event: &AlertEvent) -> Result<(), DispatchError> {
        let message = render_message(event);
        self.notifier
            .notify(&message)
            .await
            .map_err(|source| DispatchError {
                sensor: event.sensor_name.clone(),
                source,
            })
    }
}

/// Human-readable alert text, e.g.
///
/// ```text
/// Smoker alert! smoker Alert: Temperature change >= 15°F in 2 minutes. (225.0°F -> 205.0°F)
/// ```
#[must_use]
pub fn render_message(event: &AlertEvent) -> String {
    format!(
        "{} {} Alert: Temperature change >= {}°F in {} minutes. ({:.1}°F -> {:.1}°F)",
        event.kind.headline(),
        event.sensor_name,
        event.threshold,
        round_minutes(event.elapsed_minutes),
        event.first_value,
        event.last_value,
    )
}

fn round_minutes(minutes: f64) -> f64 {
    (minutes * 100.0).round() / 100.0
}
