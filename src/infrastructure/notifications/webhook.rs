use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::sensor::SensorKind;

/// Webhook payload format, auto-detected from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebhookFormat {
    Slack,
    Discord,
    Generic,
}

/// Posts alert messages to an HTTP webhook.
///
/// Slack and Discord URLs get their native payloads; anything else receives
/// a small generic JSON object.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// The HTTP client uses a 5-second timeout covering DNS resolution,
    /// connection, and response.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new(url: impl Into<String>) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("cannot build HTTP client: {e}"))
            })?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    fn detect_format(&self) -> WebhookFormat {
        // Compare the host only, to avoid substring false positives
        let host = self
            .url
            .split("//")
            .nth(1)
            .and_then(|s| s.split('/').next())
            .and_then(|h| h.split(':').next())
            .unwrap_or("");

        if host == "hooks.slack.com" {
            WebhookFormat::Slack
        } else if host == "discord.com" || host == "discordapp.com" {
            WebhookFormat::Discord
        } else {
            WebhookFormat::Generic
        }
    }

    fn format_message(&self, message: &str) -> Value {
        match self.detect_format() {
            WebhookFormat::Slack => json!({
                "text": message,
                "attachments": [{
                    "color": color_hex(message),
                    "text": message,
                }]
            }),
            WebhookFormat::Discord => json!({
                "username": "pitwatch",
                "embeds": [{
                    "title": title_for(message),
                    "description": message,
                    "color": color_decimal(message),
                    "timestamp": Utc::now().to_rfc3339(),
                }]
            }),
            WebhookFormat::Generic => json!({
                "source": "pitwatch",
                "title": title_for(message),
                "message": message,
                "timestamp": Utc::now().to_rfc3339(),
            }),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let payload = self.format_message(message);
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("webhook request failed: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "webhook HTTP {}",
                response.status()
            )))
        }
    }
}

fn kind_of(message: &str) -> Option<SensorKind> {
    [SensorKind::Smoker, SensorKind::Food]
        .into_iter()
        .find(|kind| message.starts_with(kind.headline()))
}

fn title_for(message: &str) -> String {
    kind_of(message).map_or_else(
        || "pitwatch alert".to_string(),
        |kind| format!("{} {}", kind.emoji(), kind.headline()),
    )
}

fn color_hex(message: &str) -> &'static str {
    match kind_of(message) {
        Some(SensorKind::Smoker) => "#E74C3C",
        Some(SensorKind::Food) => "#E67E22",
        None => "#3498DB",
    }
}

fn color_decimal(message: &str) -> u32 {
    match kind_of(message) {
        Some(SensorKind::Smoker) => 0x00_E7_4C_3C,
        Some(SensorKind::Food) => 0x00_E6_7E_22,
        None => 0x00_34_98_DB,
    }
}
