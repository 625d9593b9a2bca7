use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::config::SmsConfig;
use crate::domain::ports::notifier::{NotificationError, Notifier};

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio-style "create message" response; only the id is of interest.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: Option<String>,
}

/// Sends each alert as a text message through the Twilio REST API.
pub struct SmsNotifier {
    client: reqwest::Client,
    endpoint: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
    to_number: String,
}

impl SmsNotifier {
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if a credential is
    /// empty or the HTTP client cannot be initialized.
    pub fn new(config: &SmsConfig) -> Result<Self, NotificationError> {
        let required = [
            ("account_sid", &config.account_sid),
            ("auth_token", &config.auth_token),
            ("from_number", &config.from_number),
            ("to_number", &config.to_number),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(NotificationError::ChannelUnavailable(format!(
                "sms: {field} is empty"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("cannot build HTTP client: {e}"))
            })?;

        let base = config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');

        Ok(Self {
            client,
            endpoint: format!(
                "{base}/2010-04-01/Accounts/{}/Messages.json",
                config.account_sid
            ),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            to_number: config.to_number.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let form = [
            ("To", self.to_number.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", message),
        ];
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("sms request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::SendFailed(format!("sms HTTP {status}")));
        }

        match response.json::<MessageResponse>().await {
            Ok(MessageResponse { sid: Some(sid) }) => {
                tracing::info!("Text message sent with SID: {sid}");
            }
            Ok(MessageResponse { sid: None }) | Err(_) => {
                tracing::debug!("Text message accepted without a readable SID");
            }
        }
        Ok(())
    }
}
