// Telegram notification transport

use crate::config::TelegramConfig;
use crate::errors::NotifyError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Outbound notification seam
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single text notification
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// Notifier backed by the Telegram Bot API `sendMessage` method
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a new TelegramNotifier with a shared HTTP client
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                NotifyError::RequestFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    /// Pull the human-readable error out of a Telegram error response body
    fn rejection_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("description")
                    .and_then(|d| d.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[instrument(skip(self, text))]
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", text)];

        let response = self
            .client
            .post(self.send_message_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message: Self::rejection_message(&body),
            });
        }

        tracing::debug!("Notification delivered");
        Ok(())
    }
}
