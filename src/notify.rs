//! Push notifications via the Pushover message API.

use crate::error::{Error, Result};

const PUSHOVER_ENDPOINT: &str = "https://api.pushover.net/1/messages.json";

/// Sends messages to the Pushover service.
#[derive(Debug, Clone)]
pub struct PushoverNotifier {
    app_token: String,
    user_key: String,
    client: reqwest::Client,
}

impl PushoverNotifier {
    /// Create a notifier for an application token and user key.
    pub fn new(app_token: impl Into<String>, user_key: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            user_key: user_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Send a message.
    pub async fn send(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(PUSHOVER_ENDPOINT)
            .form(&[
                ("token", self.app_token.as_str()),
                ("user", self.user_key.as_str()),
                ("message", message),
            ])
            .send()
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| Error::Notify(e.to_string()))?;
        Ok(())
    }
}
