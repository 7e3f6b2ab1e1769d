use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::domain::notification::{DispatchError, OutgoingMail};
use crate::domain::repository::MailChannel;

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Transactional-email HTTP API (Resend-compatible: bearer key, JSON body).
#[derive(Clone)]
pub struct HttpMailChannel {
    pub client: Client,
    pub api_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for HttpMailChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailChannel")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpMailChannel {
    /// `timeout` bounds each delivery from connect to the last response byte.
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

impl MailChannel for HttpMailChannel {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SendEmailBody {
                from: &mail.from,
                to: [&mail.to],
                subject: &mail.subject,
                html: &mail.html,
            })
            .send()
            .await
            .map_err(|e| DispatchError::Channel(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Channel(format!(
            "{}: {}",
            status.as_u16(),
            channel_message(&body)
        )))
    }
}

/// Pull the human-readable message out of an error response, falling back
/// to the raw body.
fn channel_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(str::to_owned))
        })
        .unwrap_or_else(|| body.trim().to_owned())
}
