//! Berth Email Notifier
//!
//! Outbound email used by the account activation flow. The contract is
//! deliberately thin: send a message, report boolean success. Delivery
//! failures are logged here and surface to the caller as `false`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound email collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a message; true means the provider accepted it.
    async fn send(&self, to: &str, subject: &str) -> bool;
}

/// SendGrid-compatible HTTP notifier.
pub struct EmailNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

impl EmailNotifier {
    pub fn new(endpoint: String, api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, to: &str, subject: &str) -> bool {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_address },
            "subject": subject,
            "content": [{
                "type": "text/html",
                "value": "<strong>You can now use your account</strong>",
            }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(SEND_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!("Mail provider accepted message for {} ({})", to, resp.status());
                true
            }
            Ok(resp) => {
                warn!("Mail provider refused message for {}: {}", to, resp.status());
                false
            }
            Err(e) => {
                warn!("Mail send to {} failed: {}", to, e);
                false
            }
        }
    }
}

/// Notifier used when no mail provider is configured: logs the message
/// and reports success so the activation flow stays usable in
/// development.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str) -> bool {
        debug!("Mail delivery disabled; would send '{}' to {}", subject, to);
        true
    }
}
