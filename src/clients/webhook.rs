use std::time::Duration;

use anyhow::{Context, Error, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::Config,
    models::{
        endpoint::Endpoint,
        webhook::{DeliveryOutcome, WebhookPayload},
    },
};

/// Longest response body kept for a rejection log line.
const MAX_REJECTION_BODY: usize = 512;

#[derive(Clone, Debug)]
pub struct WebhookClient {
    http_client: Client,
    base_url: String,
}

impl WebhookClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_base_url(
            &config.webhook_base_url,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    pub fn with_base_url(base_url: &str, request_timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build webhook HTTP client")?;

        info!(
            base_url,
            timeout_seconds = request_timeout.as_secs_f64(),
            "Webhook client initialized"
        );

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.destination_path())
    }

    /// Sends one message as a single POST. `Err` means the transport failed;
    /// any response from the remote comes back as an outcome.
    pub async fn send(&self, endpoint: &Endpoint, message: &str) -> Result<DeliveryOutcome, Error> {
        let payload = WebhookPayload::new(message, &endpoint.webhook_id);

        debug!(webhook_id = %endpoint.webhook_id, "Posting announcement to webhook");

        let response = self
            .http_client
            .post(self.url_for(endpoint))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(DeliveryOutcome::Delivered {
                status: status.as_u16(),
            });
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_REJECTION_BODY {
            let mut cut = MAX_REJECTION_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Ok(DeliveryOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
