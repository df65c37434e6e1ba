use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    pub id: String,
}

impl WebhookPayload {
    pub fn new(content: &str, webhook_id: &str) -> Self {
        Self {
            content: content.to_string(),
            id: webhook_id.to_string(),
        }
    }
}

/// Result of a request that made it to the remote and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    Rejected { status: u16, body: String },
}
