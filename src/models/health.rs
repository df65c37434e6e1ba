use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    pub checks: HashMap<String, ServiceHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_messages: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    pub fn healthy(pending_messages: usize) -> Self {
        Self {
            status: HealthStatus::Healthy,
            pending_messages: Some(pending_messages),
            error: None,
        }
    }

    pub fn degraded(pending_messages: usize, reason: String) -> Self {
        Self {
            status: HealthStatus::Degraded,
            pending_messages: Some(pending_messages),
            error: Some(reason),
        }
    }
}
