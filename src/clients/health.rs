use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::{
    dispatcher::Dispatcher,
    models::{
        health::{HealthCheckResponse, HealthStatus, ServiceHealth},
        status::WorkerState,
    },
};

pub struct HealthChecker;

impl HealthChecker {
    pub fn check_all(dispatcher: &Dispatcher) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let dispatcher_health = Self::check_dispatcher(dispatcher);
        checks.insert("announce_dispatcher".to_string(), dispatcher_health);

        let overall_status = Self::determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            checks,
        }
    }

    fn check_dispatcher(dispatcher: &Dispatcher) -> ServiceHealth {
        let pending = dispatcher.pending_len();
        let endpoint = dispatcher.endpoint();

        if !endpoint.is_usable() {
            return ServiceHealth::degraded(pending, "announcements disabled".to_string());
        }

        match dispatcher.state() {
            WorkerState::Running => {
                debug!(pending, "Dispatcher health check passed");
                ServiceHealth::healthy(pending)
            }
            WorkerState::Stopped => {
                ServiceHealth::degraded(pending, "worker stopped".to_string())
            }
        }
    }

    fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        let has_degraded = checks
            .values()
            .any(|health| health.status == HealthStatus::Degraded);

        if has_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
