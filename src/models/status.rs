use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Running,
    Stopped,
}

impl Display for WorkerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            WorkerState::Running => write!(f, "running"),
            WorkerState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Read-only view of the announcement settings for operators.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub enabled: bool,
    pub webhook_id: String,
    pub webhook_token: String,
    pub player_death: i8,
    pub player_level_up: i8,
    pub announce_guild_creation: bool,
    pub announce_player_max_level: bool,
    pub announce_world_boss_death: bool,
    pub worker: WorkerState,
    pub pending_messages: usize,
    pub generated_at: String,
}

impl StatusReport {
    pub fn new(config: &Config, worker: WorkerState, pending_messages: usize) -> Self {
        Self {
            enabled: config.enabled,
            webhook_id: config.webhook_id.clone(),
            webhook_token: config.webhook_token.clone(),
            player_death: config.player_death,
            player_level_up: config.player_level_up,
            announce_guild_creation: config.guild_creation,
            announce_player_max_level: config.player_max_level,
            announce_world_boss_death: config.world_boss_death,
            worker,
            pending_messages,
            generated_at: chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Announce info:")?;
        writeln!(f, "Enabled? {}", self.enabled)?;
        writeln!(f, "WebhookID: {}", self.webhook_id)?;
        writeln!(f, "WebhookToken: {}", self.webhook_token)?;
        writeln!(f, "PlayerDeath: {}", self.player_death)?;
        writeln!(f, "PlayerLevelUp: {}", self.player_level_up)?;
        writeln!(f, "Announce guild creation? {}", self.announce_guild_creation)?;
        writeln!(f, "Announce player max level? {}", self.announce_player_max_level)?;
        writeln!(f, "Announce World Boss death? {}", self.announce_world_boss_death)?;
        write!(f, "Worker: {} ({} pending)", self.worker, self.pending_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_renders_operator_summary() {
        let config = Config {
            enabled: true,
            webhook_id: "123".to_string(),
            webhook_token: "abc".to_string(),
            player_level_up: 60,
            ..Config::default()
        };

        let rendered = StatusReport::new(&config, WorkerState::Running, 2).to_string();

        assert!(rendered.starts_with("Announce info:\nEnabled? true\n"));
        assert!(rendered.contains("WebhookID: 123\n"));
        assert!(rendered.contains("PlayerDeath: -1\n"));
        assert!(rendered.contains("PlayerLevelUp: 60\n"));
        assert!(rendered.ends_with("Worker: running (2 pending)"));
    }
}
