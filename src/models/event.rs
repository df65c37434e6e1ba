use serde::{Deserialize, Serialize};

/// Game events forwarded by the world server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GuildCreated {
        leader: String,
        guild: String,
    },
    LevelChanged {
        player: String,
        level: u8,
        #[serde(default)]
        is_max_level: bool,
    },
    PlayerKilledByCreature {
        player: String,
        level: u8,
    },
    CreatureKilled {
        creature: String,
        level: u8,
        #[serde(default)]
        is_raid: bool,
        #[serde(default)]
        is_dungeon_boss: bool,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::GuildCreated { .. } => "guild_created",
            GameEvent::LevelChanged { .. } => "level_changed",
            GameEvent::PlayerKilledByCreature { .. } => "player_killed_by_creature",
            GameEvent::CreatureKilled { .. } => "creature_killed",
        }
    }
}
