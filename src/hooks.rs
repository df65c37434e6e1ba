//! Announcement producers, one per game event.
//!
//! Each hook decides eligibility from the current [`Config`] and, when the
//! event qualifies, renders the message and hands it to the [`Dispatcher`].
//! Hooks return the enqueued message so callers can echo it back.

use tracing::info;

use crate::{config::Config, dispatcher::Dispatcher, models::event::GameEvent};

/// Bosses above this level in a raid count as world bosses.
pub const WORLD_BOSS_MIN_LEVEL: u8 = 80;

pub fn announce(config: &Config, dispatcher: &Dispatcher, event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::GuildCreated { leader, guild } => {
            on_guild_created(config, dispatcher, leader, guild)
        }
        GameEvent::LevelChanged {
            player,
            level,
            is_max_level,
        } => on_level_changed(config, dispatcher, player, *level, *is_max_level),
        GameEvent::PlayerKilledByCreature { player, level } => {
            on_player_killed_by_creature(config, dispatcher, player, *level)
        }
        GameEvent::CreatureKilled {
            creature,
            level,
            is_raid,
            is_dungeon_boss,
        } => on_creature_killed(config, dispatcher, creature, *level, *is_raid, *is_dungeon_boss),
    }
}

pub fn on_guild_created(
    config: &Config,
    dispatcher: &Dispatcher,
    leader: &str,
    guild: &str,
) -> Option<String> {
    if !(config.enabled && config.guild_creation) {
        return None;
    }

    publish(dispatcher, format!("{leader} just created the guild: {guild}"))
}

pub fn on_level_changed(
    config: &Config,
    dispatcher: &Dispatcher,
    player: &str,
    level: u8,
    is_max_level: bool,
) -> Option<String> {
    if !config.enabled {
        return None;
    }

    // Max level wins over the threshold so a player is announced once.
    if config.player_max_level && is_max_level {
        return publish(dispatcher, format!("{player} reached max level."));
    }

    match config.player_level_up_threshold() {
        Some(threshold) if level >= threshold => {
            publish(dispatcher, format!("{player} reached level {level}."))
        }
        _ => None,
    }
}

pub fn on_player_killed_by_creature(
    config: &Config,
    dispatcher: &Dispatcher,
    player: &str,
    level: u8,
) -> Option<String> {
    if !config.enabled {
        return None;
    }

    match config.player_death_threshold() {
        Some(threshold) if level >= threshold => {
            publish(dispatcher, format!("{player} died at level {level}."))
        }
        _ => None,
    }
}

pub fn on_creature_killed(
    config: &Config,
    dispatcher: &Dispatcher,
    creature: &str,
    level: u8,
    is_raid: bool,
    is_dungeon_boss: bool,
) -> Option<String> {
    let world_boss = is_raid && is_dungeon_boss && level > WORLD_BOSS_MIN_LEVEL;
    if !(config.enabled && config.world_boss_death && world_boss) {
        return None;
    }

    publish(dispatcher, format!("World Boss {creature} has been killed."))
}

fn publish(dispatcher: &Dispatcher, message: String) -> Option<String> {
    info!(message = %message, "Announce");
    dispatcher.enqueue(message.clone());
    Some(message)
}
