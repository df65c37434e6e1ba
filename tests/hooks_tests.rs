use std::time::Duration;

use announce_service::{
    clients::webhook::WebhookClient,
    config::Config,
    dispatcher::Dispatcher,
    hooks::{self, on_creature_killed, on_guild_created, on_level_changed, on_player_killed_by_creature},
    models::{endpoint::Endpoint, event::GameEvent},
};
use anyhow::Result;

/// Test: Guild creation is announced only when toggled on
#[test]
fn test_guild_creation_announcement() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;

    let mut config = enabled_config();
    assert_eq!(on_guild_created(&config, &dispatcher, "Alice", "Raiders"), None);

    config.guild_creation = true;
    assert_eq!(
        on_guild_created(&config, &dispatcher, "Alice", "Raiders").as_deref(),
        Some("Alice just created the guild: Raiders")
    );

    assert_eq!(
        dispatcher.pending_messages(),
        vec!["Alice just created the guild: Raiders".to_string()]
    );

    Ok(())
}

/// Test: Level-ups at or above the threshold are announced
#[test]
fn test_level_up_threshold() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;
    let config = Config {
        player_level_up: 60,
        ..enabled_config()
    };

    assert_eq!(on_level_changed(&config, &dispatcher, "Alice", 59, false), None);
    assert_eq!(
        on_level_changed(&config, &dispatcher, "Alice", 60, false).as_deref(),
        Some("Alice reached level 60.")
    );
    assert_eq!(
        on_level_changed(&config, &dispatcher, "Alice", 61, false).as_deref(),
        Some("Alice reached level 61.")
    );
    assert_eq!(dispatcher.pending_len(), 2);

    Ok(())
}

/// Test: Max level replaces the regular level-up message
#[test]
fn test_max_level_is_announced_once() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;
    let config = Config {
        player_level_up: 1,
        player_max_level: true,
        ..enabled_config()
    };

    assert_eq!(
        on_level_changed(&config, &dispatcher, "Alice", 80, true).as_deref(),
        Some("Alice reached max level.")
    );
    assert_eq!(
        dispatcher.pending_messages(),
        vec!["Alice reached max level.".to_string()]
    );

    Ok(())
}

/// Test: Max level falls back to the threshold when its toggle is off
#[test]
fn test_max_level_without_toggle_uses_threshold() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;
    let config = Config {
        player_level_up: 70,
        ..enabled_config()
    };

    assert_eq!(
        on_level_changed(&config, &dispatcher, "Alice", 80, true).as_deref(),
        Some("Alice reached level 80.")
    );

    Ok(())
}

/// Test: Deaths respect the threshold and the -1 switch
#[test]
fn test_player_death_threshold() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;

    let config = enabled_config();
    assert_eq!(on_player_killed_by_creature(&config, &dispatcher, "Bob", 45), None);

    let config = Config {
        player_death: 45,
        ..enabled_config()
    };
    assert_eq!(on_player_killed_by_creature(&config, &dispatcher, "Bob", 44), None);
    assert_eq!(
        on_player_killed_by_creature(&config, &dispatcher, "Bob", 45).as_deref(),
        Some("Bob died at level 45.")
    );

    Ok(())
}

/// Test: Only raid dungeon bosses above level 80 are world bosses
#[test]
fn test_world_boss_kill() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;
    let config = Config {
        world_boss_death: true,
        ..enabled_config()
    };

    assert_eq!(on_creature_killed(&config, &dispatcher, "Onyxia", 80, true, true), None);
    assert_eq!(on_creature_killed(&config, &dispatcher, "Onyxia", 83, false, true), None);
    assert_eq!(on_creature_killed(&config, &dispatcher, "Onyxia", 83, true, false), None);
    assert_eq!(
        on_creature_killed(&config, &dispatcher, "Onyxia", 83, true, true).as_deref(),
        Some("World Boss Onyxia has been killed.")
    );
    assert_eq!(dispatcher.pending_len(), 1);

    Ok(())
}

/// Test: Nothing is enqueued while the subsystem is disabled
#[test]
fn test_disabled_config_produces_nothing() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;
    let config = Config {
        enabled: false,
        guild_creation: true,
        player_death: 1,
        player_level_up: 1,
        player_max_level: true,
        world_boss_death: true,
        ..Config::default()
    };

    let events = [
        GameEvent::GuildCreated {
            leader: "Alice".to_string(),
            guild: "Raiders".to_string(),
        },
        GameEvent::LevelChanged {
            player: "Alice".to_string(),
            level: 80,
            is_max_level: true,
        },
        GameEvent::PlayerKilledByCreature {
            player: "Bob".to_string(),
            level: 45,
        },
        GameEvent::CreatureKilled {
            creature: "Onyxia".to_string(),
            level: 83,
            is_raid: true,
            is_dungeon_boss: true,
        },
    ];

    for event in &events {
        assert_eq!(hooks::announce(&config, &dispatcher, event), None);
    }
    assert_eq!(dispatcher.pending_len(), 0);

    Ok(())
}

/// Test: Tagged JSON events route to their hook
#[test]
fn test_json_event_routes_to_hook() -> Result<()> {
    let dispatcher = create_idle_dispatcher()?;
    let config = Config {
        player_level_up: 60,
        ..enabled_config()
    };

    let event: GameEvent =
        serde_json::from_str(r#"{"type": "level_changed", "player": "Alice", "level": 60}"#)?;
    assert_eq!(event.kind(), "level_changed");

    assert_eq!(
        hooks::announce(&config, &dispatcher, &event).as_deref(),
        Some("Alice reached level 60.")
    );

    Ok(())
}

fn enabled_config() -> Config {
    Config {
        enabled: true,
        webhook_id: "123".to_string(),
        webhook_token: "abc".to_string(),
        ..Config::default()
    }
}

/// A dispatcher that is never started, so enqueued messages stay visible.
fn create_idle_dispatcher() -> Result<Dispatcher> {
    let client = WebhookClient::with_base_url("http://127.0.0.1:9", Duration::from_secs(1))?;
    Ok(Dispatcher::new(client, Endpoint::new("123", "abc")))
}
