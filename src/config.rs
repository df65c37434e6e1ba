use anyhow::{Context, Error, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use tracing::error;

use crate::models::endpoint::Endpoint;

pub const ENV_PREFIX: &str = "ANNOUNCE_";
pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://discord.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_id: String,
    #[serde(default)]
    pub webhook_token: String,

    #[serde(default)]
    pub guild_creation: bool,
    #[serde(default = "disabled_threshold")]
    pub player_death: i8,
    #[serde(default = "disabled_threshold")]
    pub player_level_up: i8,
    #[serde(default)]
    pub player_max_level: bool,
    #[serde(default)]
    pub world_boss_death: bool,

    #[serde(default = "default_base_url")]
    pub webhook_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn disabled_threshold() -> i8 {
    -1
}

fn default_base_url() -> String {
    DEFAULT_WEBHOOK_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn default_server_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_id: String::new(),
            webhook_token: String::new(),
            guild_creation: false,
            player_death: disabled_threshold(),
            player_level_up: disabled_threshold(),
            player_max_level: false,
            world_boss_death: false,
            webhook_base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            server_port: default_server_port(),
        }
    }
}

impl Config {
    /// Reads `ANNOUNCE_*` variables (and an optional `.env`) and validates the
    /// webhook credentials.
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .context("Invalid announce environment variable")?;

        Ok(config.validated())
    }

    /// Same as [`Config::load`] but reads from an explicit variable list.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .context("Invalid announce configuration value")?;

        Ok(config.validated())
    }

    /// Missing credentials disable the whole subsystem. Not fatal.
    pub fn validated(mut self) -> Self {
        if !self.has_credentials() {
            self.enabled = false;
            error!(
                webhook_id_set = !self.webhook_id.is_empty(),
                webhook_token_set = !self.webhook_token.is_empty(),
                "Announce: please provide a webhook token and ID to enable announcements"
            );
        }
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.webhook_id.is_empty() && !self.webhook_token.is_empty()
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            webhook_id: self.webhook_id.clone(),
            webhook_token: self.webhook_token.clone(),
            enabled: self.enabled && self.has_credentials(),
        }
    }

    pub fn player_death_threshold(&self) -> Option<u8> {
        threshold_level(self.player_death)
    }

    pub fn player_level_up_threshold(&self) -> Option<u8> {
        threshold_level(self.player_level_up)
    }
}

/// Negative thresholds switch the announcement off.
fn threshold_level(value: i8) -> Option<u8> {
    u8::try_from(value).ok()
}
