use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snowflake::Snowflake;
use super::verification::VerificationRecord;

/// Warning threshold applied to guilds that never changed it.
pub const DEFAULT_MAX_WARNS: u32 = 3;

/// Per-user warning lists, in insertion (chronological) order.
pub type WarnMap = BTreeMap<Snowflake, Vec<Warning>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub reason: String,
    pub moderator_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl Warning {
    pub fn new(reason: impl Into<String>, moderator_id: Snowflake) -> Self {
        Self {
            reason: reason.into(),
            moderator_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    #[serde(default = "default_max_warns")]
    pub max_warns: u32,
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self {
            max_warns: DEFAULT_MAX_WARNS,
        }
    }
}

fn default_max_warns() -> u32 {
    DEFAULT_MAX_WARNS
}

/// The per-guild document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub guild_id: Snowflake,
    #[serde(default)]
    pub warns: WarnMap,
    #[serde(default)]
    pub settings: GuildSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationRecord>,
}

impl GuildConfig {
    pub fn new(guild_id: Snowflake, settings: GuildSettings) -> Self {
        Self {
            guild_id,
            warns: WarnMap::new(),
            settings,
            verification: None,
        }
    }

    pub fn warnings_for(&self, user_id: Snowflake) -> &[Warning] {
        self.warns.get(&user_id).map_or(&[], Vec::as_slice)
    }

    /// Merge the populated fields of `update` over this document.
    pub fn apply(&mut self, update: GuildConfigUpdate) {
        if let Some(warns) = update.warns {
            self.warns = warns;
        }
        if let Some(settings) = update.settings {
            self.settings = settings;
        }
        if let Some(verification) = update.verification {
            self.verification = Some(verification);
        }
    }
}

/// A partial write: only `Some` fields replace their stored counterpart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuildConfigUpdate {
    pub warns: Option<WarnMap>,
    pub settings: Option<GuildSettings>,
    pub verification: Option<VerificationRecord>,
}

impl GuildConfigUpdate {
    pub fn settings(settings: GuildSettings) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    pub fn verification(record: VerificationRecord) -> Self {
        Self {
            verification: Some(record),
            ..Self::default()
        }
    }
}

/// Result of appending a warning: the user's new count and the guild threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarnTally {
    pub count: usize,
    pub max_warns: u32,
}

impl WarnTally {
    pub fn threshold_reached(&self) -> bool {
        self.count >= self.max_warns as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuildStats {
    pub total_verifications: u64,
    pub active_warnings: u64,
    pub warned_users: u64,
}
