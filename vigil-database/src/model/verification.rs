use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snowflake::Snowflake;

/// Resolved role/channel ids of a guild's verification setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub enabled: bool,
    pub verified_role_id: Snowflake,
    pub unverified_role_id: Snowflake,
    pub verify_channel_id: Snowflake,
}

/// Append-only audit entry written whenever a member gets verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub verified_by: Snowflake,
    pub manual: bool,
    pub timestamp: DateTime<Utc>,
}
