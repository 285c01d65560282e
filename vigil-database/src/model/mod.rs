pub mod guild_config;
pub mod snowflake;
pub mod verification;

pub use guild_config::{
    DEFAULT_MAX_WARNS, GuildConfig, GuildConfigUpdate, GuildSettings, GuildStats, WarnMap,
    WarnTally, Warning,
};
pub use snowflake::{InvalidSnowflake, Snowflake};
pub use verification::{VerificationLogEntry, VerificationRecord};
