use std::fmt::Debug;

use async_trait::async_trait;

use crate::model::{
    GuildConfig, GuildConfigUpdate, GuildStats, Snowflake, VerificationLogEntry,
    VerificationRecord, WarnTally, Warning,
};

/// Persistence for per-guild documents and the verification audit log.
///
/// Handed to the policy layer as `&dyn GuildStore`; every call is
/// independently durable once it returns.
#[async_trait]
pub trait GuildStore: Send + Sync + Debug {
    /// Fetch a guild document without creating it.
    async fn find(&self, guild_id: Snowflake) -> anyhow::Result<Option<GuildConfig>>;

    /// Fetch a guild document, persisting a default one first if none exists.
    async fn load(&self, guild_id: Snowflake) -> anyhow::Result<GuildConfig>;

    /// Upsert: merge the populated fields of `update` into the stored document.
    async fn save(&self, guild_id: Snowflake, update: GuildConfigUpdate) -> anyhow::Result<()>;

    /// Atomically append one warning to a user's list.
    async fn append_warning(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        warning: Warning,
    ) -> anyhow::Result<WarnTally>;

    /// Atomically empty a user's list and return how many warnings it held.
    async fn take_warnings(&self, guild_id: Snowflake, user_id: Snowflake)
    -> anyhow::Result<usize>;

    async fn find_verification(
        &self,
        guild_id: Snowflake,
    ) -> anyhow::Result<Option<VerificationRecord>>;

    async fn append_verification_log(&self, entry: VerificationLogEntry) -> anyhow::Result<()>;

    /// Verification log entries for one member, oldest first.
    async fn verification_log(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> anyhow::Result<Vec<VerificationLogEntry>>;

    async fn guild_stats(&self, guild_id: Snowflake) -> anyhow::Result<GuildStats>;
}
