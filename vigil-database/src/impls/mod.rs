//! Postgres queries, plus the [`GuildStore`] impl that routes through them.

pub mod guild_config;
pub mod verification_log;

use async_trait::async_trait;

use crate::database::Database;
use crate::model::{
    GuildConfig, GuildConfigUpdate, GuildStats, Snowflake, VerificationLogEntry,
    VerificationRecord, WarnTally, Warning,
};
use crate::store::GuildStore;

#[async_trait]
impl GuildStore for Database {
    async fn find(&self, guild_id: Snowflake) -> anyhow::Result<Option<GuildConfig>> {
        guild_config::find_guild_config(self, guild_id).await
    }

    async fn load(&self, guild_id: Snowflake) -> anyhow::Result<GuildConfig> {
        guild_config::load_guild_config(self, guild_id).await
    }

    async fn save(&self, guild_id: Snowflake, update: GuildConfigUpdate) -> anyhow::Result<()> {
        guild_config::save_guild_config(self, guild_id, update).await
    }

    async fn append_warning(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        warning: Warning,
    ) -> anyhow::Result<WarnTally> {
        guild_config::append_warning(self, guild_id, user_id, &warning).await
    }

    async fn take_warnings(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> anyhow::Result<usize> {
        guild_config::take_warnings(self, guild_id, user_id).await
    }

    async fn find_verification(
        &self,
        guild_id: Snowflake,
    ) -> anyhow::Result<Option<VerificationRecord>> {
        guild_config::find_verification(self, guild_id).await
    }

    async fn append_verification_log(&self, entry: VerificationLogEntry) -> anyhow::Result<()> {
        verification_log::append_verification_log(self, &entry).await
    }

    async fn verification_log(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> anyhow::Result<Vec<VerificationLogEntry>> {
        verification_log::verification_log_for_user(self, guild_id, user_id).await
    }

    async fn guild_stats(&self, guild_id: Snowflake) -> anyhow::Result<GuildStats> {
        let total_verifications = verification_log::count_verifications(self, guild_id).await?;
        let (active_warnings, warned_users) =
            guild_config::warning_totals(self, guild_id).await?;

        Ok(GuildStats {
            total_verifications,
            active_warnings,
            warned_users,
        })
    }
}
