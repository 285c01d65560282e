//! In-process store with the same semantics as the Postgres backend.
//!
//! Used by tests, and by the bot when no `DATABASE_URL` is configured.
//! Nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::{
    GuildConfig, GuildConfigUpdate, GuildSettings, GuildStats, Snowflake, VerificationLogEntry,
    VerificationRecord, WarnTally, Warning,
};
use crate::store::GuildStore;

#[derive(Debug, Default)]
struct MemoryState {
    guilds: HashMap<Snowflake, GuildConfig>,
    verification_log: Vec<VerificationLogEntry>,
}

impl MemoryState {
    fn guild_mut(&mut self, guild_id: Snowflake, defaults: GuildSettings) -> &mut GuildConfig {
        self.guilds
            .entry(guild_id)
            .or_insert_with(|| GuildConfig::new(guild_id, defaults))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    defaults: GuildSettings,
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new(defaults: GuildSettings) -> Self {
        Self {
            defaults,
            state: Mutex::default(),
        }
    }
}

#[async_trait]
impl GuildStore for MemoryStore {
    async fn find(&self, guild_id: Snowflake) -> anyhow::Result<Option<GuildConfig>> {
        Ok(self.state.lock().await.guilds.get(&guild_id).cloned())
    }

    async fn load(&self, guild_id: Snowflake) -> anyhow::Result<GuildConfig> {
        let mut state = self.state.lock().await;
        Ok(state.guild_mut(guild_id, self.defaults).clone())
    }

    async fn save(&self, guild_id: Snowflake, update: GuildConfigUpdate) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.guild_mut(guild_id, self.defaults).apply(update);
        Ok(())
    }

    async fn append_warning(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        warning: Warning,
    ) -> anyhow::Result<WarnTally> {
        let mut state = self.state.lock().await;
        let guild = state.guild_mut(guild_id, self.defaults);
        let list = guild.warns.entry(user_id).or_default();
        list.push(warning);

        Ok(WarnTally {
            count: list.len(),
            max_warns: guild.settings.max_warns,
        })
    }

    async fn take_warnings(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> anyhow::Result<usize> {
        let mut state = self.state.lock().await;
        let guild = state.guild_mut(guild_id, self.defaults);

        match guild.warns.get_mut(&user_id) {
            Some(list) if !list.is_empty() => {
                let previous = list.len();
                list.clear();
                Ok(previous)
            }
            _ => Ok(0),
        }
    }

    async fn find_verification(
        &self,
        guild_id: Snowflake,
    ) -> anyhow::Result<Option<VerificationRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .guilds
            .get(&guild_id)
            .and_then(|guild| guild.verification.clone()))
    }

    async fn append_verification_log(&self, entry: VerificationLogEntry) -> anyhow::Result<()> {
        self.state.lock().await.verification_log.push(entry);
        Ok(())
    }

    async fn verification_log(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> anyhow::Result<Vec<VerificationLogEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .verification_log
            .iter()
            .filter(|entry| entry.guild_id == guild_id && entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn guild_stats(&self, guild_id: Snowflake) -> anyhow::Result<GuildStats> {
        let state = self.state.lock().await;
        let total_verifications = state
            .verification_log
            .iter()
            .filter(|entry| entry.guild_id == guild_id)
            .count() as u64;

        let (active_warnings, warned_users) = state
            .guilds
            .get(&guild_id)
            .map(|guild| {
                guild
                    .warns
                    .values()
                    .filter(|list| !list.is_empty())
                    .fold((0_u64, 0_u64), |(total, users), list| {
                        (total + list.len() as u64, users + 1)
                    })
            })
            .unwrap_or_default();

        Ok(GuildStats {
            total_verifications,
            active_warnings,
            warned_users,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn id(raw: u64) -> Snowflake {
        Snowflake::new(raw).unwrap()
    }

    #[tokio::test]
    async fn load_creates_default_document_once() {
        let store = MemoryStore::new(GuildSettings { max_warns: 4 });

        assert!(store.find(id(1)).await.unwrap().is_none());
        let doc = store.load(id(1)).await.unwrap();

        assert_eq!(doc.guild_id, id(1));
        assert_eq!(doc.settings.max_warns, 4);
        assert!(doc.warns.is_empty());
        assert!(store.find(id(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_upserts_and_merges() {
        let store = MemoryStore::default();
        store
            .append_warning(id(1), id(2), Warning::new("spam", id(3)))
            .await
            .unwrap();

        store
            .save(id(1), GuildConfigUpdate::settings(GuildSettings { max_warns: 9 }))
            .await
            .unwrap();
        let doc = store.load(id(1)).await.unwrap();

        assert_eq!(doc.settings.max_warns, 9);
        assert_eq!(doc.warnings_for(id(2)).len(), 1);
    }

    #[tokio::test]
    async fn append_counts_per_user() {
        let store = MemoryStore::default();
        for _ in 0..2 {
            store
                .append_warning(id(1), id(2), Warning::new("a", id(9)))
                .await
                .unwrap();
        }
        let other = store
            .append_warning(id(1), id(3), Warning::new("b", id(9)))
            .await
            .unwrap();
        let tally = store
            .append_warning(id(1), id(2), Warning::new("c", id(9)))
            .await
            .unwrap();

        assert_eq!(other.count, 1);
        assert_eq!(tally.count, 3);
        assert!(tally.threshold_reached());
    }

    #[tokio::test]
    async fn take_reports_prior_count_then_zero() {
        let store = MemoryStore::default();
        store
            .append_warning(id(1), id(2), Warning::new("a", id(9)))
            .await
            .unwrap();
        store
            .append_warning(id(1), id(2), Warning::new("b", id(9)))
            .await
            .unwrap();

        assert_eq!(store.take_warnings(id(1), id(2)).await.unwrap(), 2);
        assert_eq!(store.take_warnings(id(1), id(2)).await.unwrap(), 0);
        assert!(store.load(id(1)).await.unwrap().warnings_for(id(2)).is_empty());
    }

    #[tokio::test]
    async fn stats_count_log_entries_and_live_warnings() {
        let store = MemoryStore::default();
        store
            .append_warning(id(1), id(2), Warning::new("a", id(9)))
            .await
            .unwrap();
        store
            .append_warning(id(1), id(3), Warning::new("b", id(9)))
            .await
            .unwrap();
        store.take_warnings(id(1), id(3)).await.unwrap();
        store
            .append_verification_log(VerificationLogEntry {
                user_id: id(2),
                guild_id: id(1),
                verified_by: id(9),
                manual: true,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        let stats = store.guild_stats(id(1)).await.unwrap();
        assert_eq!(stats.total_verifications, 1);
        assert_eq!(stats.active_warnings, 1);
        assert_eq!(stats.warned_users, 1);
        assert_eq!(store.verification_log(id(1), id(2)).await.unwrap().len(), 1);
        assert!(store.verification_log(id(1), id(3)).await.unwrap().is_empty());
    }
}
