//! Recording platform and store doubles shared by the policy tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;

use vigil_database::model::{
    GuildConfig, GuildConfigUpdate, GuildStats, Snowflake, VerificationLogEntry,
    VerificationRecord, WarnTally, Warning,
};
use vigil_database::{GuildStore, MemoryStore};

use crate::gateway::{
    ChannelSummary, GatewayError, ModerationGateway, RoleSummary, VerificationGateway,
};

pub const BOT_ID: serenity::UserId = serenity::UserId::new(999);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Ban { user: serenity::UserId, reason: String },
    Kick { user: serenity::UserId, reason: String },
    Unban { user: serenity::UserId },
    CreateRole { name: String },
    CreateCategory { name: String },
    CreateTextChannel { name: String, parent: serenity::ChannelId },
    SetOverwrite { channel: serenity::ChannelId },
    AddRole { user: serenity::UserId, role: serenity::RoleId },
    RemoveRole { user: serenity::UserId, role: serenity::RoleId },
    NotifyVerified { user: serenity::UserId },
}

impl Call {
    pub fn is_role_operation(&self) -> bool {
        matches!(self, Self::AddRole { .. } | Self::RemoveRole { .. })
    }
}

/// Failure the fake should return from a given kind of request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failure {
    MissingPermissions,
    NotFound,
}

impl Failure {
    fn into_error(self) -> GatewayError {
        match self {
            Self::MissingPermissions => GatewayError::MissingPermissions,
            Self::NotFound => GatewayError::NotFound,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeGateway {
    pub calls: Mutex<Vec<Call>>,
    pub roles: Mutex<Vec<RoleSummary>>,
    pub channels: Mutex<Vec<ChannelSummary>>,
    pub member_roles: Mutex<Vec<serenity::RoleId>>,
    pub created_overwrites: Mutex<Vec<serenity::PermissionOverwrite>>,
    pub ban_failure: Option<Failure>,
    pub kick_failure: Option<Failure>,
    pub unban_failure: Option<Failure>,
    pub notify_failure: Option<Failure>,
    pub overwrite_failures: Vec<serenity::ChannelId>,
    pub next_id: AtomicU64,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(5000),
            ..Self::default()
        }
    }

    pub async fn with_roles(self, roles: &[(u64, &str)]) -> Self {
        self.roles.lock().await.extend(roles.iter().map(|(id, name)| RoleSummary {
            id: serenity::RoleId::new(*id),
            name: (*name).to_owned(),
        }));
        self
    }

    pub async fn with_text_channels(self, channels: &[(u64, &str)]) -> Self {
        self.channels
            .lock()
            .await
            .extend(channels.iter().map(|(id, name)| ChannelSummary {
                id: serenity::ChannelId::new(*id),
                name: (*name).to_owned(),
                kind: serenity::ChannelType::Text,
            }));
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    fn fresh_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed).max(1)
    }

    async fn push_channel(&self, name: &str, kind: serenity::ChannelType) -> ChannelSummary {
        let channel = ChannelSummary {
            id: serenity::ChannelId::new(self.fresh_id()),
            name: name.to_owned(),
            kind,
        };
        self.channels.lock().await.push(channel.clone());
        channel
    }
}

fn fail_with(failure: Option<Failure>) -> Result<(), GatewayError> {
    failure.map_or(Ok(()), |failure| Err(failure.into_error()))
}

#[async_trait]
impl ModerationGateway for FakeGateway {
    async fn ban(
        &self,
        _guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.record(Call::Ban {
            user: user_id,
            reason: reason.to_owned(),
        })
        .await;
        fail_with(self.ban_failure)
    }

    async fn kick(
        &self,
        _guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.record(Call::Kick {
            user: user_id,
            reason: reason.to_owned(),
        })
        .await;
        fail_with(self.kick_failure)
    }

    async fn unban(
        &self,
        _guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), GatewayError> {
        self.record(Call::Unban { user: user_id }).await;
        fail_with(self.unban_failure)
    }
}

#[async_trait]
impl VerificationGateway for FakeGateway {
    fn bot_id(&self) -> serenity::UserId {
        BOT_ID
    }

    async fn roles(&self, _guild_id: serenity::GuildId) -> Result<Vec<RoleSummary>, GatewayError> {
        Ok(self.roles.lock().await.clone())
    }

    async fn create_role(
        &self,
        _guild_id: serenity::GuildId,
        name: &str,
        _colour: u32,
        _reason: &str,
    ) -> Result<RoleSummary, GatewayError> {
        self.record(Call::CreateRole {
            name: name.to_owned(),
        })
        .await;
        let role = RoleSummary {
            id: serenity::RoleId::new(self.fresh_id()),
            name: name.to_owned(),
        };
        self.roles.lock().await.push(role.clone());
        Ok(role)
    }

    async fn channels(
        &self,
        _guild_id: serenity::GuildId,
    ) -> Result<Vec<ChannelSummary>, GatewayError> {
        Ok(self.channels.lock().await.clone())
    }

    async fn create_category(
        &self,
        _guild_id: serenity::GuildId,
        name: &str,
        _reason: &str,
    ) -> Result<ChannelSummary, GatewayError> {
        self.record(Call::CreateCategory {
            name: name.to_owned(),
        })
        .await;
        Ok(self.push_channel(name, serenity::ChannelType::Category).await)
    }

    async fn create_text_channel(
        &self,
        _guild_id: serenity::GuildId,
        name: &str,
        parent: serenity::ChannelId,
        overwrites: Vec<serenity::PermissionOverwrite>,
        _reason: &str,
    ) -> Result<ChannelSummary, GatewayError> {
        self.record(Call::CreateTextChannel {
            name: name.to_owned(),
            parent,
        })
        .await;
        self.created_overwrites.lock().await.extend(overwrites);
        Ok(self.push_channel(name, serenity::ChannelType::Text).await)
    }

    async fn set_overwrite(
        &self,
        channel_id: serenity::ChannelId,
        _overwrite: serenity::PermissionOverwrite,
    ) -> Result<(), GatewayError> {
        self.record(Call::SetOverwrite {
            channel: channel_id,
        })
        .await;
        if self.overwrite_failures.contains(&channel_id) {
            return Err(GatewayError::MissingPermissions);
        }
        Ok(())
    }

    async fn member_roles(
        &self,
        _guild_id: serenity::GuildId,
        _user_id: serenity::UserId,
    ) -> Result<Vec<serenity::RoleId>, GatewayError> {
        Ok(self.member_roles.lock().await.clone())
    }

    async fn add_role(
        &self,
        _guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        _reason: &str,
    ) -> Result<(), GatewayError> {
        self.record(Call::AddRole {
            user: user_id,
            role: role_id,
        })
        .await;
        self.member_roles.lock().await.push(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        _reason: &str,
    ) -> Result<(), GatewayError> {
        self.record(Call::RemoveRole {
            user: user_id,
            role: role_id,
        })
        .await;
        self.member_roles.lock().await.retain(|role| *role != role_id);
        Ok(())
    }

    async fn notify_verified(
        &self,
        _guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), GatewayError> {
        self.record(Call::NotifyVerified { user: user_id }).await;
        fail_with(self.notify_failure)
    }
}

/// `MemoryStore` whose warning reset always fails.
#[derive(Debug, Default)]
pub struct FailingResetStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl GuildStore for FailingResetStore {
    async fn find(&self, guild_id: Snowflake) -> anyhow::Result<Option<GuildConfig>> {
        self.inner.find(guild_id).await
    }

    async fn load(&self, guild_id: Snowflake) -> anyhow::Result<GuildConfig> {
        self.inner.load(guild_id).await
    }

    async fn save(&self, guild_id: Snowflake, update: GuildConfigUpdate) -> anyhow::Result<()> {
        self.inner.save(guild_id, update).await
    }

    async fn append_warning(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        warning: Warning,
    ) -> anyhow::Result<WarnTally> {
        self.inner.append_warning(guild_id, user_id, warning).await
    }

    async fn take_warnings(
        &self,
        _guild_id: Snowflake,
        _user_id: Snowflake,
    ) -> anyhow::Result<usize> {
        anyhow::bail!("connection reset while clearing warnings")
    }

    async fn find_verification(
        &self,
        guild_id: Snowflake,
    ) -> anyhow::Result<Option<VerificationRecord>> {
        self.inner.find_verification(guild_id).await
    }

    async fn append_verification_log(&self, entry: VerificationLogEntry) -> anyhow::Result<()> {
        self.inner.append_verification_log(entry).await
    }

    async fn verification_log(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> anyhow::Result<Vec<VerificationLogEntry>> {
        self.inner.verification_log(guild_id, user_id).await
    }

    async fn guild_stats(&self, guild_id: Snowflake) -> anyhow::Result<GuildStats> {
        self.inner.guild_stats(guild_id).await
    }
}
