//! Platform gateway backed by serenity's HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use vigil_core::Context;
use vigil_core::gateway::{
    ChannelSummary, GatewayError, ModerationGateway, RoleSummary, VerificationGateway,
};

use crate::verification::embeds::verified_dm_embed;

#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<serenity::Http>,
    bot_id: serenity::UserId,
}

impl SerenityGateway {
    pub fn new(http: Arc<serenity::Http>, bot_id: serenity::UserId) -> Self {
        Self { http, bot_id }
    }

    pub fn from_context(ctx: Context<'_>) -> Self {
        Self::new(ctx.serenity_context().http.clone(), ctx.framework().bot_id)
    }

    fn http(&self) -> &serenity::Http {
        &self.http
    }
}

fn channel_summary(channel: serenity::GuildChannel) -> ChannelSummary {
    ChannelSummary {
        id: channel.id,
        name: channel.name,
        kind: channel.kind,
    }
}

#[async_trait]
impl ModerationGateway for SerenityGateway {
    async fn ban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), GatewayError> {
        guild_id
            .ban_with_reason(self.http(), user_id, 0, reason)
            .await?;
        Ok(())
    }

    async fn kick(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), GatewayError> {
        guild_id
            .kick_with_reason(self.http(), user_id, reason)
            .await?;
        Ok(())
    }

    async fn unban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), GatewayError> {
        guild_id.unban(self.http(), user_id).await?;
        Ok(())
    }
}

#[async_trait]
impl VerificationGateway for SerenityGateway {
    fn bot_id(&self) -> serenity::UserId {
        self.bot_id
    }

    async fn roles(&self, guild_id: serenity::GuildId) -> Result<Vec<RoleSummary>, GatewayError> {
        let roles = guild_id.roles(self.http()).await?;
        let mut summaries: Vec<RoleSummary> = roles
            .into_values()
            .map(|role| RoleSummary {
                id: role.id,
                name: role.name,
            })
            .collect();
        summaries.sort_by_key(|summary| summary.id);
        Ok(summaries)
    }

    async fn create_role(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        colour: u32,
        reason: &str,
    ) -> Result<RoleSummary, GatewayError> {
        let role = guild_id
            .create_role(
                self.http(),
                serenity::EditRole::new()
                    .name(name)
                    .colour(colour)
                    .audit_log_reason(reason),
            )
            .await?;
        Ok(RoleSummary {
            id: role.id,
            name: role.name,
        })
    }

    async fn channels(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<Vec<ChannelSummary>, GatewayError> {
        let channels = guild_id.channels(self.http()).await?;
        let mut summaries: Vec<ChannelSummary> =
            channels.into_values().map(channel_summary).collect();
        summaries.sort_by_key(|summary| summary.id);
        Ok(summaries)
    }

    async fn create_category(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        reason: &str,
    ) -> Result<ChannelSummary, GatewayError> {
        let category = guild_id
            .create_channel(
                self.http(),
                serenity::CreateChannel::new(name)
                    .kind(serenity::ChannelType::Category)
                    .audit_log_reason(reason),
            )
            .await?;
        Ok(channel_summary(category))
    }

    async fn create_text_channel(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        parent: serenity::ChannelId,
        overwrites: Vec<serenity::PermissionOverwrite>,
        reason: &str,
    ) -> Result<ChannelSummary, GatewayError> {
        let channel = guild_id
            .create_channel(
                self.http(),
                serenity::CreateChannel::new(name)
                    .kind(serenity::ChannelType::Text)
                    .category(parent)
                    .permissions(overwrites)
                    .audit_log_reason(reason),
            )
            .await?;
        Ok(channel_summary(channel))
    }

    async fn set_overwrite(
        &self,
        channel_id: serenity::ChannelId,
        overwrite: serenity::PermissionOverwrite,
    ) -> Result<(), GatewayError> {
        channel_id.create_permission(self.http(), overwrite).await?;
        Ok(())
    }

    async fn member_roles(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<Vec<serenity::RoleId>, GatewayError> {
        let member = guild_id.member(self.http(), user_id).await?;
        Ok(member.roles)
    }

    async fn add_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.http
            .add_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.http
            .remove_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn notify_verified(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), GatewayError> {
        let guild_name = match guild_id.to_partial_guild(self.http()).await {
            Ok(guild) => guild.name,
            Err(_) => format!("Server {}", guild_id.get()),
        };

        let dm_channel = user_id.create_dm_channel(self.http()).await?;
        dm_channel
            .send_message(
                self.http(),
                serenity::CreateMessage::new().embed(verified_dm_embed(&guild_name)),
            )
            .await?;
        Ok(())
    }
}
