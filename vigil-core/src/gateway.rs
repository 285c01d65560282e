//! Seams between the policy layer and the chat platform.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use thiserror::Error;

const MISSING_PERMISSIONS_CODE: isize = 50013;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("the bot is missing permissions for this request")]
    MissingPermissions,
    #[error("the requested resource was not found")]
    NotFound,
    #[error("platform request failed: {0}")]
    Request(#[source] Box<serenity::Error>),
}

impl From<serenity::Error> for GatewayError {
    fn from(source: serenity::Error) -> Self {
        match &source {
            serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
                if response.status_code.as_u16() == 403
                    || response.error.code == MISSING_PERMISSIONS_CODE =>
            {
                Self::MissingPermissions
            }
            serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
                if response.status_code.as_u16() == 404 =>
            {
                Self::NotFound
            }
            _ => Self::Request(Box::new(source)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleSummary {
    pub id: serenity::RoleId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelSummary {
    pub id: serenity::ChannelId,
    pub name: String,
    pub kind: serenity::ChannelType,
}

#[async_trait]
pub trait ModerationGateway: Send + Sync {
    async fn ban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), GatewayError>;

    async fn kick(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), GatewayError>;

    /// Fails with [`GatewayError::NotFound`] when the user is not banned.
    async fn unban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait VerificationGateway: Send + Sync {
    fn bot_id(&self) -> serenity::UserId;

    async fn roles(&self, guild_id: serenity::GuildId) -> Result<Vec<RoleSummary>, GatewayError>;

    async fn create_role(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        colour: u32,
        reason: &str,
    ) -> Result<RoleSummary, GatewayError>;

    async fn channels(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<Vec<ChannelSummary>, GatewayError>;

    async fn create_category(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        reason: &str,
    ) -> Result<ChannelSummary, GatewayError>;

    async fn create_text_channel(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        parent: serenity::ChannelId,
        overwrites: Vec<serenity::PermissionOverwrite>,
        reason: &str,
    ) -> Result<ChannelSummary, GatewayError>;

    async fn set_overwrite(
        &self,
        channel_id: serenity::ChannelId,
        overwrite: serenity::PermissionOverwrite,
    ) -> Result<(), GatewayError>;

    async fn member_roles(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<Vec<serenity::RoleId>, GatewayError>;

    async fn add_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        reason: &str,
    ) -> Result<(), GatewayError>;

    async fn remove_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        reason: &str,
    ) -> Result<(), GatewayError>;

    /// Tell the member privately that they were verified.
    async fn notify_verified(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), GatewayError>;
}
