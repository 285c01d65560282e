use poise::serenity_prelude as serenity;
use tracing::info;

use super::{ModerationError, Moderator, Participant, check_target};
use crate::gateway::GatewayError;

impl Moderator<'_> {
    pub async fn kick(
        &self,
        guild_id: serenity::GuildId,
        actor: &Participant,
        target: &Participant,
        reason: &str,
    ) -> Result<(), ModerationError> {
        check_target(actor, target)?;

        let audit_reason = format!("{reason} | Kicked by {}", actor.name);
        self.gateway
            .kick(guild_id, target.user_id, &audit_reason)
            .await?;

        info!(
            guild_id = guild_id.get(),
            user_id = target.user_id.get(),
            moderator_id = actor.user_id.get(),
            "member kicked"
        );
        Ok(())
    }

    pub async fn ban(
        &self,
        guild_id: serenity::GuildId,
        actor: &Participant,
        target: &Participant,
        reason: &str,
    ) -> Result<(), ModerationError> {
        check_target(actor, target)?;

        let audit_reason = format!("{reason} | Banned by {}", actor.name);
        self.gateway
            .ban(guild_id, target.user_id, &audit_reason)
            .await?;

        info!(
            guild_id = guild_id.get(),
            user_id = target.user_id.get(),
            moderator_id = actor.user_id.get(),
            "member banned"
        );
        Ok(())
    }

    /// Lift a ban. The user is usually not a member, so no rank check applies.
    pub async fn unban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<(), ModerationError> {
        match self.gateway.unban(guild_id, user_id).await {
            Ok(()) => {
                info!(guild_id = guild_id.get(), user_id = user_id.get(), "user unbanned");
                Ok(())
            }
            Err(GatewayError::NotFound) => Err(ModerationError::NotBanned),
            Err(source) => Err(source.into()),
        }
    }
}
