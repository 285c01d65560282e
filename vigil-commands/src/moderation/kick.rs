use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::moderation::embeds::kick_embed;
use crate::moderation::participants::resolve_participants;
use crate::moderation::report_moderation_error;
use crate::replies::{guild_only_message, require_permission};
use vigil_core::moderation::Moderator;
use vigil_core::{Context, Error};
use vigil_utils::formatting::normalize_reason;

pub const META: CommandMeta = CommandMeta {
    name: "kick",
    desc: "Kick a member from the server.",
    category: "moderation",
    usage: "/kick <user> [reason]",
};

#[poise::command(
    slash_command,
    category = "Moderation",
    default_member_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "The user to kick"] user: serenity::Member,
    #[description = "Reason for the kick"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::KICK_MEMBERS).await? {
        return Ok(());
    }

    let reason = normalize_reason(reason);
    let (actor, target) = resolve_participants(ctx, guild_id, &user).await?;
    let gateway = SerenityGateway::from_context(ctx);
    let moderator = Moderator::new(ctx.data().store.as_ref(), &gateway);

    match moderator.kick(guild_id, &actor, &target, &reason).await {
        Ok(()) => {
            ctx.send(
                poise::CreateReply::default().embed(kick_embed(
                    &user.user,
                    ctx.author().id,
                    &reason,
                )),
            )
            .await?;
            Ok(())
        }
        Err(source) => report_moderation_error(ctx, "kick", source).await,
    }
}
