use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::moderation::embeds::{cleared_embed, no_warnings_to_clear_message};
use crate::moderation::report_moderation_error;
use crate::replies::{guild_only_message, require_permission, send_ephemeral_error};
use vigil_core::moderation::Moderator;
use vigil_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "clearwarns",
    desc: "Clear every warning a member holds.",
    category: "moderation",
    usage: "/clearwarns <user>",
};

#[poise::command(
    slash_command,
    category = "Moderation",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn clearwarns(
    ctx: Context<'_>,
    #[description = "The user to clear warnings for"] user: serenity::User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::ADMINISTRATOR).await? {
        return Ok(());
    }

    let gateway = SerenityGateway::from_context(ctx);
    let moderator = Moderator::new(ctx.data().store.as_ref(), &gateway);

    match moderator.clear_warnings(guild_id, user.id).await {
        Ok(0) => send_ephemeral_error(ctx, no_warnings_to_clear_message(user.id)).await,
        Ok(cleared) => {
            ctx.send(poise::CreateReply::default().embed(cleared_embed(user.id, cleared)))
                .await?;
            Ok(())
        }
        Err(source) => report_moderation_error(ctx, "clear warnings for", source).await,
    }
}
