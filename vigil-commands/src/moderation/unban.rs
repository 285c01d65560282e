use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::moderation::embeds::unbanned_embed;
use crate::moderation::report_moderation_error;
use crate::replies::{guild_only_message, require_permission, send_ephemeral_error};
use vigil_core::ids::user_id as to_user_id;
use vigil_core::moderation::Moderator;
use vigil_core::{Context, Error};
use vigil_database::model::Snowflake;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Lift a ban by user ID.",
    category: "moderation",
    usage: "/unban <user_id>",
};

#[poise::command(
    slash_command,
    category = "Moderation",
    default_member_permissions = "BAN_MEMBERS"
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "The ID of the user to unban"] user_id: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::BAN_MEMBERS).await? {
        return Ok(());
    }

    let Some(target_id) = Snowflake::parse_reference(&user_id).map(to_user_id) else {
        send_ephemeral_error(ctx, "Please provide a valid user ID.").await?;
        return Ok(());
    };

    let gateway = SerenityGateway::from_context(ctx);
    let moderator = Moderator::new(ctx.data().store.as_ref(), &gateway);

    if let Err(source) = moderator.unban(guild_id, target_id).await {
        return report_moderation_error(ctx, "unban", source).await;
    }

    let name = match target_id.to_user(ctx.http()).await {
        Ok(user) => user.name,
        Err(_) => format!("User {}", target_id.get()),
    };
    ctx.send(poise::CreateReply::default().embed(unbanned_embed(&name, target_id)))
        .await?;
    Ok(())
}
