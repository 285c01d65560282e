use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::server_stats_embed;
use crate::replies::{guild_only_message, require_permission};
use vigil_core::ids::ToSnowflake;
use vigil_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "serverstats",
    desc: "Show verification and warning totals for this server.",
    category: "moderation",
    usage: "/serverstats",
};

#[poise::command(
    slash_command,
    category = "Moderation",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn serverstats(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let stats = ctx.data().store.guild_stats(guild_id.to_snowflake()).await?;
    let guild_name = match guild_id.to_partial_guild(ctx.http()).await {
        Ok(guild) => guild.name,
        Err(_) => format!("Server {}", guild_id.get()),
    };

    ctx.send(poise::CreateReply::default().embed(server_stats_embed(&guild_name, stats)))
        .await?;
    Ok(())
}
