use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::moderation::embeds::max_warns_embed;
use crate::moderation::report_moderation_error;
use crate::replies::{guild_only_message, require_permission};
use vigil_core::moderation::Moderator;
use vigil_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "maxwarns",
    desc: "Set how many warnings trigger an automatic ban.",
    category: "moderation",
    usage: "/maxwarns <limit>",
};

#[poise::command(
    slash_command,
    category = "Moderation",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn maxwarns(
    ctx: Context<'_>,
    #[description = "Warnings before a ban"]
    #[min = 1]
    #[max = 100]
    limit: u32,
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

    match moderator.set_max_warns(guild_id, limit).await {
        Ok(previous) => {
            ctx.send(poise::CreateReply::default().embed(max_warns_embed(previous, limit)))
                .await?;
            Ok(())
        }
        Err(source) => report_moderation_error(ctx, "change the warning limit for", source).await,
    }
}
