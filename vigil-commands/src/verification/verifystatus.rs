use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::replies::{guild_only_message, require_permission};
use crate::verification::embeds::status_embed;
use crate::verification::report_verification_error;
use vigil_core::verification::Verifier;
use vigil_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "verifystatus",
    desc: "Show whether a member is verified and when.",
    category: "verification",
    usage: "/verifystatus <user>",
};

#[poise::command(
    slash_command,
    category = "Verification",
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn verifystatus(
    ctx: Context<'_>,
    #[description = "The user to look up"] user: serenity::User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::MODERATE_MEMBERS).await? {
        return Ok(());
    }

    let data = ctx.data();
    let gateway = SerenityGateway::from_context(ctx);
    let verifier = Verifier::new(data.store.as_ref(), &gateway, &data.settings);

    match verifier.status(guild_id, user.id).await {
        Ok(status) => {
            let display_name = user.global_name.clone().unwrap_or_else(|| user.name.clone());
            ctx.send(
                poise::CreateReply::default()
                    .embed(status_embed(&display_name, &status))
                    .ephemeral(true),
            )
            .await?;
            Ok(())
        }
        Err(source) => report_verification_error(ctx, source).await,
    }
}
