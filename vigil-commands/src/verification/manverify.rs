use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::replies::{guild_only_message, require_permission};
use crate::verification::embeds::manually_verified_embed;
use crate::verification::report_verification_error;
use vigil_core::verification::Verifier;
use vigil_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "manverify",
    desc: "Manually verify a member, bypassing the website check.",
    category: "verification",
    usage: "/manverify <user>",
};

#[poise::command(
    slash_command,
    category = "Verification",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn manverify(
    ctx: Context<'_>,
    #[description = "The user to manually verify"] user: serenity::Member,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::ADMINISTRATOR).await? {
        return Ok(());
    }

    let data = ctx.data();
    let gateway = SerenityGateway::from_context(ctx);
    let verifier = Verifier::new(data.store.as_ref(), &gateway, &data.settings);

    match verifier
        .manual_verify(guild_id, user.user.id, ctx.author().id)
        .await
    {
        Ok(_) => {
            ctx.send(
                poise::CreateReply::default()
                    .embed(manually_verified_embed(&user.user, ctx.author().id)),
            )
            .await?;
            Ok(())
        }
        Err(source) => report_verification_error(ctx, source).await,
    }
}
