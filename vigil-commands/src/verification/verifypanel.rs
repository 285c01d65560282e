use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::replies::{guild_only_message, require_permission};
use crate::verification::embeds::{panel_components, panel_embed, setup_complete_embed};
use crate::verification::report_verification_error;
use vigil_core::verification::Verifier;
use vigil_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "verifypanel",
    desc: "Set up verification roles and channel, then post the verify panel.",
    category: "verification",
    usage: "/verifypanel",
};

#[poise::command(
    slash_command,
    category = "Verification",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn verifypanel(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_permission(ctx, guild_id, serenity::Permissions::ADMINISTRATOR).await? {
        return Ok(());
    }

    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let gateway = SerenityGateway::from_context(ctx);
    let verifier = Verifier::new(data.store.as_ref(), &gateway, &data.settings);

    let report = match verifier.setup(guild_id).await {
        Ok(report) => report,
        Err(source) => return report_verification_error(ctx, source).await,
    };

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let verification_url = data.settings.verification_url(guild_id);
    report
        .verify_channel
        .send_message(
            ctx.http(),
            serenity::CreateMessage::new()
                .embed(panel_embed(&guild.name, guild.icon_url()))
                .components(panel_components(&verification_url)),
        )
        .await?;

    info!(
        guild_id = guild_id.get(),
        channel_id = report.verify_channel.get(),
        "verification panel posted"
    );

    ctx.send(
        poise::CreateReply::default()
            .embed(setup_complete_embed(&report))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
