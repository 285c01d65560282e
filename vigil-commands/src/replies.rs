use poise::serenity_prelude as serenity;

use vigil_core::{Context, Error};
use vigil_utils::embed::error_embed;
use vigil_utils::permissions::{has_user_permission, permission_names};

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn missing_permission_message(required: serenity::Permissions) -> String {
    format!(
        "You need the `{}` permission to use this command.",
        permission_names(required).join(", ")
    )
}

pub async fn send_ephemeral_error(ctx: Context<'_>, message: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .embed(error_embed("Error", message))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Check the invoker's permission, telling them privately when it is missing.
pub async fn require_permission(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> Result<bool, Error> {
    if has_user_permission(ctx.http(), guild_id, ctx.author().id, required).await? {
        return Ok(true);
    }

    send_ephemeral_error(ctx, missing_permission_message(required)).await?;
    Ok(false)
}
