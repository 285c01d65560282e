use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gateway::SerenityGateway;
use crate::moderation::embeds::{no_warnings_embed, warning_lines, warnings_summary};
use crate::moderation::report_moderation_error;
use crate::replies::guild_only_message;
use vigil_core::moderation::Moderator;
use vigil_core::{Context, Error};
use vigil_utils::formatting::chunk_lines;
use vigil_utils::pagination::paginate_embed_pages;

pub const META: CommandMeta = CommandMeta {
    name: "warnings",
    desc: "Show a member's warnings.",
    category: "moderation",
    usage: "/warnings [user]",
};

const WARNINGS_PER_PAGE: usize = 5;

#[poise::command(slash_command, category = "Moderation")]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "The user to check warnings for"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let user = user.unwrap_or_else(|| ctx.author().clone());
    let display_name = user.global_name.clone().unwrap_or_else(|| user.name.clone());

    let gateway = SerenityGateway::from_context(ctx);
    let moderator = Moderator::new(ctx.data().store.as_ref(), &gateway);
    let list = match moderator.list_warnings(guild_id, user.id).await {
        Ok(list) => list,
        Err(source) => return report_moderation_error(ctx, "view warnings for", source).await,
    };

    if list.warnings.is_empty() {
        ctx.send(poise::CreateReply::default().embed(no_warnings_embed(&display_name)))
            .await?;
        return Ok(());
    }

    let summary = warnings_summary(&list);
    let pages: Vec<String> = chunk_lines(&warning_lines(&list), WARNINGS_PER_PAGE)
        .into_iter()
        .map(|page| format!("{summary}\n\n{page}"))
        .collect();

    paginate_embed_pages(
        ctx,
        &format!("⚠️ Warnings for {display_name}"),
        &pages,
        1,
        false,
    )
    .await?;
    Ok(())
}
