use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::embed::build_paginated_embed;

pub const PAGINATION_TIMEOUT_SECS: u64 = 60 * 3;

struct PageButtons {
    prev: String,
    next: String,
}

impl PageButtons {
    fn for_invocation(invocation_id: u64) -> Self {
        Self {
            prev: format!("{invocation_id}_prev"),
            next: format!("{invocation_id}_next"),
        }
    }

    fn row(&self, current_page: usize, total_pages: usize) -> Vec<serenity::CreateActionRow> {
        vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&self.prev)
                .label("Prev")
                .disabled(current_page == 0)
                .style(serenity::ButtonStyle::Secondary),
            serenity::CreateButton::new(&self.next)
                .label("Next")
                .disabled(current_page + 1 >= total_pages)
                .style(serenity::ButtonStyle::Secondary),
        ])]
    }
}

/// Send `pages` as one embed with Prev/Next buttons that only the invoker
/// can press, opening on the 1-based `start_page`. Buttons are removed once
/// the collector times out.
pub async fn paginate_embed_pages<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
    ephemeral: bool,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if pages.is_empty() {
        return Ok(());
    }

    let total_pages = pages.len();
    let mut current_page = start_page.clamp(1, total_pages) - 1;
    let render = |page: usize| build_paginated_embed(title, pages[page].clone(), page + 1, total_pages);

    if total_pages == 1 {
        ctx.send(
            poise::CreateReply::default()
                .embed(render(current_page))
                .ephemeral(ephemeral),
        )
        .await?;
        return Ok(());
    }

    let buttons = PageButtons::for_invocation(ctx.id());
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(render(current_page))
                .components(buttons.row(current_page, total_pages))
                .ephemeral(ephemeral),
        )
        .await?;
    let message_id = reply.message().await?.id;

    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .filter({
            let author_id = ctx.author().id;
            let (prev, next) = (buttons.prev.clone(), buttons.next.clone());
            move |interaction| {
                interaction.user.id == author_id
                    && interaction.message.id == message_id
                    && (interaction.data.custom_id == prev || interaction.data.custom_id == next)
            }
        })
        .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
        .await
    {
        if press.data.custom_id == buttons.next {
            current_page = (current_page + 1).min(total_pages - 1);
        } else {
            current_page = current_page.saturating_sub(1);
        }

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(render(current_page))
                        .components(buttons.row(current_page, total_pages)),
                ),
            )
            .await?;
    }

    if let Err(source) = reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .embed(render(current_page))
                .components(vec![]),
        )
        .await
    {
        debug!(?source, "failed to strip pagination buttons");
    }

    Ok(())
}
