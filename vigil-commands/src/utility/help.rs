use crate::utility::embeds::{
    grouped_help_description, page_out_of_range_message, unknown_category_message,
};
use crate::{COMMANDS, CommandMeta};
use vigil_core::{Context, Error};
use vigil_utils::pagination::paginate_embed_pages;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "List every available command.",
    category: "utility",
    usage: "/help [page|category]",
};

const HELP_COMMANDS_PER_PAGE: usize = 10;

#[poise::command(slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Page number or category"] query: Option<String>,
) -> Result<(), Error> {
    let query = query.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));
    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.to_ascii_lowercase()),
        _ => None,
    };

    let categories = categories();
    if let Some(wanted) = category.as_deref()
        && !categories.contains(&wanted)
    {
        ctx.say(unknown_category_message(wanted, &categories)).await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total)).await?;
        return Ok(());
    }

    let pages = commands
        .chunks(HELP_COMMANDS_PER_PAGE)
        .map(grouped_help_description)
        .collect::<Vec<_>>();
    paginate_embed_pages(ctx, "Available Commands", &pages, requested_page, true).await?;
    Ok(())
}

fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn total_pages(total_items: usize, per_page: usize) -> usize {
    total_items.div_ceil(per_page.max(1)).max(1)
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| category.is_none_or(|wanted| cmd.category == wanted))
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}
