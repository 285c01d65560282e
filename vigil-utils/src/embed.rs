use poise::serenity_prelude as serenity;

pub const SUCCESS_COLOR: u32 = 0x00_ff_00;
pub const ERROR_COLOR: u32 = 0xff_00_00;
pub const INFO_COLOR: u32 = 0x34_98_db;
pub const WARNING_COLOR: u32 = 0xff_a5_00;

fn titled(title: &str, description: impl Into<String>, color: u32) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .description(description)
        .color(color)
}

pub fn success_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    titled(title, description, SUCCESS_COLOR)
}

pub fn error_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    titled(title, description, ERROR_COLOR)
}

pub fn info_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    titled(title, description, INFO_COLOR)
}

/// Build a paginated embed with a `Page x/y` footer when there is more than one page.
pub fn build_paginated_embed(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
) -> serenity::CreateEmbed {
    let page = page.max(1);
    let total_pages = total_pages.max(1);
    let embed = info_embed(title, description);

    if total_pages > 1 {
        embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Page {page}/{total_pages}"
        )))
    } else {
        embed
    }
}
