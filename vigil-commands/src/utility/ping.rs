use std::time::Instant;

use vigil_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check that the bot is responsive.",
    category: "utility",
    usage: "/ping",
};

#[poise::command(slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pong!").await?;
    let elapsed = started.elapsed().as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!("Pong! ({elapsed} ms)")),
        )
        .await?;
    Ok(())
}
