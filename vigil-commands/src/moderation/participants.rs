use poise::serenity_prelude as serenity;

use vigil_core::moderation::{Participant, Rank};
use vigil_core::{Context, Error};
use vigil_utils::permissions::top_role;

/// A member's standing in an already fetched guild, with the owner above everyone.
fn guild_rank(
    guild: &serenity::PartialGuild,
    user_id: serenity::UserId,
    member_roles: &[serenity::RoleId],
) -> Rank {
    if guild.owner_id == user_id {
        return Rank::Owner;
    }

    top_role(
        member_roles,
        guild.roles.values().map(|role| (role.id, role.position)),
    )
    .map_or(Rank::Everyone, |(role_id, position)| {
        Rank::top_role(role_id, position)
    })
}

fn participant(
    guild: &serenity::PartialGuild,
    user: &serenity::User,
    roles: &[serenity::RoleId],
) -> Participant {
    Participant {
        user_id: user.id,
        name: user.name.clone(),
        is_bot: user.bot,
        rank: guild_rank(guild, user.id, roles),
    }
}

/// Resolve the invoker and the target member against the guild's role hierarchy.
pub async fn resolve_participants(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    target: &serenity::Member,
) -> Result<(Participant, Participant), Error> {
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let actor_member = guild_id.member(ctx.http(), ctx.author().id).await?;

    Ok((
        participant(&guild, ctx.author(), &actor_member.roles),
        participant(&guild, &target.user, &target.roles),
    ))
}
