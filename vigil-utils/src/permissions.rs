use std::cmp::Reverse;

use poise::serenity_prelude as serenity;

/// Convert a permission bitset into a sorted display list.
///
/// If `ADMINISTRATOR` is present, only `ADMINISTRATOR` is returned because
/// it implicitly grants all permissions.
pub fn permission_names(perms: serenity::Permissions) -> Vec<String> {
    if perms.contains(serenity::Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms
        .iter_names()
        .map(|(name, _flag)| name.to_owned())
        .collect();
    names.sort_unstable();
    names
}

/// Resolve a member's effective guild-level permissions from their roles.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    let resolved = guild
        .roles
        .values()
        .filter(|role| role.id == everyone_role_id || member.roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |acc, role| acc | role.permissions);

    Ok(resolved)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// The member's top role and its position: highest position first, and
/// on equal positions the older role (lower id). `None` when the member
/// holds only @everyone.
pub fn top_role<I>(
    member_roles: &[serenity::RoleId],
    positions: I,
) -> Option<(serenity::RoleId, u16)>
where
    I: IntoIterator<Item = (serenity::RoleId, u16)>,
{
    positions
        .into_iter()
        .filter(|(role_id, _)| member_roles.contains(role_id))
        .max_by_key(|&(role_id, position)| (position, Reverse(role_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_collapses_the_list() {
        let perms = serenity::Permissions::ADMINISTRATOR | serenity::Permissions::BAN_MEMBERS;
        assert_eq!(permission_names(perms), ["ADMINISTRATOR"]);
    }

    #[test]
    fn names_are_sorted() {
        let perms = serenity::Permissions::KICK_MEMBERS | serenity::Permissions::BAN_MEMBERS;
        assert_eq!(permission_names(perms), ["BAN_MEMBERS", "KICK_MEMBERS"]);
    }

    #[test]
    fn top_role_is_the_highest_held_position() {
        let role = serenity::RoleId::new;
        let positions = [(role(1), 0), (role(2), 4), (role(3), 9), (role(4), 6)];

        assert_eq!(top_role(&[role(2), role(4)], positions), Some((role(4), 6)));
        assert_eq!(top_role(&[], positions), None);
        assert_eq!(top_role(&[role(3)], positions), Some((role(3), 9)));
    }

    #[test]
    fn equal_positions_prefer_the_older_role() {
        let role = serenity::RoleId::new;
        let positions = [(role(20), 5), (role(10), 5), (role(30), 2)];

        assert_eq!(
            top_role(&[role(20), role(10), role(30)], positions),
            Some((role(10), 5))
        );
    }
}
