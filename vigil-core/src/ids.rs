//! Conversions between serenity's typed ids and stored [`Snowflake`]s.

use std::num::NonZeroU64;

use poise::serenity_prelude as serenity;
use vigil_database::model::Snowflake;

pub trait ToSnowflake {
    fn to_snowflake(self) -> Snowflake;
}

macro_rules! impl_to_snowflake {
    ($($id:ty),* $(,)?) => {
        $(
            impl ToSnowflake for $id {
                fn to_snowflake(self) -> Snowflake {
                    Snowflake::from(NonZeroU64::from(self))
                }
            }
        )*
    };
}

impl_to_snowflake!(
    serenity::GuildId,
    serenity::UserId,
    serenity::RoleId,
    serenity::ChannelId,
);

pub fn role_id(id: Snowflake) -> serenity::RoleId {
    serenity::RoleId::new(id.get())
}

pub fn user_id(id: Snowflake) -> serenity::UserId {
    serenity::UserId::new(id.get())
}

/// The @everyone role shares its id with the guild.
pub fn everyone_role(guild_id: serenity::GuildId) -> serenity::RoleId {
    serenity::RoleId::new(guild_id.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_snowflake() {
        let role = serenity::RoleId::new(123);
        assert_eq!(role.to_snowflake().get(), 123);
        assert_eq!(role_id(role.to_snowflake()), role);
        assert_eq!(everyone_role(serenity::GuildId::new(5)), serenity::RoleId::new(5));
    }
}
