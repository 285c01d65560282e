//! Verification gate: role and channel setup, manual verification, and
//! the unverified role handed to members when they join.

mod membership;
mod setup;

use poise::serenity_prelude as serenity;
use thiserror::Error;
use vigil_database::GuildStore;

use crate::BotSettings;
use crate::gateway::{GatewayError, VerificationGateway};
use crate::ids::everyone_role;

pub use membership::{JoinOutcome, ManualVerification, VerificationStatus};
pub use setup::SetupReport;

pub const UNVERIFIED_ROLE_COLOUR: u32 = 0xe74c3c;
pub const VERIFIED_ROLE_COLOUR: u32 = 0x2ecc71;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("verification is not set up in this server")]
    NotConfigured,
    #[error("the verified role no longer exists")]
    VerifiedRoleMissing,
    #[error("the bot is missing permissions for that action")]
    BotMissingPermissions,
    #[error(transparent)]
    Platform(GatewayError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<GatewayError> for VerificationError {
    fn from(source: GatewayError) -> Self {
        match source {
            GatewayError::MissingPermissions => Self::BotMissingPermissions,
            other => Self::Platform(other),
        }
    }
}

pub struct Verifier<'a> {
    store: &'a dyn GuildStore,
    gateway: &'a dyn VerificationGateway,
    settings: &'a BotSettings,
}

impl<'a> Verifier<'a> {
    pub fn new(
        store: &'a dyn GuildStore,
        gateway: &'a dyn VerificationGateway,
        settings: &'a BotSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            settings,
        }
    }
}

/// Overwrites for a freshly created verification channel: hidden from
/// everyone and verified members, read-only for unverified members, and
/// fully usable by the bot.
pub fn verify_channel_overwrites(
    guild_id: serenity::GuildId,
    unverified_role: serenity::RoleId,
    verified_role: serenity::RoleId,
    bot_id: serenity::UserId,
) -> Vec<serenity::PermissionOverwrite> {
    use serenity::{PermissionOverwrite, PermissionOverwriteType, Permissions};

    vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            kind: PermissionOverwriteType::Role(everyone_role(guild_id)),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL,
            deny: Permissions::SEND_MESSAGES,
            kind: PermissionOverwriteType::Role(unverified_role),
        },
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(verified_role),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::MANAGE_MESSAGES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(bot_id),
        },
    ]
}

/// Overwrite hiding a channel from unverified members.
pub fn restrict_unverified(unverified_role: serenity::RoleId) -> serenity::PermissionOverwrite {
    serenity::PermissionOverwrite {
        allow: serenity::Permissions::empty(),
        deny: serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES,
        kind: serenity::PermissionOverwriteType::Role(unverified_role),
    }
}
