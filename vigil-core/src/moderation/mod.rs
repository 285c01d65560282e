//! Warning accumulation, escalation and direct member actions.
//!
//! Every operation runs its target checks before touching the store or
//! the platform, so a rejected call leaves the guild document as it was.

mod actions;
mod warnings;

use std::cmp::Reverse;

use poise::serenity_prelude as serenity;
use thiserror::Error;
use vigil_database::GuildStore;

use crate::gateway::{GatewayError, ModerationGateway};

pub use warnings::{Escalation, WarnOutcome, WarningList};

/// Standing in the guild's role hierarchy, ordered lowest first.
///
/// Roles compare by position; at equal positions the older role (lower id)
/// ranks higher, the same order the client uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    /// Holds no role besides @everyone.
    Everyone,
    TopRole {
        position: u16,
        age: Reverse<serenity::RoleId>,
    },
    Owner,
}

impl Rank {
    pub fn top_role(role_id: serenity::RoleId, position: u16) -> Self {
        Self::TopRole {
            position,
            age: Reverse(role_id),
        }
    }
}

/// One side of a moderation action as seen by the policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub user_id: serenity::UserId,
    pub name: String,
    pub is_bot: bool,
    pub rank: Rank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("bots cannot be targeted")]
    BotTarget,
    #[error("you cannot target yourself")]
    SelfTarget,
    #[error("the target's highest role is not below yours")]
    InsufficientRank,
}

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("the bot is missing permissions for that action")]
    BotMissingPermissions,
    #[error("that user is not banned")]
    NotBanned,
    #[error("the warning threshold must be at least 1")]
    InvalidThreshold,
    #[error(transparent)]
    Platform(GatewayError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<GatewayError> for ModerationError {
    fn from(source: GatewayError) -> Self {
        match source {
            GatewayError::MissingPermissions => Self::BotMissingPermissions,
            other => Self::Platform(other),
        }
    }
}

/// Strict hierarchy: an actor may only act on members ranked below them.
pub fn check_target(actor: &Participant, target: &Participant) -> Result<(), Rejection> {
    if target.is_bot {
        return Err(Rejection::BotTarget);
    }
    if target.user_id == actor.user_id {
        return Err(Rejection::SelfTarget);
    }
    if target.rank >= actor.rank {
        return Err(Rejection::InsufficientRank);
    }
    Ok(())
}

pub struct Moderator<'a> {
    store: &'a dyn GuildStore,
    gateway: &'a dyn ModerationGateway,
}

impl<'a> Moderator<'a> {
    pub fn new(store: &'a dyn GuildStore, gateway: &'a dyn ModerationGateway) -> Self {
        Self { store, gateway }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use poise::serenity_prelude as serenity;

    use super::{Participant, Rank};

    pub const GUILD: serenity::GuildId = serenity::GuildId::new(1000);

    /// Members at the same position share one role.
    pub fn member(id: u64, position: u16) -> Participant {
        let role = serenity::RoleId::new(100_000 + u64::from(position));
        Participant {
            user_id: serenity::UserId::new(id),
            name: format!("user{id}"),
            is_bot: false,
            rank: Rank::top_role(role, position),
        }
    }

    pub fn actor() -> Participant {
        member(1, 10)
    }

    pub fn target() -> Participant {
        member(2, 1)
    }
}
