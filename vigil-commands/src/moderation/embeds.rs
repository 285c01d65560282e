use poise::serenity_prelude as serenity;

use vigil_core::moderation::{Escalation, ModerationError, Rejection, WarnOutcome, WarningList};
use vigil_database::model::GuildStats;
use vigil_utils::embed::{ERROR_COLOR, INFO_COLOR, WARNING_COLOR, info_embed, success_embed};
use vigil_utils::formatting::{format_tally, sanitize_mentions, truncate};
use vigil_utils::time::{TimestampStyle, discord_timestamp};

const FIELD_VALUE_LIMIT: usize = 1024;

pub fn rejection_message(action: &str, rejection: Rejection) -> String {
    match rejection {
        Rejection::BotTarget => format!("You cannot {action} bots!"),
        Rejection::SelfTarget => format!("You cannot {action} yourself!"),
        Rejection::InsufficientRank => {
            format!("You cannot {action} users with equal or higher roles!")
        }
    }
}

/// User-facing text for outcomes the invoker can act on. `None` means the
/// failure is unexpected and belongs to the framework error handler.
pub fn moderation_error_message(action: &str, error: &ModerationError) -> Option<String> {
    match error {
        ModerationError::Rejected(rejection) => Some(rejection_message(action, *rejection)),
        ModerationError::BotMissingPermissions => {
            Some(format!("I don't have permission to {action} this user!"))
        }
        ModerationError::NotBanned => Some("User not found or not banned!".to_owned()),
        ModerationError::InvalidThreshold => {
            Some("The warning limit must be at least 1.".to_owned())
        }
        ModerationError::Platform(_) | ModerationError::Store(_) => None,
    }
}

fn reason_field(reason: &str) -> String {
    truncate(&sanitize_mentions(reason), FIELD_VALUE_LIMIT)
}

fn user_field(user: &serenity::User) -> String {
    format!("<@{}> ({})", user.id.get(), user.id.get())
}

pub fn action_embed(
    title: &str,
    color: u32,
    target: &serenity::User,
    moderator_id: serenity::UserId,
    reason: &str,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(color)
        .field("User", user_field(target), true)
        .field("Moderator", format!("<@{}>", moderator_id.get()), true)
        .field("Reason", reason_field(reason), false)
        .timestamp(serenity::Timestamp::now())
}

pub fn kick_embed(
    target: &serenity::User,
    moderator_id: serenity::UserId,
    reason: &str,
) -> serenity::CreateEmbed {
    action_embed("👢 User Kicked", WARNING_COLOR, target, moderator_id, reason)
}

pub fn ban_embed(
    target: &serenity::User,
    moderator_id: serenity::UserId,
    reason: &str,
) -> serenity::CreateEmbed {
    action_embed("🔨 User Banned", ERROR_COLOR, target, moderator_id, reason)
}

pub fn escalation_note(escalation: Escalation) -> Option<(&'static str, &'static str)> {
    match escalation {
        Escalation::NotReached => None,
        Escalation::Banned => Some((
            "⛔ Action Taken",
            "User has been banned for exceeding maximum warnings!",
        )),
        Escalation::BanDenied => Some(("❌ Error", "Failed to ban user. Check bot permissions.")),
        Escalation::BanFailed => Some((
            "❌ Error",
            "Failed to ban user. The warning was still recorded.",
        )),
    }
}

pub fn warn_embed(
    target: &serenity::User,
    moderator_id: serenity::UserId,
    reason: &str,
    outcome: WarnOutcome,
) -> serenity::CreateEmbed {
    let color = if outcome.escalation == Escalation::Banned {
        ERROR_COLOR
    } else {
        WARNING_COLOR
    };

    let embed = serenity::CreateEmbed::new()
        .title("⚠️ User Warned")
        .color(color)
        .field("User", user_field(target), true)
        .field("Moderator", format!("<@{}>", moderator_id.get()), true)
        .field("Warns", format_tally(outcome.count, outcome.max_warns), true)
        .field("Reason", reason_field(reason), false)
        .timestamp(serenity::Timestamp::now());

    match escalation_note(outcome.escalation) {
        Some((name, value)) => embed.field(name, value, false),
        None => embed,
    }
}

/// One line block per warning, numbered from 1 in the order they were issued.
pub fn warning_lines(list: &WarningList) -> Vec<String> {
    list.warnings
        .iter()
        .enumerate()
        .map(|(index, warning)| {
            format!(
                "**Warning #{}**\n**Reason:** {}\n**Moderator:** <@{}>\n**Date:** {}",
                index + 1,
                reason_field(&warning.reason),
                warning.moderator_id,
                discord_timestamp(warning.timestamp, TimestampStyle::ShortDate)
            )
        })
        .collect()
}

pub fn warnings_summary(list: &WarningList) -> String {
    format!(
        "**Total Warnings:** {}",
        format_tally(list.warnings.len(), list.max_warns)
    )
}

pub fn no_warnings_embed(display_name: &str) -> serenity::CreateEmbed {
    info_embed(&format!("⚠️ Warnings for {display_name}"), "No warnings found!")
}

pub fn cleared_embed(user_id: serenity::UserId, cleared: usize) -> serenity::CreateEmbed {
    success_embed(
        "✅ Warnings Cleared",
        format!("Cleared **{cleared}** warning(s) for <@{}>", user_id.get()),
    )
}

pub fn no_warnings_to_clear_message(user_id: serenity::UserId) -> String {
    format!("<@{}> has no warnings!", user_id.get())
}

pub fn unbanned_embed(name: &str, user_id: serenity::UserId) -> serenity::CreateEmbed {
    success_embed(
        "✅ User Unbanned",
        format!("Successfully unbanned **{name}** ({})", user_id.get()),
    )
}

pub fn max_warns_embed(previous: u32, current: u32) -> serenity::CreateEmbed {
    success_embed(
        "✅ Warning Limit Updated",
        format!("Members are now banned at **{current}** warning(s) (was {previous})."),
    )
}

pub fn server_stats_embed(guild_name: &str, stats: GuildStats) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("📊 {guild_name} Moderation Stats"))
        .color(INFO_COLOR)
        .field(
            "Verifications",
            stats.total_verifications.to_string(),
            true,
        )
        .field("Active Warnings", stats.active_warnings.to_string(), true)
        .field("Warned Members", stats.warned_users.to_string(), true)
}
