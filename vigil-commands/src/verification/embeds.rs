use poise::serenity_prelude as serenity;

use vigil_core::verification::{SetupReport, VerificationError, VerificationStatus};
use vigil_utils::embed::{INFO_COLOR, SUCCESS_COLOR, success_embed};
use vigil_utils::time::{TimestampStyle, discord_timestamp};

const PANEL_DESCRIPTION: &str = "Welcome to the server!\n\n\
To gain access to all channels, please verify yourself by clicking the green button below.\n\n\
**Why do we verify?**\n\
We use verification to protect our community from:\n\
• Spam and raids\n\
• Alt accounts\n\
• Malicious users\n\n\
Click the button below to begin verification.";

pub fn verification_error_message(error: &VerificationError) -> Option<String> {
    match error {
        VerificationError::NotConfigured => {
            Some("Verification system is not set up! Use `/verifypanel` first.".to_owned())
        }
        VerificationError::VerifiedRoleMissing => Some(
            "Verified role not found! Please recreate the verification panel.".to_owned(),
        ),
        VerificationError::BotMissingPermissions => {
            Some("I don't have permission to manage roles or channels here!".to_owned())
        }
        VerificationError::Platform(_) | VerificationError::Store(_) => None,
    }
}

pub fn panel_embed(guild_name: &str, icon_url: Option<String>) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .title("🔐 Server Verification")
        .color(INFO_COLOR)
        .description(PANEL_DESCRIPTION)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{guild_name} Verification System"
        )));

    match icon_url {
        Some(url) => embed.thumbnail(url),
        None => embed,
    }
}

pub fn panel_components(verification_url: &str) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new_link(verification_url).label("✅ Verify Here"),
    ])]
}

/// Channel sweep counts stay in the logs; the admin only sees the result.
fn setup_complete_description(report: &SetupReport) -> String {
    format!(
        "Verification panel has been set up in <#{}>\n\n\
         **Roles:**\n\
         • Verified: <@&{}>\n\
         • Unverified: <@&{}>\n\n\
         **Note:** New members will automatically receive the <@&{}> role.",
        report.verify_channel.get(),
        report.verified_role.get(),
        report.unverified_role.get(),
        report.unverified_role.get(),
    )
}

pub fn setup_complete_embed(report: &SetupReport) -> serenity::CreateEmbed {
    success_embed(
        "✅ Verification Panel Created",
        setup_complete_description(report),
    )
}

pub fn manually_verified_embed(
    user: &serenity::User,
    moderator_id: serenity::UserId,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("✅ User Manually Verified")
        .color(SUCCESS_COLOR)
        .description(format!(
            "<@{}> has been manually verified by <@{}>",
            user.id.get(),
            moderator_id.get()
        ))
        .field("User", format!("{} ({})", user.name, user.id.get()), true)
        .field("Moderator", format!("<@{}>", moderator_id.get()), true)
}

pub fn verified_dm_embed(guild_name: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("✅ You've Been Verified!")
        .color(SUCCESS_COLOR)
        .description(format!(
            "You have been manually verified in **{guild_name}** and now have access to all channels!"
        ))
}

pub fn status_description(status: &VerificationStatus) -> String {
    if !status.configured {
        return "Verification is not set up in this server.".to_owned();
    }

    let mut lines = vec![format!(
        "**Verified role:** {}",
        if status.has_verified_role { "yes" } else { "no" }
    )];

    match status.log.last() {
        Some(entry) => {
            let how = if entry.manual { "manually" } else { "automatically" };
            lines.push(format!(
                "**Last verified:** {} ({how}, by <@{}>)",
                discord_timestamp(entry.timestamp, TimestampStyle::LongDateTime),
                entry.verified_by
            ));
            lines.push(format!("**Verifications logged:** {}", status.log.len()));
        }
        None => lines.push("**Last verified:** never".to_owned()),
    }

    lines.join("\n")
}

pub fn status_embed(display_name: &str, status: &VerificationStatus) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("🔎 Verification status for {display_name}"))
        .color(INFO_COLOR)
        .description(status_description(status))
}

#[cfg(test)]
mod tests {
    use vigil_database::model::{Snowflake, VerificationLogEntry};

    use super::*;

    fn entry(manual: bool) -> VerificationLogEntry {
        let id = |raw| Snowflake::new(raw).unwrap();
        VerificationLogEntry {
            user_id: id(2),
            guild_id: id(1),
            verified_by: id(9),
            manual,
            timestamp: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn status_for_unconfigured_guild() {
        let status = VerificationStatus {
            configured: false,
            has_verified_role: false,
            log: Vec::new(),
        };
        assert_eq!(
            status_description(&status),
            "Verification is not set up in this server."
        );
    }

    #[test]
    fn status_uses_latest_log_entry() {
        let status = VerificationStatus {
            configured: true,
            has_verified_role: true,
            log: vec![entry(false), entry(true)],
        };

        let text = status_description(&status);

        assert!(text.contains("**Verified role:** yes"));
        assert!(text.contains("<t:1700000000:f> (manually, by <@9>)"));
        assert!(text.contains("**Verifications logged:** 2"));
    }

    #[test]
    fn setup_summary_leaves_out_sweep_failures() {
        let report = SetupReport {
            verified_role: serenity::RoleId::new(301),
            unverified_role: serenity::RoleId::new(302),
            verify_channel: serenity::ChannelId::new(401),
            created_roles: vec!["Verified".to_owned()],
            created_channel: true,
            restricted_channels: 2,
            skipped_channels: 3,
        };

        let text = setup_complete_description(&report);

        assert!(text.starts_with("Verification panel has been set up in <#401>"));
        assert!(text.contains("• Unverified: <@&302>"));
        assert!(!text.contains("could not be restricted"));
        assert!(!text.contains('3'));
    }

    #[test]
    fn user_facing_errors_only() {
        assert!(verification_error_message(&VerificationError::NotConfigured).is_some());
        assert!(
            verification_error_message(&VerificationError::Store(anyhow::anyhow!("x"))).is_none()
        );
    }
}
