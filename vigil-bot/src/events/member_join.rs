use poise::serenity_prelude as serenity;
use tracing::{debug, error, warn};

use vigil_commands::gateway::SerenityGateway;
use vigil_core::verification::{JoinOutcome, VerificationError, Verifier};
use vigil_core::{Data, Error};

/// Hand new members the unverified role. Failures are logged and never
/// reach the framework.
pub async fn handle_member_join(
    ctx: &serenity::Context,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
    member: &serenity::Member,
) {
    let gateway = SerenityGateway::new(ctx.http.clone(), framework.bot_id);
    let verifier = Verifier::new(data.store.as_ref(), &gateway, &data.settings);

    match verifier.on_member_join(member.guild_id, member.user.id).await {
        Ok(JoinOutcome::Skipped) => {
            debug!(guild_id = member.guild_id.get(), "verification disabled; join ignored");
        }
        Ok(JoinOutcome::RoleMissing | JoinOutcome::Assigned(_)) => {}
        Err(VerificationError::BotMissingPermissions) => {
            warn!(
                guild_id = member.guild_id.get(),
                user_id = member.user.id.get(),
                "cannot assign unverified role: bot is missing permissions"
            );
        }
        Err(source) => {
            error!(
                ?source,
                guild_id = member.guild_id.get(),
                user_id = member.user.id.get(),
                "failed to handle member join"
            );
        }
    }
}
