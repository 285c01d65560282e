pub mod ban;
pub mod clearwarns;
pub mod embeds;
pub mod kick;
pub mod maxwarns;
pub mod participants;
pub mod serverstats;
pub mod unban;
pub mod warn;
pub mod warnings;

use vigil_core::moderation::ModerationError;
use vigil_core::{Context, Error};

use crate::moderation::embeds::moderation_error_message;
use crate::replies::send_ephemeral_error;

/// Reply privately for outcomes the invoker can act on; anything else is
/// handed to the framework error handler.
pub(crate) async fn report_moderation_error(
    ctx: Context<'_>,
    action: &str,
    source: ModerationError,
) -> Result<(), Error> {
    match moderation_error_message(action, &source) {
        Some(message) => send_ephemeral_error(ctx, message).await,
        None => Err(source.into()),
    }
}
