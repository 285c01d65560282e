pub mod embeds;
pub mod manverify;
pub mod verifypanel;
pub mod verifystatus;

use vigil_core::verification::VerificationError;
use vigil_core::{Context, Error};

use crate::replies::send_ephemeral_error;
use crate::verification::embeds::verification_error_message;

pub(crate) async fn report_verification_error(
    ctx: Context<'_>,
    source: VerificationError,
) -> Result<(), Error> {
    match verification_error_message(&source) {
        Some(message) => send_ephemeral_error(ctx, message).await,
        None => Err(source.into()),
    }
}
