use poise::serenity_prelude as serenity;
use tracing::{info, warn};
use vigil_database::model::{GuildConfigUpdate, VerificationRecord};

use super::{
    UNVERIFIED_ROLE_COLOUR, VERIFIED_ROLE_COLOUR, VerificationError, Verifier,
    restrict_unverified, verify_channel_overwrites,
};
use crate::gateway::{ChannelSummary, RoleSummary};
use crate::ids::ToSnowflake;

const SETUP_REASON: &str = "Verification system setup";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupReport {
    pub verified_role: serenity::RoleId,
    pub unverified_role: serenity::RoleId,
    pub verify_channel: serenity::ChannelId,
    /// Names of roles that had to be created.
    pub created_roles: Vec<String>,
    pub created_channel: bool,
    pub restricted_channels: usize,
    pub skipped_channels: usize,
}

impl Verifier<'_> {
    /// Bring the guild to the configured state. Safe to re-run; lookups are
    /// by name and the channel sweep is repeated in full every time.
    pub async fn setup(&self, guild_id: serenity::GuildId) -> Result<SetupReport, VerificationError> {
        let roles = self.gateway.roles(guild_id).await?;
        let mut created_roles = Vec::new();

        let unverified_role = self
            .ensure_role(
                guild_id,
                &roles,
                &self.settings.unverified_role_name,
                UNVERIFIED_ROLE_COLOUR,
                &mut created_roles,
            )
            .await?;
        let verified_role = self
            .ensure_role(
                guild_id,
                &roles,
                &self.settings.verified_role_name,
                VERIFIED_ROLE_COLOUR,
                &mut created_roles,
            )
            .await?;

        let mut channels = self.gateway.channels(guild_id).await?;
        let existing = find_text_channel(&channels, &self.settings.verify_channel_name);

        let (verify_channel, created_channel) = match existing {
            Some(channel) => (channel, false),
            None => {
                let category = self
                    .gateway
                    .create_category(guild_id, &self.settings.verify_category_name, SETUP_REASON)
                    .await?;
                let overwrites = verify_channel_overwrites(
                    guild_id,
                    unverified_role,
                    verified_role,
                    self.gateway.bot_id(),
                );
                let channel = self
                    .gateway
                    .create_text_channel(
                        guild_id,
                        &self.settings.verify_channel_name,
                        category.id,
                        overwrites,
                        SETUP_REASON,
                    )
                    .await?;
                channels = self.gateway.channels(guild_id).await?;
                (channel.id, true)
            }
        };

        let (restricted_channels, skipped_channels) = self
            .restrict_channels(&channels, verify_channel, unverified_role)
            .await;

        let record = VerificationRecord {
            enabled: true,
            verified_role_id: verified_role.to_snowflake(),
            unverified_role_id: unverified_role.to_snowflake(),
            verify_channel_id: verify_channel.to_snowflake(),
        };
        self.store
            .save(guild_id.to_snowflake(), GuildConfigUpdate::verification(record))
            .await?;

        info!(
            guild_id = guild_id.get(),
            verify_channel = verify_channel.get(),
            created_roles = created_roles.len(),
            created_channel,
            restricted_channels,
            skipped_channels,
            "verification configured"
        );

        Ok(SetupReport {
            verified_role,
            unverified_role,
            verify_channel,
            created_roles,
            created_channel,
            restricted_channels,
            skipped_channels,
        })
    }

    async fn ensure_role(
        &self,
        guild_id: serenity::GuildId,
        roles: &[RoleSummary],
        name: &str,
        colour: u32,
        created: &mut Vec<String>,
    ) -> Result<serenity::RoleId, VerificationError> {
        if let Some(role) = roles.iter().find(|role| role.name == name) {
            return Ok(role.id);
        }

        let role = self
            .gateway
            .create_role(guild_id, name, colour, SETUP_REASON)
            .await?;
        created.push(role.name);
        Ok(role.id)
    }

    /// Best-effort: a channel the bot cannot edit is counted and skipped.
    async fn restrict_channels(
        &self,
        channels: &[ChannelSummary],
        verify_channel: serenity::ChannelId,
        unverified_role: serenity::RoleId,
    ) -> (usize, usize) {
        let mut restricted = 0;
        let mut skipped = 0;

        for channel in channels {
            if channel.id == verify_channel || channel.name == self.settings.verify_channel_name {
                continue;
            }

            match self
                .gateway
                .set_overwrite(channel.id, restrict_unverified(unverified_role))
                .await
            {
                Ok(()) => restricted += 1,
                Err(source) => {
                    warn!(
                        ?source,
                        channel_id = channel.id.get(),
                        "could not restrict channel for unverified members"
                    );
                    skipped += 1;
                }
            }
        }

        (restricted, skipped)
    }
}

fn find_text_channel(channels: &[ChannelSummary], name: &str) -> Option<serenity::ChannelId> {
    channels
        .iter()
        .find(|channel| channel.kind == serenity::ChannelType::Text && channel.name == name)
        .map(|channel| channel.id)
}
