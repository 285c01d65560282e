use chrono::Utc;
use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};
use vigil_database::model::{VerificationLogEntry, VerificationRecord};

use super::{VerificationError, Verifier};
use crate::gateway::GatewayError;
use crate::ids::{ToSnowflake, role_id};

const MANUAL_VERIFY_REASON: &str = "Manual verification";
const JOIN_REASON: &str = "Verification system - new member";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManualVerification {
    pub removed_unverified: bool,
    /// Whether the member could be told privately.
    pub notified: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Verification is not enabled for the guild.
    Skipped,
    /// Enabled, but the stored unverified role no longer exists.
    RoleMissing,
    Assigned(serenity::RoleId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationStatus {
    pub configured: bool,
    pub has_verified_role: bool,
    pub log: Vec<VerificationLogEntry>,
}

impl Verifier<'_> {
    async fn enabled_record(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<Option<VerificationRecord>, VerificationError> {
        Ok(self
            .store
            .find_verification(guild_id.to_snowflake())
            .await?
            .filter(|record| record.enabled))
    }

    async fn role_exists(
        &self,
        guild_id: serenity::GuildId,
        role: serenity::RoleId,
    ) -> Result<bool, VerificationError> {
        let roles = self.gateway.roles(guild_id).await?;
        Ok(roles.iter().any(|summary| summary.id == role))
    }

    pub async fn manual_verify(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        moderator_id: serenity::UserId,
    ) -> Result<ManualVerification, VerificationError> {
        let record = self
            .enabled_record(guild_id)
            .await?
            .ok_or(VerificationError::NotConfigured)?;

        let verified_role = role_id(record.verified_role_id);
        if !self.role_exists(guild_id, verified_role).await? {
            return Err(VerificationError::VerifiedRoleMissing);
        }

        let unverified_role = role_id(record.unverified_role_id);
        let member_roles = self.gateway.member_roles(guild_id, user_id).await?;
        let removed_unverified = member_roles.contains(&unverified_role);
        if removed_unverified {
            self.gateway
                .remove_role(guild_id, user_id, unverified_role, MANUAL_VERIFY_REASON)
                .await?;
        }

        self.gateway
            .add_role(guild_id, user_id, verified_role, MANUAL_VERIFY_REASON)
            .await?;

        self.store
            .append_verification_log(VerificationLogEntry {
                user_id: user_id.to_snowflake(),
                guild_id: guild_id.to_snowflake(),
                verified_by: moderator_id.to_snowflake(),
                manual: true,
                timestamp: Utc::now(),
            })
            .await?;

        info!(
            guild_id = guild_id.get(),
            user_id = user_id.get(),
            moderator_id = moderator_id.get(),
            "member manually verified"
        );

        let notified = match self.gateway.notify_verified(guild_id, user_id).await {
            Ok(()) => true,
            Err(source) => {
                debug!(?source, user_id = user_id.get(), "verification DM not delivered");
                false
            }
        };

        Ok(ManualVerification {
            removed_unverified,
            notified,
        })
    }

    /// Restrict a newly joined account, bot accounts included.
    pub async fn on_member_join(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<JoinOutcome, VerificationError> {
        let Some(record) = self.enabled_record(guild_id).await? else {
            return Ok(JoinOutcome::Skipped);
        };

        let unverified_role = role_id(record.unverified_role_id);
        if !self.role_exists(guild_id, unverified_role).await? {
            warn!(
                guild_id = guild_id.get(),
                role_id = unverified_role.get(),
                "unverified role is gone; new member left unrestricted"
            );
            return Ok(JoinOutcome::RoleMissing);
        }

        self.gateway
            .add_role(guild_id, user_id, unverified_role, JOIN_REASON)
            .await?;

        info!(
            guild_id = guild_id.get(),
            user_id = user_id.get(),
            "unverified role assigned to new member"
        );
        Ok(JoinOutcome::Assigned(unverified_role))
    }

    pub async fn status(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<VerificationStatus, VerificationError> {
        let record = self.enabled_record(guild_id).await?;
        let log = self
            .store
            .verification_log(guild_id.to_snowflake(), user_id.to_snowflake())
            .await?;

        let has_verified_role = match &record {
            Some(record) => match self.gateway.member_roles(guild_id, user_id).await {
                Ok(roles) => roles.contains(&role_id(record.verified_role_id)),
                Err(GatewayError::NotFound) => false,
                Err(source) => return Err(source.into()),
            },
            None => false,
        };

        Ok(VerificationStatus {
            configured: record.is_some(),
            has_verified_role,
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use vigil_database::model::GuildConfigUpdate;
    use vigil_database::{GuildStore, MemoryStore};

    use super::*;
    use crate::BotSettings;
    use crate::testing::{Call, FakeGateway, Failure};
    use crate::verification::test_support::*;

    async fn configured_store(enabled: bool) -> MemoryStore {
        let store = MemoryStore::default();
        store
            .save(
                GUILD.to_snowflake(),
                GuildConfigUpdate::verification(record(enabled)),
            )
            .await
            .unwrap();
        store
    }

    async fn gateway_with_roles() -> FakeGateway {
        FakeGateway::new()
            .with_roles(&[(301, "Verified"), (302, "Unverified")])
            .await
    }

    #[tokio::test]
    async fn manual_verify_without_record_is_not_configured() {
        let store = MemoryStore::default();
        let gateway = gateway_with_roles().await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let result = verifier.manual_verify(GUILD, MEMBER, ADMIN).await;

        assert!(matches!(result, Err(VerificationError::NotConfigured)));
        assert!(gateway.calls().await.iter().all(|call| !call.is_role_operation()));
    }

    #[tokio::test]
    async fn manual_verify_with_disabled_record_is_not_configured() {
        let store = configured_store(false).await;
        let gateway = gateway_with_roles().await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let result = verifier.manual_verify(GUILD, MEMBER, ADMIN).await;

        assert!(matches!(result, Err(VerificationError::NotConfigured)));
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn manual_verify_reports_missing_verified_role() {
        let store = configured_store(true).await;
        let gateway = FakeGateway::new().with_roles(&[(302, "Unverified")]).await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let result = verifier.manual_verify(GUILD, MEMBER, ADMIN).await;

        assert!(matches!(result, Err(VerificationError::VerifiedRoleMissing)));
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn manual_verify_swaps_roles_and_logs() {
        let store = configured_store(true).await;
        let gateway = gateway_with_roles().await;
        gateway.member_roles.lock().await.push(UNVERIFIED);
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let outcome = verifier.manual_verify(GUILD, MEMBER, ADMIN).await.unwrap();

        assert_eq!(
            outcome,
            ManualVerification {
                removed_unverified: true,
                notified: true,
            }
        );
        assert_eq!(
            gateway.calls().await,
            vec![
                Call::RemoveRole {
                    user: MEMBER,
                    role: UNVERIFIED
                },
                Call::AddRole {
                    user: MEMBER,
                    role: VERIFIED
                },
                Call::NotifyVerified { user: MEMBER },
            ]
        );

        let log = store
            .verification_log(GUILD.to_snowflake(), MEMBER.to_snowflake())
            .await
            .unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].manual);
        assert_eq!(log[0].verified_by, ADMIN.to_snowflake());
    }

    #[tokio::test]
    async fn failed_dm_does_not_fail_verification() {
        let store = configured_store(true).await;
        let gateway = FakeGateway {
            notify_failure: Some(Failure::MissingPermissions),
            ..FakeGateway::new()
        }
        .with_roles(&[(301, "Verified"), (302, "Unverified")])
        .await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let outcome = verifier.manual_verify(GUILD, MEMBER, ADMIN).await.unwrap();

        assert!(!outcome.notified);
        assert!(!outcome.removed_unverified);
    }

    #[tokio::test]
    async fn join_with_disabled_verification_touches_no_roles() {
        let store = configured_store(false).await;
        let gateway = gateway_with_roles().await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let outcome = verifier.on_member_join(GUILD, MEMBER).await.unwrap();

        assert_eq!(outcome, JoinOutcome::Skipped);
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn join_assigns_unverified_role() {
        let store = configured_store(true).await;
        let gateway = gateway_with_roles().await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let outcome = verifier.on_member_join(GUILD, MEMBER).await.unwrap();

        assert_eq!(outcome, JoinOutcome::Assigned(UNVERIFIED));
        assert_eq!(
            gateway.calls().await,
            vec![Call::AddRole {
                user: MEMBER,
                role: UNVERIFIED
            }]
        );
    }

    #[tokio::test]
    async fn every_joining_account_is_restricted() {
        let store = configured_store(true).await;
        let gateway = gateway_with_roles().await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);
        let integration = serenity::UserId::new(777);

        for user in [MEMBER, integration] {
            let outcome = verifier.on_member_join(GUILD, user).await.unwrap();
            assert_eq!(outcome, JoinOutcome::Assigned(UNVERIFIED));
        }

        assert_eq!(
            gateway.calls().await,
            vec![
                Call::AddRole {
                    user: MEMBER,
                    role: UNVERIFIED
                },
                Call::AddRole {
                    user: integration,
                    role: UNVERIFIED
                },
            ]
        );
    }

    #[tokio::test]
    async fn join_with_deleted_role_is_a_no_op() {
        let store = configured_store(true).await;
        let gateway = FakeGateway::new().with_roles(&[(301, "Verified")]).await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let outcome = verifier.on_member_join(GUILD, MEMBER).await.unwrap();

        assert_eq!(outcome, JoinOutcome::RoleMissing);
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn status_reflects_role_and_log() {
        let store = configured_store(true).await;
        let gateway = gateway_with_roles().await;
        let settings = BotSettings::default();
        let verifier = Verifier::new(&store, &gateway, &settings);

        let before = verifier.status(GUILD, MEMBER).await.unwrap();
        verifier.manual_verify(GUILD, MEMBER, ADMIN).await.unwrap();
        let after = verifier.status(GUILD, MEMBER).await.unwrap();

        assert!(before.configured);
        assert!(!before.has_verified_role);
        assert!(before.log.is_empty());
        assert!(after.has_verified_role);
        assert_eq!(after.log.len(), 1);
    }
}
