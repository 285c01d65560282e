use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use vigil_database::model::{GuildConfigUpdate, GuildSettings, Warning};

use super::{ModerationError, Moderator, Participant, check_target};
use crate::gateway::GatewayError;
use crate::ids::ToSnowflake;

/// What happened after a warning pushed a member to the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Escalation {
    NotReached,
    /// The member was banned and their warnings were reset.
    Banned,
    /// The platform refused the ban; the warning stays recorded.
    BanDenied,
    /// The ban request failed for another reason; the warning stays recorded.
    BanFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarnOutcome {
    /// Warnings held once this one was recorded, before any reset.
    pub count: usize,
    pub max_warns: u32,
    pub escalation: Escalation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarningList {
    pub warnings: Vec<Warning>,
    pub max_warns: u32,
}

pub fn escalation_reason(max_warns: u32) -> String {
    format!("Exceeded maximum warnings ({max_warns})")
}

impl Moderator<'_> {
    pub async fn warn(
        &self,
        guild_id: serenity::GuildId,
        actor: &Participant,
        target: &Participant,
        reason: &str,
    ) -> Result<WarnOutcome, ModerationError> {
        check_target(actor, target)?;

        let tally = self
            .store
            .append_warning(
                guild_id.to_snowflake(),
                target.user_id.to_snowflake(),
                Warning::new(reason, actor.user_id.to_snowflake()),
            )
            .await?;

        info!(
            guild_id = guild_id.get(),
            user_id = target.user_id.get(),
            moderator_id = actor.user_id.get(),
            count = tally.count,
            max_warns = tally.max_warns,
            "warning recorded"
        );

        let escalation = if tally.threshold_reached() {
            self.escalate(guild_id, target, tally.max_warns).await
        } else {
            Escalation::NotReached
        };

        Ok(WarnOutcome {
            count: tally.count,
            max_warns: tally.max_warns,
            escalation,
        })
    }

    /// Ban the member and reset their list. The reset only happens once the
    /// platform has accepted the ban, and a failed reset does not undo the
    /// `Banned` outcome.
    async fn escalate(
        &self,
        guild_id: serenity::GuildId,
        target: &Participant,
        max_warns: u32,
    ) -> Escalation {
        let reason = escalation_reason(max_warns);

        match self.gateway.ban(guild_id, target.user_id, &reason).await {
            Ok(()) => {
                match self
                    .store
                    .take_warnings(guild_id.to_snowflake(), target.user_id.to_snowflake())
                    .await
                {
                    Ok(cleared) => info!(
                        guild_id = guild_id.get(),
                        user_id = target.user_id.get(),
                        cleared,
                        "warning threshold reached; member banned"
                    ),
                    Err(source) => error!(
                        ?source,
                        guild_id = guild_id.get(),
                        user_id = target.user_id.get(),
                        "member banned but their warnings could not be reset"
                    ),
                }
                Escalation::Banned
            }
            Err(GatewayError::MissingPermissions) => {
                warn!(
                    guild_id = guild_id.get(),
                    user_id = target.user_id.get(),
                    "escalation ban refused: bot is missing permissions"
                );
                Escalation::BanDenied
            }
            Err(source) => {
                error!(
                    ?source,
                    guild_id = guild_id.get(),
                    user_id = target.user_id.get(),
                    "escalation ban failed"
                );
                Escalation::BanFailed
            }
        }
    }

    pub async fn list_warnings(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<WarningList, ModerationError> {
        let config = self.store.load(guild_id.to_snowflake()).await?;

        Ok(WarningList {
            warnings: config.warnings_for(user_id.to_snowflake()).to_vec(),
            max_warns: config.settings.max_warns,
        })
    }

    /// Empty the member's list, returning how many warnings it held.
    pub async fn clear_warnings(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<usize, ModerationError> {
        let previous = self
            .store
            .take_warnings(guild_id.to_snowflake(), user_id.to_snowflake())
            .await?;

        if previous > 0 {
            info!(
                guild_id = guild_id.get(),
                user_id = user_id.get(),
                previous,
                "warnings cleared"
            );
        }

        Ok(previous)
    }

    /// Change the guild's threshold, returning the previous value.
    pub async fn set_max_warns(
        &self,
        guild_id: serenity::GuildId,
        max_warns: u32,
    ) -> Result<u32, ModerationError> {
        if max_warns == 0 {
            return Err(ModerationError::InvalidThreshold);
        }

        let guild = guild_id.to_snowflake();
        let previous = self.store.load(guild).await?.settings.max_warns;
        self.store
            .save(guild, GuildConfigUpdate::settings(GuildSettings { max_warns }))
            .await?;

        info!(
            guild_id = guild_id.get(),
            previous, max_warns, "warning threshold updated"
        );

        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use vigil_database::GuildStore;
    use vigil_database::MemoryStore;

    use super::*;
    use crate::moderation::Rejection;
    use crate::moderation::test_support::*;
    use crate::testing::{Call, FailingResetStore, FakeGateway, Failure};

    async fn warn_n(moderator: &Moderator<'_>, n: usize) -> Vec<WarnOutcome> {
        let mut outcomes = Vec::new();
        for i in 0..n {
            outcomes.push(
                moderator
                    .warn(GUILD, &actor(), &target(), &format!("r{i}"))
                    .await
                    .unwrap(),
            );
        }
        outcomes
    }

    fn bans(calls: &[Call]) -> usize {
        calls
            .iter()
            .filter(|call| matches!(call, Call::Ban { .. }))
            .count()
    }

    #[tokio::test]
    async fn count_grows_by_one_below_threshold() {
        let store = MemoryStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);

        let outcomes = warn_n(&moderator, 2).await;

        assert_eq!(outcomes[0].count, 1);
        assert_eq!(outcomes[1].count, 2);
        assert!(
            outcomes
                .iter()
                .all(|outcome| outcome.escalation == Escalation::NotReached)
        );
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn third_warning_bans_once_and_resets() {
        let store = MemoryStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);

        warn_n(&moderator, 2).await;
        let outcome = warn_n(&moderator, 1).await[0];

        assert_eq!(outcome.escalation, Escalation::Banned);
        assert_eq!(outcome.count, 3);
        assert_eq!(outcome.max_warns, 3);

        let calls = gateway.calls().await;
        assert_eq!(bans(&calls), 1);
        assert_eq!(
            calls[0],
            Call::Ban {
                user: target().user_id,
                reason: "Exceeded maximum warnings (3)".to_owned(),
            }
        );

        let doc = store.load(GUILD.to_snowflake()).await.unwrap();
        assert!(doc.warnings_for(target().user_id.to_snowflake()).is_empty());
    }

    #[tokio::test]
    async fn failed_reset_after_ban_still_reports_banned() {
        let store = FailingResetStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);

        let outcome = *warn_n(&moderator, 3).await.last().unwrap();

        assert_eq!(outcome.escalation, Escalation::Banned);
        assert_eq!(outcome.count, 3);
        assert_eq!(bans(&gateway.calls().await), 1);
        let doc = store.load(GUILD.to_snowflake()).await.unwrap();
        assert_eq!(doc.warnings_for(target().user_id.to_snowflake()).len(), 3);
    }

    #[tokio::test]
    async fn denied_ban_keeps_the_warning() {
        let store = MemoryStore::default();
        let gateway = FakeGateway {
            ban_failure: Some(Failure::MissingPermissions),
            ..FakeGateway::new()
        };
        let moderator = Moderator::new(&store, &gateway);

        let outcome = *warn_n(&moderator, 3).await.last().unwrap();

        assert_eq!(outcome.escalation, Escalation::BanDenied);
        assert_eq!(outcome.count, 3);
        let doc = store.load(GUILD.to_snowflake()).await.unwrap();
        assert_eq!(doc.warnings_for(target().user_id.to_snowflake()).len(), 3);
    }

    #[tokio::test]
    async fn other_ban_failures_are_reported_separately() {
        let store = MemoryStore::default();
        let gateway = FakeGateway {
            ban_failure: Some(Failure::NotFound),
            ..FakeGateway::new()
        };
        let moderator = Moderator::new(&store, &gateway);

        let outcome = *warn_n(&moderator, 3).await.last().unwrap();

        assert_eq!(outcome.escalation, Escalation::BanFailed);
        assert_eq!(outcome.count, 3);
    }

    #[tokio::test]
    async fn every_warn_past_the_threshold_attempts_a_ban() {
        let store = MemoryStore::default();
        let gateway = FakeGateway {
            ban_failure: Some(Failure::MissingPermissions),
            ..FakeGateway::new()
        };
        let moderator = Moderator::new(&store, &gateway);

        warn_n(&moderator, 4).await;

        assert_eq!(bans(&gateway.calls().await), 2);
    }

    #[tokio::test]
    async fn rejected_warn_leaves_document_untouched() {
        let store = MemoryStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);
        warn_n(&moderator, 1).await;
        let before = store.load(GUILD.to_snowflake()).await.unwrap();

        let peer = member(2, 10);
        let result = moderator
            .warn(GUILD, &actor(), &peer, "nope")
            .await;

        assert!(matches!(
            result,
            Err(ModerationError::Rejected(Rejection::InsufficientRank))
        ));
        assert_eq!(store.load(GUILD.to_snowflake()).await.unwrap(), before);
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn listing_preserves_order_and_threshold() {
        let store = MemoryStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);
        warn_n(&moderator, 2).await;

        let list = moderator
            .list_warnings(GUILD, target().user_id)
            .await
            .unwrap();

        assert_eq!(list.max_warns, 3);
        let reasons: Vec<_> = list.warnings.iter().map(|w| w.reason.as_str()).collect();
        assert_eq!(reasons, ["r0", "r1"]);
        assert_eq!(
            list.warnings[0].moderator_id,
            actor().user_id.to_snowflake()
        );
    }

    #[tokio::test]
    async fn clearing_reports_prior_count_then_zero() {
        let store = MemoryStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);
        warn_n(&moderator, 2).await;

        let user = target().user_id;
        assert_eq!(moderator.clear_warnings(GUILD, user).await.unwrap(), 2);
        assert_eq!(moderator.clear_warnings(GUILD, user).await.unwrap(), 0);
        assert!(
            moderator
                .list_warnings(GUILD, user)
                .await
                .unwrap()
                .warnings
                .is_empty()
        );
    }

    #[tokio::test]
    async fn threshold_changes_apply_to_later_warns() {
        let store = MemoryStore::default();
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);

        assert!(matches!(
            moderator.set_max_warns(GUILD, 0).await,
            Err(ModerationError::InvalidThreshold)
        ));
        assert_eq!(moderator.set_max_warns(GUILD, 1).await.unwrap(), 3);

        let outcome = warn_n(&moderator, 1).await[0];
        assert_eq!(outcome.max_warns, 1);
        assert_eq!(outcome.escalation, Escalation::Banned);
    }

    #[tokio::test]
    async fn unseen_guild_uses_configured_default() {
        let store = MemoryStore::new(GuildSettings { max_warns: 7 });
        let gateway = FakeGateway::new();
        let moderator = Moderator::new(&store, &gateway);

        let list = moderator
            .list_warnings(GUILD, target().user_id)
            .await
            .unwrap();

        assert_eq!(list.max_warns, 7);
        assert!(list.warnings.is_empty());
    }
}
