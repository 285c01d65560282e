use anyhow::Context as _;
use chrono::{DateTime, Utc};

use super::guild_config::id_to_i64;
use crate::database::Database;
use crate::model::{Snowflake, VerificationLogEntry};

#[derive(sqlx::FromRow)]
struct VerificationLogRow {
    guild_id: i64,
    user_id: i64,
    verified_by: i64,
    manual: bool,
    verified_at: DateTime<Utc>,
}

impl TryFrom<VerificationLogRow> for VerificationLogEntry {
    type Error = anyhow::Error;

    fn try_from(row: VerificationLogRow) -> anyhow::Result<Self> {
        Ok(Self {
            guild_id: Snowflake::try_from(row.guild_id).context("guild_id row out of range")?,
            user_id: Snowflake::try_from(row.user_id).context("user_id row out of range")?,
            verified_by: Snowflake::try_from(row.verified_by)
                .context("verified_by row out of range")?,
            manual: row.manual,
            timestamp: row.verified_at,
        })
    }
}

pub async fn append_verification_log(
    db: &Database,
    entry: &VerificationLogEntry,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO verification_log (guild_id, user_id, verified_by, manual, verified_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id_to_i64(entry.guild_id, "guild_id")?)
    .bind(id_to_i64(entry.user_id, "user_id")?)
    .bind(id_to_i64(entry.verified_by, "verified_by")?)
    .bind(entry.manual)
    .bind(entry.timestamp)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn verification_log_for_user(
    db: &Database,
    guild_id: Snowflake,
    user_id: Snowflake,
) -> anyhow::Result<Vec<VerificationLogEntry>> {
    let rows: Vec<VerificationLogRow> = sqlx::query_as(
        "SELECT guild_id, user_id, verified_by, manual, verified_at
         FROM verification_log
         WHERE guild_id = $1 AND user_id = $2
         ORDER BY verified_at ASC, id ASC",
    )
    .bind(id_to_i64(guild_id, "guild_id")?)
    .bind(id_to_i64(user_id, "user_id")?)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(VerificationLogEntry::try_from).collect()
}

pub async fn count_verifications(db: &Database, guild_id: Snowflake) -> anyhow::Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM verification_log WHERE guild_id = $1")
        .bind(id_to_i64(guild_id, "guild_id")?)
        .fetch_one(db.pool())
        .await?;

    u64::try_from(count).context("verification count out of u64 range")
}
