use anyhow::Context as _;
use sqlx::types::Json;
use tracing::warn;

use crate::cache::{CONFIG_CACHE_TTL, invalidate_verification, verification_key};
use crate::database::Database;
use crate::model::{
    GuildConfig, GuildConfigUpdate, GuildSettings, Snowflake, VerificationRecord, WarnMap,
    WarnTally, Warning,
};

#[derive(sqlx::FromRow)]
struct GuildConfigRow {
    guild_id: i64,
    warns: Json<WarnMap>,
    settings: Json<GuildSettings>,
    verification: Option<Json<VerificationRecord>>,
}

impl TryFrom<GuildConfigRow> for GuildConfig {
    type Error = anyhow::Error;

    fn try_from(row: GuildConfigRow) -> anyhow::Result<Self> {
        Ok(Self {
            guild_id: Snowflake::try_from(row.guild_id).context("guild_id row out of range")?,
            warns: row.warns.0,
            settings: row.settings.0,
            verification: row.verification.map(|Json(record)| record),
        })
    }
}

pub(crate) fn id_to_i64(id: Snowflake, label: &'static str) -> anyhow::Result<i64> {
    i64::try_from(id).with_context(|| format!("{label} out of i64 range"))
}

pub async fn find_guild_config(
    db: &Database,
    guild_id: Snowflake,
) -> anyhow::Result<Option<GuildConfig>> {
    let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;

    let row: Option<GuildConfigRow> = sqlx::query_as(
        "SELECT guild_id, warns, settings, verification FROM guild_configs WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?;

    row.map(GuildConfig::try_from).transpose()
}

/// Fetch the guild document, inserting the default one first when missing.
pub async fn load_guild_config(db: &Database, guild_id: Snowflake) -> anyhow::Result<GuildConfig> {
    let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;

    sqlx::query(
        "INSERT INTO guild_configs (guild_id, settings) VALUES ($1, $2)
         ON CONFLICT (guild_id) DO NOTHING",
    )
    .bind(guild_id_i64)
    .bind(Json(db.defaults()))
    .execute(db.pool())
    .await?;

    find_guild_config(db, guild_id)
        .await?
        .with_context(|| format!("guild config {guild_id} missing after insert"))
}

pub async fn save_guild_config(
    db: &Database,
    guild_id: Snowflake,
    update: GuildConfigUpdate,
) -> anyhow::Result<()> {
    let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;
    let touches_verification = update.verification.is_some();

    sqlx::query(
        "INSERT INTO guild_configs (guild_id, warns, settings, verification)
         VALUES ($1, COALESCE($2, '{}'::jsonb), COALESCE($3, $5), $4)
         ON CONFLICT (guild_id) DO UPDATE SET
             warns = COALESCE($2, guild_configs.warns),
             settings = COALESCE($3, guild_configs.settings),
             verification = COALESCE($4, guild_configs.verification),
             updated_at = NOW()",
    )
    .bind(guild_id_i64)
    .bind(update.warns.map(Json))
    .bind(update.settings.map(Json))
    .bind(update.verification.map(Json))
    .bind(Json(db.defaults()))
    .execute(db.pool())
    .await?;

    // The row is already committed; a stale cache entry expires with its TTL.
    if touches_verification {
        if let Err(e) = invalidate_verification(db.cache(), guild_id).await {
            warn!(
                ?e,
                guild_id = guild_id.get(),
                "cache invalidation failed after saving verification"
            );
        }
    }

    Ok(())
}

/// Append a warning in a single statement so concurrent warns never drop each other.
pub async fn append_warning(
    db: &Database,
    guild_id: Snowflake,
    user_id: Snowflake,
    warning: &Warning,
) -> anyhow::Result<WarnTally> {
    let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;

    let (count, settings): (i32, Json<GuildSettings>) = sqlx::query_as(
        "INSERT INTO guild_configs (guild_id, warns, settings)
         VALUES ($1, jsonb_build_object($2::text, jsonb_build_array($3::jsonb)), $4)
         ON CONFLICT (guild_id) DO UPDATE SET
             warns = jsonb_set(
                 guild_configs.warns,
                 ARRAY[$2::text],
                 COALESCE(guild_configs.warns -> $2::text, '[]'::jsonb) || jsonb_build_array($3::jsonb)
             ),
             updated_at = NOW()
         RETURNING jsonb_array_length(warns -> $2::text), settings",
    )
    .bind(guild_id_i64)
    .bind(user_id.to_string())
    .bind(Json(warning))
    .bind(Json(db.defaults()))
    .fetch_one(db.pool())
    .await?;

    Ok(WarnTally {
        count: usize::try_from(count).context("warn count out of usize range")?,
        max_warns: settings.0.max_warns,
    })
}

/// Reset a user's warnings under a row lock, returning the previous count.
pub async fn take_warnings(
    db: &Database,
    guild_id: Snowflake,
    user_id: Snowflake,
) -> anyhow::Result<usize> {
    let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;
    let user_key = user_id.to_string();

    let mut tx = db.pool().begin().await?;

    sqlx::query(
        "INSERT INTO guild_configs (guild_id, settings) VALUES ($1, $2)
         ON CONFLICT (guild_id) DO NOTHING",
    )
    .bind(guild_id_i64)
    .bind(Json(db.defaults()))
    .execute(&mut *tx)
    .await?;

    let previous: i32 = sqlx::query_scalar(
        "SELECT COALESCE(jsonb_array_length(warns -> $2::text), 0)
         FROM guild_configs WHERE guild_id = $1 FOR UPDATE",
    )
    .bind(guild_id_i64)
    .bind(&user_key)
    .fetch_one(&mut *tx)
    .await?;

    if previous > 0 {
        sqlx::query(
            "UPDATE guild_configs
             SET warns = jsonb_set(warns, ARRAY[$2::text], '[]'::jsonb), updated_at = NOW()
             WHERE guild_id = $1",
        )
        .bind(guild_id_i64)
        .bind(&user_key)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    usize::try_from(previous).context("warn count out of usize range")
}

pub async fn find_verification(
    db: &Database,
    guild_id: Snowflake,
) -> anyhow::Result<Option<VerificationRecord>> {
    let cache_key = verification_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;

            let record: Option<Json<VerificationRecord>> =
                sqlx::query_scalar("SELECT verification FROM guild_configs WHERE guild_id = $1")
                    .bind(guild_id_i64)
                    .fetch_optional(db.pool())
                    .await?
                    .flatten();

            Ok(record.map(|Json(record)| record))
        })
        .await
}

/// Sum of live warnings and the number of users holding at least one.
pub async fn warning_totals(db: &Database, guild_id: Snowflake) -> anyhow::Result<(u64, u64)> {
    let guild_id_i64 = id_to_i64(guild_id, "guild_id")?;

    let (total, users): (i64, i64) = sqlx::query_as(
        "SELECT
             COALESCE(SUM(jsonb_array_length(entry.value)), 0)::BIGINT,
             COUNT(*) FILTER (WHERE jsonb_array_length(entry.value) > 0)
         FROM guild_configs, jsonb_each(guild_configs.warns) AS entry
         WHERE guild_configs.guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_one(db.pool())
    .await?;

    Ok((
        u64::try_from(total).context("warning total out of u64 range")?,
        u64::try_from(users).context("warned user count out of u64 range")?,
    ))
}
