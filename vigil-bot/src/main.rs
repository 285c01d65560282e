mod events;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use vigil_core::{BotSettings, Data, Error};
use vigil_database::{CacheService, Database, GuildStore, MIGRATOR, MemoryStore};
use vigil_utils::embed::error_embed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file before RUST_LOG is read
    dotenvy::dotenv().ok();
    init_tracing();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;
    let guild_id = match env_non_empty("DISCORD_GUILD_ID") {
        Some(raw) => Some(serenity::GuildId::new(
            raw.parse::<std::num::NonZeroU64>()
                .context("DISCORD_GUILD_ID must be a non-zero integer")?
                .get(),
        )),
        None => None,
    };

    let settings = Arc::new(BotSettings::from_env()?);
    info!(
        website_url = %settings.website_url,
        default_max_warns = settings.default_max_warns,
        "Bot settings loaded."
    );

    let store = connect_store(&settings).await?;

    let intents = serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vigil_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let store = store.clone();
            let settings = settings.clone();
            Box::pin(async move {
                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await?;
                        info!(guild_id = guild_id.get(), "Commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Commands registered globally.");
                    }
                }

                Ok(Data { store, settings })
            })
        })
        .build();

    info!("Vigil is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise INFO with serenity's shard chatter muted.
fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer();

    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => tracing_subscriber::registry()
            .with(fmt_layer.with_filter(env_filter))
            .init(),
        Err(_) => tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter_fn(|metadata| {
                let target = metadata.target();

                let within_info_level = *metadata.level() <= tracing::Level::INFO;
                if !within_info_level {
                    return false;
                }

                !(target.starts_with("serenity::gateway::bridge::shard_manager")
                    || target.starts_with("serenity::gateway::bridge::shard_runner"))
            })))
            .init(),
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-process store.
async fn connect_store(settings: &BotSettings) -> anyhow::Result<Arc<dyn GuildStore>> {
    let Some(database_url) = env_non_empty("DATABASE_URL") else {
        warn!("DATABASE_URL is not set; using the in-memory store. Data will not survive a restart.");
        return Ok(Arc::new(MemoryStore::new(settings.guild_defaults())));
    };

    let max_connections = u32::try_from(env_u64("DATABASE_MAX_CONNECTIONS", 5)).unwrap_or(5);
    let db_pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!(max_connections, "PostgreSQL connection established.");

    let cache = connect_cache().await;
    let db = Database::with_cache(db_pool, cache).with_default_settings(settings.guild_defaults());

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    Ok(Arc::new(db))
}

async fn connect_cache() -> CacheService {
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "vigil:prod".to_string());

    if !env_bool("REDIS_ENABLED", false) {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(redis_key_prefix);
    }

    let cache = match env::var("REDIS_URL") {
        Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
            Ok(cache) => {
                info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                cache
            }
            Err(err) => {
                warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                return CacheService::disabled(redis_key_prefix);
            }
        },
        Err(_) => {
            warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
            return CacheService::disabled(redis_key_prefix);
        }
    };

    if let Err(err) = cache.ping().await {
        warn!(
            ?err,
            "Redis cache ping failed; cache operations will continue with fallback behavior."
        );
    } else {
        info!("Redis cache health check passed.");
    }

    cache
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                ?error,
                command = %ctx.command().qualified_name,
                "command error"
            );

            let embed = error_embed(
                "Command Error",
                "Something went wrong while running this command.",
            );

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `/{}`", ctx.command().qualified_name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .ephemeral(true)
                        .embed(error_embed("Invalid Input", description)),
                )
                .await;
        }
        poise::FrameworkError::UnknownInteraction { interaction, .. } => {
            debug!(command = %interaction.data.name, "unknown interaction");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                user = %data_about_bot.user.name,
                guilds = data_about_bot.guilds.len(),
                "Vigil is ready."
            );
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::member_join::handle_member_join(ctx, framework, data, new_member).await;
        }
        _ => {}
    }

    Ok(())
}
