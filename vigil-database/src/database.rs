use sqlx::{PgPool, migrate::Migrator};

use crate::cache::CacheService;
use crate::model::GuildSettings;

/// Compile-time discovered SQLx migrations for the `vigil-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres-backed guild store handle, cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
    defaults: GuildSettings,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self::with_cache(pool, CacheService::disabled("vigil:prod"))
    }

    /// Create a database handle from an existing pool and cache service.
    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self {
            pool,
            cache,
            defaults: GuildSettings::default(),
        }
    }

    /// Override the settings given to newly created guild documents.
    pub fn with_default_settings(mut self, defaults: GuildSettings) -> Self {
        self.defaults = defaults;
        self
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Expose the cache service for query modules.
    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub fn defaults(&self) -> GuildSettings {
        self.defaults
    }
}
