use anyhow::{Context as _, bail};
use poise::serenity_prelude as serenity;
use vigil_database::model::{DEFAULT_MAX_WARNS, GuildSettings};

pub const DEFAULT_WEBSITE_URL: &str = "http://localhost:3000";

/// Process-wide bot settings, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotSettings {
    pub website_url: String,
    pub default_max_warns: u32,
    pub verified_role_name: String,
    pub unverified_role_name: String,
    pub verify_channel_name: String,
    pub verify_category_name: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            website_url: DEFAULT_WEBSITE_URL.to_owned(),
            default_max_warns: DEFAULT_MAX_WARNS,
            verified_role_name: "Verified".to_owned(),
            unverified_role_name: "Unverified".to_owned(),
            verify_channel_name: "verify".to_owned(),
            verify_category_name: "VERIFICATION".to_owned(),
        }
    }
}

impl BotSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to defaults for
    /// unset or blank keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_owned())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        let default_max_warns = match value("MAX_WARNS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("MAX_WARNS must be a positive integer, got `{raw}`"))?,
            None => defaults.default_max_warns,
        };
        if default_max_warns == 0 {
            bail!("MAX_WARNS must be at least 1");
        }

        Ok(Self {
            website_url: value("WEBSITE_URL").unwrap_or(defaults.website_url),
            default_max_warns,
            verified_role_name: value("VERIFIED_ROLE_NAME").unwrap_or(defaults.verified_role_name),
            unverified_role_name: value("UNVERIFIED_ROLE_NAME")
                .unwrap_or(defaults.unverified_role_name),
            verify_channel_name: value("VERIFY_CHANNEL_NAME")
                .unwrap_or(defaults.verify_channel_name),
            verify_category_name: value("VERIFY_CATEGORY_NAME")
                .unwrap_or(defaults.verify_category_name),
        })
    }

    /// Settings stamped onto newly created guild documents.
    pub fn guild_defaults(&self) -> GuildSettings {
        GuildSettings {
            max_warns: self.default_max_warns,
        }
    }

    pub fn verification_url(&self, guild_id: serenity::GuildId) -> String {
        format!(
            "{}/verify?guild={}",
            self.website_url.trim_end_matches('/'),
            guild_id
        )
    }
}
