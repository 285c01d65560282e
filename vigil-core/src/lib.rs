pub mod gateway;
pub mod ids;
pub mod moderation;
pub mod settings;
pub mod verification;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use vigil_database::GuildStore;

pub use settings::BotSettings;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub store: Arc<dyn GuildStore>,
    pub settings: Arc<BotSettings>,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
