pub mod gateway;
pub mod replies;
pub mod moderation;
pub mod utility;
pub mod verification;

use vigil_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    moderation::warn::META,
    moderation::warnings::META,
    moderation::clearwarns::META,
    moderation::maxwarns::META,
    moderation::kick::META,
    moderation::ban::META,
    moderation::unban::META,
    moderation::serverstats::META,
    verification::verifypanel::META,
    verification::manverify::META,
    verification::verifystatus::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        moderation::warn::warn(),
        moderation::warnings::warnings(),
        moderation::clearwarns::clearwarns(),
        moderation::maxwarns::maxwarns(),
        moderation::kick::kick(),
        moderation::ban::ban(),
        moderation::unban::unban(),
        moderation::serverstats::serverstats(),
        verification::verifypanel::verifypanel(),
        verification::manverify::manverify(),
        verification::verifystatus::verifystatus(),
    ]
}
