use chrono::{DateTime, Utc};

/// Discord timestamp markup styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampStyle {
    /// `2 hours ago`
    Relative,
    /// `20 April 2021 16:20`
    LongDateTime,
    /// `20/04/2021`
    ShortDate,
}

impl TimestampStyle {
    fn flag(self) -> char {
        match self {
            Self::Relative => 'R',
            Self::LongDateTime => 'f',
            Self::ShortDate => 'd',
        }
    }
}

/// Render a timestamp that each client shows in its own locale.
pub fn discord_timestamp(at: DateTime<Utc>, style: TimestampStyle) -> String {
    format!("<t:{}:{}>", at.timestamp(), style.flag())
}
