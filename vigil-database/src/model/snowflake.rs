use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A platform-assigned 64-bit identifier.
///
/// Documents store snowflakes in their decimal string form, so the serde
/// impls write strings and accept either strings or JSON numbers back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(NonZeroU64);

impl Snowflake {
    /// Wrap a raw id. Returns `None` for zero, which the platform never issues.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Parse a bare id or a user/role/channel mention (`<@1>`, `<@!1>`, `<@&1>`, `<#1>`).
    pub fn parse_reference(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .map(|body| {
                body.trim_start_matches("@!")
                    .trim_start_matches("@&")
                    .trim_start_matches('@')
                    .trim_start_matches('#')
            })
            .unwrap_or(trimmed);

        inner.parse().ok()
    }
}

impl From<NonZeroU64> for Snowflake {
    fn from(raw: NonZeroU64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSnowflake;

impl fmt::Display for InvalidSnowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a non-zero 64-bit numeric id")
    }
}

impl std::error::Error for InvalidSnowflake {}

impl FromStr for Snowflake {
    type Err = InvalidSnowflake;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidSnowflake)
    }
}

impl TryFrom<i64> for Snowflake {
    type Error = InvalidSnowflake;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidSnowflake)
    }
}

impl TryFrom<Snowflake> for i64 {
    type Error = std::num::TryFromIntError;

    fn try_from(value: Snowflake) -> Result<Self, Self::Error> {
        i64::try_from(value.get())
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = Snowflake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a string or integer")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Snowflake::new(value).ok_or_else(|| E::custom(InvalidSnowflake))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Snowflake::try_from(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }
}
