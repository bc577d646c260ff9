use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Prefix OWID uses for aggregate pseudo-countries (world, continents, income groups).
pub const AGGREGATE_PREFIX: &str = "OWID_";

/// ISO 3166-1 alpha-3 location code, or an OWID aggregate code such as `OWID_WRL`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoCode(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid location code {0:?}")]
pub struct InvalidIsoCode(pub String);

impl IsoCode {
    pub fn parse(raw: &str) -> Result<Self, InvalidIsoCode> {
        let code = raw.trim();
        let valid = if let Some(rest) = code.strip_prefix(AGGREGATE_PREFIX) {
            !rest.is_empty()
                && rest
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
        } else {
            code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
        };

        if valid {
            Ok(Self(code.to_string()))
        } else {
            Err(InvalidIsoCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for OWID pseudo-countries that never map onto a map region.
    pub fn is_aggregate(&self) -> bool {
        self.0.starts_with(AGGREGATE_PREFIX)
    }
}

impl fmt::Display for IsoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IsoCode {
    type Err = InvalidIsoCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for IsoCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IsoCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
