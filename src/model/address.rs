use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::error::GraphError;

/// Account identifier used as the traversal unit.
///
/// Always trimmed and lowercased, so `0xABC` and `0xabc` are the same node.
/// No further format checks are made; an invalid address simply yields an
/// empty or failed history from the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(GraphError::EmptyAddress);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl FromStr for Address {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl fmt::Display for Address {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str { &self.0 }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}
