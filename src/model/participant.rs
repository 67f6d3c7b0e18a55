use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// How an account took part in a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Gifter,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gifter => f.write_str("gifter"),
            Self::Viewer => f.write_str("viewer"),
        }
    }
}

/// Credits an account spent in a stream
///
/// Viewers carry no credit amount. On the wire the sentinel is the string
/// `"viewer"`, amounts are plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credits {
    Amount(u64),
    Viewer,
}

const NO_CREDITS: &str = "viewer";

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(amount) => serializer.serialize_u64(*amount),
            Self::Viewer => serializer.serialize_str(NO_CREDITS),
        }
    }
}

impl<'de> Deserialize<'de> for Credits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Amount(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Amount(amount) => Ok(Self::Amount(amount)),
            Raw::Text(text) if text == NO_CREDITS => Ok(Self::Viewer),
            Raw::Text(text) => Err(serde::de::Error::custom(format!(
                "expected a credit amount or \"{}\", got \"{}\"",
                NO_CREDITS, text
            ))),
        }
    }
}

/// An account listed in a stream's social list
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub account_id: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub credits: Credits,
    pub vip_status: Option<String>,
    pub gender: Option<String>,
    pub is_subscriber: Option<bool>,
    pub fan_level: Option<i64>,
    pub incognito: Option<bool>,
}
