use crate::model::{Category, Credits, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile links for both sides of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLinks {
    pub target: String,
    pub streamer: String,
}

/// One observed co-occurrence of a target account and a live stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Position in the report, starting at 1
    pub ordinal: u64,
    pub streamer_id: String,
    pub streamer_name: Option<String>,
    pub target_account_id: String,
    pub target_display_name: Option<String>,
    pub credits: Credits,
    pub profile_links: ProfileLinks,
    pub stream_link: String,
    pub role: Role,
    pub category: Category,
    pub vip_status: Option<String>,
    pub gender: Option<String>,
    pub is_subscriber: Option<bool>,
    pub fan_level: Option<i64>,
    pub incognito: Option<bool>,
}

/// The result of one presence search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub matches: Vec<MatchRecord>,
    pub total_found: usize,
    pub searched_streams_count: u64,
    pub categories_searched: Vec<Category>,
    pub started_at: DateTime<Utc>,
}

impl SearchReport {
    /// Creates an empty report for a search that starts now
    pub fn empty(categories: Vec<Category>, started_at: DateTime<Utc>) -> Self {
        Self {
            matches: Vec::new(),
            total_found: 0,
            searched_streams_count: 0,
            categories_searched: categories,
            started_at,
        }
    }

    /// Returns true when the search ran but found nobody
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
