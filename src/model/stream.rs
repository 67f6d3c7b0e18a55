use crate::model::Category;
use std::collections::HashSet;

/// A live stream found on a feed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRef {
    /// Identifies the live session
    pub stream_id: String,

    /// Identifies the hosting account
    pub broadcaster_id: String,

    /// Broadcaster display name, if the feed carried one
    pub broadcaster_name: Option<String>,

    /// Feed the stream was found in
    pub category: Category,
}

/// The accounts the caller is looking for
///
/// Identifiers are trimmed; blank entries are dropped and duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    ids: HashSet<String>,
}

impl TargetSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(|id| id.as_ref().trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.ids.contains(account_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
