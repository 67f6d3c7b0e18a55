use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A platform-defined grouping of currently live streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Popular,
    Nearby,
    Following,
    Recommended,
}

impl Category {
    /// All known categories, in the order they are searched by default
    pub const ALL: [Category; 4] = [
        Category::Popular,
        Category::Nearby,
        Category::Following,
        Category::Recommended,
    ];

    /// Returns the feed `tag` query value for this category
    pub fn feed_tag(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Nearby => "nearby",
            Self::Following => "following",
            // The platform still calls its recommendation feed "hottest"
            Self::Recommended => "hottest",
        }
    }

    /// Returns the display name used in reports and configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::Nearby => "Nearby",
            Self::Following => "Following",
            Self::Recommended => "Recommended",
        }
    }

    /// Parses a list of category names, defaulting to every category
    ///
    /// Duplicates are dropped while keeping the caller's order.
    pub fn parse_selection<S: AsRef<str>>(
        names: Option<&[S]>,
    ) -> Result<Vec<Category>, ConfigError> {
        let names = match names {
            Some(names) if !names.is_empty() => names,
            _ => return Ok(Self::ALL.to_vec()),
        };

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let category = name.as_ref().parse::<Category>()?;
            if !selected.contains(&category) {
                selected.push(category);
            }
        }
        Ok(selected)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    /// Accepts the display name or the feed tag, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle) || c.feed_tag() == needle)
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}
