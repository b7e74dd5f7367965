use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

// ============================================================================
// Category
// ============================================================================

/// Article groupings exposed by the Spaceflight News API.
///
/// Each variant maps to one top-level endpoint (`/{slug}/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Articles,
    Blogs,
    Reports,
    Technology,
    Science,
    Media,
    Arts,
    Launches,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 8] = [
        Category::Articles,
        Category::Blogs,
        Category::Reports,
        Category::Technology,
        Category::Science,
        Category::Media,
        Category::Arts,
        Category::Launches,
    ];

    /// Path segment used in API requests.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Articles => "articles",
            Self::Blogs => "blogs",
            Self::Reports => "reports",
            Self::Technology => "technology",
            Self::Science => "science",
            Self::Media => "media",
            Self::Arts => "arts",
            Self::Launches => "launches",
        }
    }

    /// Human-readable label for tabs and headings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Articles => "Articles",
            Self::Blogs => "Blogs",
            Self::Reports => "Reports",
            Self::Technology => "Technology",
            Self::Science => "Science",
            Self::Media => "Media",
            Self::Arts => "Arts",
            Self::Launches => "Launches",
        }
    }

    /// Parse a slug (case-insensitive).
    pub fn from_slug(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.slug() == s)
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next category, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping around.
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

// ============================================================================
// Article
// ============================================================================

/// A single news item as returned by the API.
///
/// `launches` and `events` are only ever checked for presence, so they are
/// reduced to entry counts during deserialization instead of keeping their
/// upstream structure around.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub url: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub news_site: String,
    #[serde(default)]
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "entry_count")]
    pub launches: usize,
    #[serde(default, deserialize_with = "entry_count")]
    pub events: usize,
}

impl Article {
    pub fn is_launch_related(&self) -> bool {
        self.launches > 0
    }

    pub fn has_event_coverage(&self) -> bool {
        self.events > 0
    }
}

/// One page of results from a list or search request.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticlePage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<Article>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Count the entries of an array of arbitrary values. `null` counts as zero.
fn entry_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<serde::de::IgnoredAny>> = Option::deserialize(deserializer)?;
    Ok(entries.map_or(0, |v| v.len()))
}
