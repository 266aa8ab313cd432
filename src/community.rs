//! Community script catalog: filtering, tag listing and sorting.

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, VerseError};

const BUNDLED_CATALOG: &str = include_str!("../assets/community_scripts.json");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl Votes {
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }
}

/// A shared script in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityScript {
    pub id: String,
    pub title: String,
    pub author: String,
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub votes: Votes,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub downloads: u32,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub created: String,
}

impl CommunityScript {
    /// Parsed creation time; unparseable dates sort as oldest
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(time) = DateTime::parse_from_rfc3339(&self.created) {
            return Some(time.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&self.created, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|time| time.and_utc())
    }

    fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
    }
}

/// Catalog ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Net votes, highest first
    #[default]
    Popular,
    /// Newest first
    Recent,
    /// Most downloaded first
    Downloads,
}

/// Query, tag and ordering options for browsing the catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub query: String,
    /// Every tag must be present on a script
    pub tags: Vec<String>,
    pub sort: SortOrder,
}

pub struct Catalog {
    scripts: Vec<CommunityScript>,
}

impl Catalog {
    /// The catalog shipped with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scripts: Vec<CommunityScript> = serde_json::from_str(json)?;
        debug!(count = scripts.len(), "loaded community catalog");
        Ok(Self { scripts })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn scripts(&self) -> &[CommunityScript] {
        &self.scripts
    }

    pub fn get(&self, id: &str) -> Result<&CommunityScript> {
        self.scripts
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| VerseError::NotFound(id.to_string()))
    }

    /// Sorted, de-duplicated tags across the catalog
    pub fn all_tags(&self) -> Vec<&str> {
        self.scripts
            .iter()
            .flat_map(|s| s.tags.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn browse(&self, filter: &CatalogFilter) -> Vec<&CommunityScript> {
        let needle = filter.query.to_lowercase();

        let mut scripts: Vec<&CommunityScript> = self
            .scripts
            .iter()
            .filter(|s| s.matches_query(&needle))
            .filter(|s| filter.tags.iter().all(|tag| s.tags.contains(tag)))
            .collect();

        match filter.sort {
            SortOrder::Popular => scripts.sort_by_key(|s| std::cmp::Reverse(s.votes.score())),
            SortOrder::Recent => scripts.sort_by_key(|s| std::cmp::Reverse(s.created_at())),
            SortOrder::Downloads => scripts.sort_by_key(|s| std::cmp::Reverse(s.downloads)),
        }

        scripts
    }
}
