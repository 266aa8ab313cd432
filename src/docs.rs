//! Bundled Verse language reference with example snippets.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VerseError};

const BUNDLED_DOCS: &str = include_str!("../assets/docs.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocExample {
    pub title: String,
    pub code: String,
}

/// One topic of the reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSection {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub examples: Vec<DocExample>,
}

impl DocSection {
    fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

pub struct Docs {
    sections: Vec<DocSection>,
}

impl Docs {
    /// The reference shipped with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DOCS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let sections: Vec<DocSection> = serde_json::from_str(json)?;
        debug!(count = sections.len(), "loaded documentation");
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[DocSection] {
        &self.sections
    }

    /// Section by id, ignoring case
    pub fn get(&self, id: &str) -> Result<&DocSection> {
        self.sections
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| VerseError::NotFound(id.to_string()))
    }

    /// Sections whose title or text contains `query` (case-insensitive),
    /// in reference order. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&DocSection> {
        let needle = query.trim().to_lowercase();
        self.sections
            .iter()
            .filter(|s| s.matches_query(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighting::{tokenize, TokenKind};
    use pretty_assertions::assert_eq;

    const DOCS: &str = r#"[
        { "id": "basics", "title": "Verse Basics", "content": "Devices and OnBegin",
          "examples": [{ "title": "Hello", "code": "Print(\"hi\")" }] },
        { "id": "arrays", "title": "Arrays & Collections", "content": "Ordered values and maps" },
        { "id": "functions", "title": "Functions", "content": "Reusable logic, may use <suspends>" }
    ]"#;

    fn ids(sections: &[&DocSection]) -> Vec<String> {
        sections.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_bundled_docs_parse() {
        let docs = Docs::bundled().unwrap();
        assert!(docs.sections().len() >= 5);
        assert!(docs.sections().iter().all(|s| !s.examples.is_empty()));
    }

    #[test]
    fn test_bundled_examples_highlight() {
        let docs = Docs::bundled().unwrap();
        let basics = docs.get("basics").unwrap();
        let lines = tokenize(&basics.examples[0].code);
        assert_eq!(lines[0][0].kind, TokenKind::Keyword);
        assert!(lines
            .iter()
            .flatten()
            .any(|t| t.kind == TokenKind::Function && t.text == "Print"));
    }

    #[test]
    fn test_search_title_and_content() {
        let docs = Docs::from_json(DOCS).unwrap();
        assert_eq!(ids(&docs.search("ARRAYS")), vec!["arrays"]);
        assert_eq!(ids(&docs.search("suspends")), vec!["functions"]);
        assert_eq!(ids(&docs.search("o")), vec!["basics", "arrays", "functions"]);
        assert!(docs.search("zombie").is_empty());
    }

    #[test]
    fn test_empty_query_lists_everything() {
        let docs = Docs::from_json(DOCS).unwrap();
        assert_eq!(docs.search("  ").len(), 3);
    }

    #[test]
    fn test_get() {
        let docs = Docs::from_json(DOCS).unwrap();
        assert_eq!(docs.get("Functions").unwrap().title, "Functions");
        assert!(docs.get("arrays").unwrap().examples.is_empty());
        assert!(matches!(docs.get("missing"), Err(VerseError::NotFound(_))));
    }
}
