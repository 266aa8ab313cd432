//! Local script library.
//!
//! All scripts live in one JSON array on disk, most recent first. The
//! whole file is read and rewritten for every change.

mod record;

pub use record::{format_time_ago, format_timestamp, now_ms, SavedScript, ScriptVersion};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::diff::{diff_lines, DiffLine};
use crate::error::{Result, VerseError};

/// Oldest scripts are dropped beyond this many
pub const MAX_SCRIPTS: usize = 50;

const STORE_FILE: &str = "verse_scripts.json";

/// Returns the default store path: `<data dir>/versecraft/verse_scripts.json`
pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("versecraft").join(STORE_FILE))
}

pub struct ScriptStore {
    path: PathBuf,
}

impl ScriptStore {
    pub fn open_default() -> Result<Self> {
        let path = default_path().ok_or(VerseError::NoHomeDir("data"))?;
        Ok(Self::new(path))
    }

    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every script. A missing or unreadable file is an empty library.
    pub fn load(&self) -> Vec<SavedScript> {
        self.load_strict().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "could not read script library: {}", e);
            Vec::new()
        })
    }

    /// Read every script, failing on anything but a missing file.
    ///
    /// Every write goes through this so an unreadable library is never
    /// replaced by an empty one.
    pub fn load_strict(&self) -> Result<Vec<SavedScript>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, scripts: &[SavedScript]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(scripts)?;
        std::fs::write(&self.path, json)?;
        debug!(count = scripts.len(), "saved script library");
        Ok(())
    }

    /// Scripts whose title or prompt contains `query` (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<SavedScript> {
        let needle = query.to_lowercase();
        self.load()
            .into_iter()
            .filter(|s| {
                s.title.to_lowercase().contains(&needle) || s.prompt.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Look up a script by id or unique id prefix
    pub fn get(&self, id: &str) -> Result<SavedScript> {
        let scripts = self.load();
        let idx = find_index(&scripts, id)?;
        Ok(scripts[idx].clone())
    }

    /// Add a script at the front, trimming the library to [`MAX_SCRIPTS`]
    pub fn insert(&self, script: SavedScript) -> Result<()> {
        let mut scripts = self.load_strict()?;
        info!(id = %script.id, title = %script.title, "saving script");
        scripts.insert(0, script);
        scripts.truncate(MAX_SCRIPTS);
        self.save(&scripts)
    }

    pub fn delete(&self, id: &str) -> Result<SavedScript> {
        let mut scripts = self.load_strict()?;
        let idx = find_index(&scripts, id)?;
        let removed = scripts.remove(idx);
        self.save(&scripts)?;
        info!(id = %removed.id, "deleted script");
        Ok(removed)
    }

    /// Replace a script's content, keeping the old content as a version
    pub fn update_content(
        &self,
        id: &str,
        content: &str,
        description: &str,
        author: &str,
    ) -> Result<SavedScript> {
        self.modify(id, |script| {
            push_version(script, description, author);
            script.content = content.to_string();
            script.timestamp = now_ms();
        })
    }

    /// Make a stored version current. The content being replaced is kept
    /// as a new version, so a restore can itself be undone.
    pub fn restore_version(&self, id: &str, version: u32, author: &str) -> Result<SavedScript> {
        let code = self
            .get(id)?
            .version(version)
            .map(|v| v.code.clone())
            .ok_or(VerseError::InvalidVersion(version))?;

        self.modify(id, |script| {
            push_version(script, &format!("Before restoring version {}", version), author);
            script.content = code;
            script.timestamp = now_ms();
        })
    }

    /// Compare a stored version (old) with the current content (new)
    pub fn diff_version(&self, id: &str, version: u32) -> Result<Vec<DiffLine>> {
        let script = self.get(id)?;
        let old = script
            .version(version)
            .ok_or(VerseError::InvalidVersion(version))?;
        Ok(diff_lines(&old.code, &script.content))
    }

    fn modify<F>(&self, id: &str, change: F) -> Result<SavedScript>
    where
        F: FnOnce(&mut SavedScript),
    {
        let mut scripts = self.load_strict()?;
        let idx = find_index(&scripts, id)?;
        change(&mut scripts[idx]);
        let updated = scripts[idx].clone();
        self.save(&scripts)?;
        Ok(updated)
    }
}

fn push_version(script: &mut SavedScript, description: &str, author: &str) {
    let next_id = script.versions.iter().map(|v| v.id).max().unwrap_or(0) + 1;
    script.versions.push(ScriptVersion {
        id: next_id,
        timestamp: script.timestamp,
        description: description.to_string(),
        author_name: author.to_string(),
        code: script.content.clone(),
    });
}

/// Exact id match first, then a unique prefix
fn find_index(scripts: &[SavedScript], id: &str) -> Result<usize> {
    if let Some(idx) = scripts.iter().position(|s| s.id == id) {
        return Ok(idx);
    }
    if id.is_empty() {
        return Err(VerseError::NotFound(id.to_string()));
    }

    let mut matches = scripts
        .iter()
        .enumerate()
        .filter(|(_, s)| s.id.starts_with(id))
        .map(|(idx, _)| idx);

    match (matches.next(), matches.next()) {
        (Some(idx), None) => Ok(idx),
        (Some(_), Some(_)) => Err(VerseError::Ambiguous(id.to_string())),
        _ => Err(VerseError::NotFound(id.to_string())),
    }
}
