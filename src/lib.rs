//! Verse script tooling: syntax highlighting, greedy line diffs, a local
//! script library, a community catalog, a bundled language reference and
//! an AI generation client.

pub mod ai;
pub mod community;
pub mod config;
pub mod diff;
pub mod docs;
pub mod error;
pub mod highlighting;
pub mod store;

pub use diff::{diff_lines, DiffLine, DiffStatus};
pub use error::VerseError;
pub use highlighting::{tokenize, Token, TokenKind};
