//! Reserved words and built-in type names recognised by the tokenizer.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Verse keywords, matched case-insensitively
pub const KEYWORDS: &[&str] = &[
    "using", "import", "class", "struct", "interface", "enum", "const", "var", "let", "if", "else",
    "switch", "case", "default", "for", "while", "do", "break", "continue", "return", "true",
    "false", "null", "void", "public", "private", "protected", "static", "override", "abstract",
    "virtual", "extern", "internal", "readonly", "new", "this", "base",
];

/// Built-in and gameplay type names, matched case-insensitively
pub const TYPES: &[&str] = &[
    "int", "float", "double", "string", "bool", "array", "map", "vector2", "vector3", "rotation",
    "color", "player", "agent", "team", "device", "creative", "gameplay", "tuple",
];

static DEFAULT_LEXICON: LazyLock<Lexicon> =
    LazyLock::new(|| Lexicon::with_extras::<&str>(&[], &[]));

/// How a bare word is classified before the call-site check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Keyword,
    Type,
}

/// Immutable lookup table from lowercase word to classification.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, WordClass>,
}

impl Lexicon {
    /// The built-in table shared by every default tokenizer call
    pub fn builtin() -> &'static Lexicon {
        &DEFAULT_LEXICON
    }

    /// Build a table from the built-in words plus user supplied ones.
    ///
    /// Keywords win over types when a word appears in both lists.
    pub fn with_extras<S: AsRef<str>>(extra_keywords: &[S], extra_types: &[S]) -> Self {
        let mut words = HashMap::new();

        let types = TYPES
            .iter()
            .copied()
            .chain(extra_types.iter().map(|s| s.as_ref()));
        for word in types {
            words.insert(word.to_ascii_lowercase(), WordClass::Type);
        }

        let keywords = KEYWORDS
            .iter()
            .copied()
            .chain(extra_keywords.iter().map(|s| s.as_ref()));
        for word in keywords {
            words.insert(word.to_ascii_lowercase(), WordClass::Keyword);
        }

        Self { words }
    }

    /// Classify a word, ignoring ASCII case
    pub fn classify(&self, word: &str) -> Option<WordClass> {
        self.words.get(&word.to_ascii_lowercase()).copied()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
