use std::collections::HashMap;

use syntect::highlighting::{Color, Highlighter, Theme, ThemeSet};
use syntect::parsing::Scope;
use tracing::warn;

use super::lexicon::Lexicon;
use super::tokenizer::{tokenize_with, TokenKind};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

const TOKEN_KINDS: [TokenKind; 9] = [
    TokenKind::Keyword,
    TokenKind::Type,
    TokenKind::Function,
    TokenKind::String,
    TokenKind::Identifier,
    TokenKind::Comment,
    TokenKind::Number,
    TokenKind::Operator,
    TokenKind::Plain,
];

/// TextMate scope a token kind is coloured as
fn scope_name(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Keyword => Some("keyword.control"),
        TokenKind::Type => Some("storage.type"),
        TokenKind::Function => Some("entity.name.function"),
        TokenKind::String => Some("string.quoted"),
        TokenKind::Identifier => Some("variable.other"),
        TokenKind::Comment => Some("comment.line"),
        TokenKind::Number => Some("constant.numeric"),
        TokenKind::Operator => Some("keyword.operator"),
        TokenKind::Plain => None,
    }
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Syntax highlighter: Verse tokenizer plus colours from a syntect theme
pub struct SyntaxHighlighter {
    lexicon: Lexicon,
    colors: HashMap<TokenKind, String>,
    foreground: String,
    enabled: bool,
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME, Lexicon::default())
    }

    /// Build a highlighter for a named theme. Unknown names fall back to
    /// the default theme.
    pub fn with_theme(theme_name: &str, lexicon: Lexicon) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                warn!(theme = theme_name, "unknown syntax theme, using {}", DEFAULT_THEME);
                theme_set
                    .themes
                    .remove(DEFAULT_THEME)
                    .unwrap_or_default()
            }
        };

        let foreground = hex(theme.settings.foreground.unwrap_or(Color::WHITE));
        let colors = kind_colors(&theme, &foreground);

        Self {
            lexicon,
            colors,
            foreground,
            enabled: true,
        }
    }

    /// Disable colouring: every span gets the theme foreground
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Colour for a token kind as `#rrggbb`
    pub fn color_for(&self, kind: TokenKind) -> &str {
        if !self.enabled {
            return &self.foreground;
        }
        self.colors
            .get(&kind)
            .map(String::as_str)
            .unwrap_or(&self.foreground)
    }

    /// Highlight a code snippet and return styled spans
    pub fn highlight(&self, code: &str) -> Vec<HighlightedLine> {
        tokenize_with(code, &self.lexicon)
            .into_iter()
            .map(|tokens| HighlightedLine {
                spans: tokens
                    .into_iter()
                    .map(|token| HighlightedSpan {
                        text: token.text.to_string(),
                        color: self.color_for(token.kind).to_string(),
                        kind: token.kind,
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_colors(theme: &Theme, foreground: &str) -> HashMap<TokenKind, String> {
    let highlighter = Highlighter::new(theme);

    TOKEN_KINDS
        .iter()
        .map(|&kind| {
            let color = scope_name(kind)
                .and_then(|name| Scope::new(name).ok())
                .map(|scope| hex(highlighter.style_for_stack(&[scope]).foreground))
                .unwrap_or_else(|| foreground.to_string());
            (kind, color)
        })
        .collect()
}

/// A highlighted line consisting of styled spans
#[derive(Debug, Clone)]
pub struct HighlightedLine {
    pub spans: Vec<HighlightedSpan>,
}

/// A span of text with color
#[derive(Debug, Clone)]
pub struct HighlightedSpan {
    pub text: String,
    pub color: String,
    pub kind: TokenKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_verse() {
        let highlighter = SyntaxHighlighter::new();
        let code = "OnBegin<override>()<suspends>:void=\n    Print(\"Hello\")\n";
        let result = highlighter.highlight(code);

        assert_eq!(result.len(), 3);
        assert!(!result[0].spans.is_empty());
        assert!(result[2].spans.is_empty());
    }

    #[test]
    fn test_colors_are_hex() {
        let highlighter = SyntaxHighlighter::new();
        for span in &highlighter.highlight("if (X > 1.0) // done")[0].spans {
            assert_eq!(span.color.len(), 7);
            assert!(span.color.starts_with('#'));
        }
    }

    #[test]
    fn test_keyword_and_comment_colors_differ() {
        let highlighter = SyntaxHighlighter::new();
        assert_ne!(
            highlighter.color_for(TokenKind::Keyword),
            highlighter.color_for(TokenKind::Comment)
        );
    }

    #[test]
    fn test_disabled_uses_foreground() {
        let mut highlighter = SyntaxHighlighter::new();
        highlighter.set_enabled(false);
        assert_eq!(
            highlighter.color_for(TokenKind::Keyword),
            highlighter.color_for(TokenKind::Plain)
        );
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let fallback = SyntaxHighlighter::with_theme("no-such-theme", Lexicon::default());
        let default = SyntaxHighlighter::new();
        assert_eq!(
            fallback.color_for(TokenKind::String),
            default.color_for(TokenKind::String)
        );
    }
}
