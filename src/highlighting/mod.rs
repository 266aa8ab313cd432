mod lexicon;
pub mod render;
mod theme;
mod tokenizer;

pub use lexicon::{Lexicon, WordClass, KEYWORDS, TYPES};
pub use render::{render_code, render_diff, render_tokens, DisplayNode, RenderOptions};
pub use theme::{HighlightedLine, HighlightedSpan, SyntaxHighlighter, DEFAULT_THEME};
pub use tokenizer::{tokenize, tokenize_line, tokenize_with, Token, TokenKind};
