//! Line-oriented lexer for Verse snippets.
//!
//! Every character of the input ends up in exactly one token, so the
//! token texts of a line always concatenate back to the line itself.
//! Nothing here can fail: unknown characters become `Plain` tokens,
//! unterminated strings run to the end of the line.

use serde::Serialize;

use super::lexicon::{Lexicon, WordClass};

const OPERATORS: &str = "+-*/=<>!&|^%:;,.(){}[]";

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Keyword,
    Type,
    Function,
    String,
    Identifier,
    Comment,
    Number,
    Operator,
    Plain,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Type => "type",
            TokenKind::Function => "function",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Comment => "comment",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Plain => "plain",
        }
    }
}

/// A classified slice of one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Tokenize `source` with the built-in keyword and type tables.
///
/// Returns one entry per `\n`-separated line; an empty source yields a
/// single empty line.
pub fn tokenize(source: &str) -> Vec<Vec<Token<'_>>> {
    tokenize_with(source, Lexicon::builtin())
}

/// Tokenize `source` using a custom lexicon
pub fn tokenize_with<'a>(source: &'a str, lexicon: &Lexicon) -> Vec<Vec<Token<'a>>> {
    source
        .split('\n')
        .map(|line| tokenize_line(line, lexicon))
        .collect()
}

/// Tokenize a single line (which must not contain `\n`)
pub fn tokenize_line<'a>(line: &'a str, lexicon: &Lexicon) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(first) = line[pos..].chars().next() {
        let rest = &line[pos..];
        let (kind, len) = scan(rest, first, lexicon);
        tokens.push(Token {
            kind,
            text: &rest[..len],
        });
        pos += len;
    }

    tokens
}

/// Classify the token at the start of `rest` and return its byte length.
/// Rule order is precedence order.
fn scan(rest: &str, first: char, lexicon: &Lexicon) -> (TokenKind, usize) {
    if rest.starts_with("//") {
        return (TokenKind::Comment, rest.len());
    }

    if first == '"' || first == '\'' {
        let len = match rest[1..].find(first) {
            Some(close) => close + 2,
            None => rest.len(),
        };
        return (TokenKind::String, len);
    }

    if first.is_ascii_digit() {
        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        return (TokenKind::Number, len);
    }

    if first.is_ascii_alphabetic() || first == '_' {
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let kind = match lexicon.classify(&rest[..len]) {
            Some(WordClass::Keyword) => TokenKind::Keyword,
            Some(WordClass::Type) => TokenKind::Type,
            None if rest[len..].starts_with('(') => TokenKind::Function,
            None => TokenKind::Identifier,
        };
        return (kind, len);
    }

    if OPERATORS.contains(first) {
        return (TokenKind::Operator, 1);
    }

    (TokenKind::Plain, first.len_utf8())
}
