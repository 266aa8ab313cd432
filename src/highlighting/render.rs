//! Terminal rendering of highlighted code and line diffs.
//!
//! Highlighted code is first arranged as a small tree of display nodes
//! (document, rows, spans). The ANSI writer walks that tree, and
//! [`DisplayNode::text`] recovers the plain text from it.

use std::fmt::Write as _;

use crate::diff::{DiffLine, DiffStatus};

use super::theme::HighlightedLine;

const RESET: &str = "\x1b[0m";
const RESET_FG: &str = "\x1b[39m";
const GUTTER_COLOR: &str = "#65737e";
const MARKED_BG: (u8, u8, u8) = (52, 61, 70);
const ADDED_BG: (u8, u8, u8) = (22, 58, 34);
const REMOVED_BG: (u8, u8, u8) = (72, 26, 30);
const ADDED_FG: &str = "#a3be8c";
const REMOVED_FG: &str = "#bf616a";

/// Layout options for code rendering
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub line_numbers: bool,
    /// 1-based line numbers drawn with a highlighted background
    pub marked_lines: Vec<usize>,
}

/// A node in the rendered document tree
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Span {
        text: String,
        color: Option<String>,
    },
    Row {
        number: Option<usize>,
        marked: bool,
        children: Vec<DisplayNode>,
    },
    Block {
        children: Vec<DisplayNode>,
    },
}

impl DisplayNode {
    /// All leaf text, depth-first, in document order
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            DisplayNode::Span { text, .. } => out.push_str(text),
            DisplayNode::Row { children, .. } | DisplayNode::Block { children } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Arrange highlighted lines into a document tree. Rows are separated by
/// uncoloured newline spans so the flattened text equals the source.
pub fn build_document(lines: &[HighlightedLine], options: &RenderOptions) -> DisplayNode {
    let mut children = Vec::with_capacity(lines.len() * 2);

    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            children.push(DisplayNode::Span {
                text: "\n".to_string(),
                color: None,
            });
        }

        let number = idx + 1;
        children.push(DisplayNode::Row {
            number: options.line_numbers.then_some(number),
            marked: options.marked_lines.contains(&number),
            children: line
                .spans
                .iter()
                .map(|span| DisplayNode::Span {
                    text: span.text.clone(),
                    color: Some(span.color.clone()),
                })
                .collect(),
        });
    }

    DisplayNode::Block { children }
}

/// Render a document tree with 24-bit ANSI colours
pub fn to_ansi(node: &DisplayNode, gutter_width: usize) -> String {
    let mut out = String::new();
    write_ansi(node, gutter_width, &mut out);
    out
}

fn write_ansi(node: &DisplayNode, gutter_width: usize, out: &mut String) {
    match node {
        DisplayNode::Span { text, color } => match color.as_deref().and_then(parse_hex) {
            Some(rgb) => {
                out.push_str(&fg(rgb));
                out.push_str(text);
                out.push_str(RESET_FG);
            }
            None => out.push_str(text),
        },
        DisplayNode::Row {
            number,
            marked,
            children,
        } => {
            if *marked {
                out.push_str(&bg(MARKED_BG));
            }
            if let Some(number) = number {
                write_gutter(out, &number.to_string(), gutter_width);
            }
            for child in children {
                write_ansi(child, gutter_width, out);
            }
            if *marked {
                out.push_str(RESET);
            }
        }
        DisplayNode::Block { children } => {
            for child in children {
                write_ansi(child, gutter_width, out);
            }
        }
    }
}

fn write_gutter(out: &mut String, label: &str, width: usize) {
    if let Some(rgb) = parse_hex(GUTTER_COLOR) {
        out.push_str(&fg(rgb));
    }
    let _ = write!(out, "{:>width$} ", label, width = width);
    out.push_str(RESET_FG);
}

/// Render highlighted code for the terminal
pub fn render_code(lines: &[HighlightedLine], options: &RenderOptions) -> String {
    let document = build_document(lines, options);
    to_ansi(&document, digits(lines.len()))
}

/// Token dump, one `kind:text` entry per token, one line per source line
pub fn render_tokens(lines: &[HighlightedLine]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| format!("{}:{:?}", span.kind.as_str(), span.text))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a line diff. Without colour the output is a plain
/// `<number> <marker> <content>` listing.
pub fn render_diff(lines: &[DiffLine], color: bool) -> String {
    let width = digits(lines.iter().map(|l| l.line_number).max().unwrap_or(0));
    let mut out = String::new();

    for line in lines {
        let marker = match line.status {
            DiffStatus::Added => '+',
            DiffStatus::Removed => '-',
            DiffStatus::Unchanged => ' ',
        };

        if !color {
            let _ = writeln!(
                out,
                "{:>width$} {} {}",
                line.line_number,
                marker,
                line.content,
                width = width
            );
            continue;
        }

        let palette = match line.status {
            DiffStatus::Added => Some((ADDED_BG, ADDED_FG)),
            DiffStatus::Removed => Some((REMOVED_BG, REMOVED_FG)),
            DiffStatus::Unchanged => None,
        };

        match palette {
            Some((background, foreground)) => {
                out.push_str(&bg(background));
                write_gutter(&mut out, &line.line_number.to_string(), width);
                if let Some(rgb) = parse_hex(foreground) {
                    out.push_str(&fg(rgb));
                }
                let _ = write!(out, "{} {}", marker, line.content);
                out.push_str(RESET);
            }
            None => {
                write_gutter(&mut out, &line.line_number.to_string(), width);
                let _ = write!(out, "{} {}", marker, line.content);
            }
        }
        out.push('\n');
    }

    out
}

fn digits(n: usize) -> usize {
    n.max(1).to_string().len()
}

fn fg((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

fn bg((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[48;2;{};{};{}m", r, g, b)
}

/// Parse `#rrggbb`
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_lines;
    use crate::highlighting::SyntaxHighlighter;

    #[test]
    fn test_document_text_is_source() {
        let source = "x := 1\n\n// done\n";
        let lines = SyntaxHighlighter::new().highlight(source);
        let options = RenderOptions {
            line_numbers: true,
            marked_lines: vec![2],
        };
        assert_eq!(build_document(&lines, &options).text(), source);
    }

    #[test]
    fn test_flatten_is_depth_first() {
        let tree = DisplayNode::Block {
            children: vec![
                DisplayNode::Span {
                    text: "a".into(),
                    color: None,
                },
                DisplayNode::Row {
                    number: None,
                    marked: false,
                    children: vec![
                        DisplayNode::Span {
                            text: "b".into(),
                            color: None,
                        },
                        DisplayNode::Block {
                            children: vec![DisplayNode::Span {
                                text: "c".into(),
                                color: Some("#ffffff".into()),
                            }],
                        },
                    ],
                },
                DisplayNode::Span {
                    text: "d".into(),
                    color: None,
                },
            ],
        };
        assert_eq!(tree.text(), "abcd");
    }

    #[test]
    fn test_marked_rows() {
        let lines = SyntaxHighlighter::new().highlight("a\nb\nc");
        let options = RenderOptions {
            line_numbers: false,
            marked_lines: vec![2],
        };
        let DisplayNode::Block { children } = build_document(&lines, &options) else {
            panic!("expected block");
        };
        let marked: Vec<bool> = children
            .iter()
            .filter_map(|node| match node {
                DisplayNode::Row { marked, .. } => Some(*marked),
                _ => None,
            })
            .collect();
        assert_eq!(marked, vec![false, true, false]);
    }

    #[test]
    fn test_render_code_has_gutter_and_colors() {
        let lines = SyntaxHighlighter::new().highlight("if");
        let out = render_code(
            &lines,
            &RenderOptions {
                line_numbers: true,
                marked_lines: vec![],
            },
        );
        assert!(out.contains("1 "));
        assert!(out.contains("\x1b[38;2;"));
        assert!(out.contains("if"));
    }

    #[test]
    fn test_render_tokens() {
        let lines = SyntaxHighlighter::new().highlight("f(1)");
        assert_eq!(
            render_tokens(&lines),
            r#"function:"f" operator:"(" number:"1" operator:")""#
        );
    }

    #[test]
    fn test_render_diff_plain() {
        let diff = diff_lines("a\nb\nc", "a\nX\nc");
        assert_eq!(render_diff(&diff, false), "1   a\n2 + X\n3 + c\n2 - b\n3 - c\n");
    }

    #[test]
    fn test_render_diff_color() {
        let diff = diff_lines("a", "b");
        let out = render_diff(&diff, true);
        assert!(out.contains("+ b"));
        assert!(out.contains("- a"));
        assert!(out.contains("\x1b[48;2;"));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#c0c5ce"), Some((0xc0, 0xc5, 0xce)));
        assert_eq!(parse_hex("c0c5ce"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
        assert_eq!(parse_hex("#fff"), None);
    }
}
