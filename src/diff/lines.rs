use serde::Serialize;

/// Status of a line in a version comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Unchanged,
    Added,
    Removed,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Unchanged => "unchanged",
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
        }
    }
}

/// A single line in a diff.
///
/// `line_number` is 1-based: it counts lines of the new text for
/// unchanged and added lines, and lines of the old text for removed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    pub status: DiffStatus,
    pub line_number: usize,
    pub content: String,
}

impl DiffLine {
    fn new(status: DiffStatus, line_number: usize, content: &str) -> Self {
        Self {
            status,
            line_number,
            content: content.to_string(),
        }
    }
}

/// Line counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        let mut summary = Self::default();
        for line in lines {
            match line.status {
                DiffStatus::Unchanged => summary.unchanged += 1,
                DiffStatus::Added => summary.added += 1,
                DiffStatus::Removed => summary.removed += 1,
            }
        }
        summary
    }

    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Compare two texts line by line.
///
/// This is a greedy two-cursor scan, not a minimal edit script: whenever
/// the lines under the cursors differ, the new line is reported as added
/// first and the old line is only reported as removed once the new side
/// is exhausted or stops matching. An edited line therefore shows up as
/// an added line followed (later) by a removed one.
pub fn diff_lines(old_text: &str, new_text: &str) -> Vec<DiffLine> {
    let old_lines = split_lines(old_text);
    let new_lines = split_lines(new_text);

    let mut result = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    let (mut i, mut j) = (0, 0);

    while i < old_lines.len() || j < new_lines.len() {
        match (old_lines.get(i), new_lines.get(j)) {
            (Some(old), Some(new)) if old == new => {
                result.push(DiffLine::new(DiffStatus::Unchanged, j + 1, new));
                i += 1;
                j += 1;
            }
            (_, Some(new)) => {
                result.push(DiffLine::new(DiffStatus::Added, j + 1, new));
                j += 1;
            }
            (Some(old), None) => {
                result.push(DiffLine::new(DiffStatus::Removed, i + 1, old));
                i += 1;
            }
            (None, None) => break,
        }
    }

    result
}

/// Rebuild one side of a diff: the new text when `new_side`, else the old
pub fn reconstruct(lines: &[DiffLine], new_side: bool) -> String {
    let skip = if new_side {
        DiffStatus::Removed
    } else {
        DiffStatus::Added
    };
    lines
        .iter()
        .filter(|line| line.status != skip)
        .map(|line| line.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(lines: &[DiffLine]) -> Vec<(DiffStatus, usize, &str)> {
        lines
            .iter()
            .map(|l| (l.status, l.line_number, l.content.as_str()))
            .collect()
    }

    #[test]
    fn test_identical_texts() {
        let diff = diff_lines("a\nb\nc", "a\nb\nc");
        assert_eq!(
            entries(&diff),
            vec![
                (DiffStatus::Unchanged, 1, "a"),
                (DiffStatus::Unchanged, 2, "b"),
                (DiffStatus::Unchanged, 3, "c"),
            ]
        );
    }

    #[test]
    fn test_from_empty() {
        assert_eq!(
            entries(&diff_lines("", "a\nb")),
            vec![(DiffStatus::Added, 1, "a"), (DiffStatus::Added, 2, "b")]
        );
    }

    #[test]
    fn test_to_empty() {
        assert_eq!(
            entries(&diff_lines("a\nb", "")),
            vec![(DiffStatus::Removed, 1, "a"), (DiffStatus::Removed, 2, "b")]
        );
    }

    #[test]
    fn test_both_empty() {
        assert!(diff_lines("", "").is_empty());
    }

    #[test]
    fn test_append() {
        assert_eq!(
            entries(&diff_lines("a\nb", "a\nb\nc")),
            vec![
                (DiffStatus::Unchanged, 1, "a"),
                (DiffStatus::Unchanged, 2, "b"),
                (DiffStatus::Added, 3, "c"),
            ]
        );
    }

    #[test]
    fn test_edit_is_added_then_removed() {
        // Once the cursors disagree the new side drains first, so the
        // unchanged tail is reported as added and then removed.
        assert_eq!(
            entries(&diff_lines("a\nb\nc", "a\nX\nc")),
            vec![
                (DiffStatus::Unchanged, 1, "a"),
                (DiffStatus::Added, 2, "X"),
                (DiffStatus::Added, 3, "c"),
                (DiffStatus::Removed, 2, "b"),
                (DiffStatus::Removed, 3, "c"),
            ]
        );
    }

    #[test]
    fn test_edit_on_last_line() {
        assert_eq!(
            entries(&diff_lines("a\nb", "a\nX")),
            vec![
                (DiffStatus::Unchanged, 1, "a"),
                (DiffStatus::Added, 2, "X"),
                (DiffStatus::Removed, 2, "b"),
            ]
        );
    }

    #[test]
    fn test_insert_at_top_resynchronises() {
        assert_eq!(
            entries(&diff_lines("a\nb", "z\na\nb")),
            vec![
                (DiffStatus::Added, 1, "z"),
                (DiffStatus::Unchanged, 2, "a"),
                (DiffStatus::Unchanged, 3, "b"),
            ]
        );
    }

    #[test]
    fn test_no_realignment_after_delete() {
        // A deleted first line is never skipped over: every new line is
        // reported as added and the old lines drain at the end.
        assert_eq!(
            entries(&diff_lines("z\na\nb", "a\nb")),
            vec![
                (DiffStatus::Added, 1, "a"),
                (DiffStatus::Added, 2, "b"),
                (DiffStatus::Removed, 1, "z"),
                (DiffStatus::Removed, 2, "a"),
                (DiffStatus::Removed, 3, "b"),
            ]
        );
    }

    #[test]
    fn test_trailing_newline_counts_as_line() {
        assert_eq!(
            entries(&diff_lines("a", "a\n")),
            vec![(DiffStatus::Unchanged, 1, "a"), (DiffStatus::Added, 2, "")]
        );
    }

    #[test]
    fn test_reconstruct_both_sides() {
        let cases = [
            ("a\nb\nc", "a\nX\nc"),
            ("", "a\nb"),
            ("x\ny\n", "y\nx"),
            ("one\n\nthree", "one\ntwo\nthree\n"),
        ];
        for (old, new) in cases {
            let diff = diff_lines(old, new);
            assert_eq!(reconstruct(&diff, true), new);
            assert_eq!(reconstruct(&diff, false), old);
        }
    }

    #[test]
    fn test_summary() {
        let summary = DiffSummary::from_lines(&diff_lines("a\nb\nc", "a\nX\nc"));
        assert_eq!(
            summary,
            DiffSummary {
                unchanged: 1,
                added: 2,
                removed: 2
            }
        );
        assert!(!summary.is_identical());
        assert!(DiffSummary::from_lines(&diff_lines("q", "q")).is_identical());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(diff_lines("", "a")).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "status": "added", "lineNumber": 1, "content": "a" }])
        );
    }
}
