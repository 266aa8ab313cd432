mod lines;

pub use lines::{diff_lines, reconstruct, DiffLine, DiffStatus, DiffSummary};
