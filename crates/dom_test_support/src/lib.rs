pub mod fixtures;
pub mod recorder;

use dom::snapshot::DomSnapshot;
use std::fmt::Write;

pub use fixtures::{DropdownFixture, DropdownMarkup, OptionMarkup, load_json, load_toml};
pub use recorder::{EventRecorder, RecordedEvent};

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    let missing = "<missing>";
    let mismatch = (0..max).find(|&i| {
        let left = expected.get(i).map(String::as_str).unwrap_or(missing);
        let right = actual.get(i).map(String::as_str).unwrap_or(missing);
        left != right
    });
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Compare a snapshot against expected lines, panicking with a line diff.
pub fn assert_snapshot(snapshot: &DomSnapshot, expected: &[&str]) {
    let expected: Vec<String> = expected.iter().map(|s| (*s).to_string()).collect();
    let actual = snapshot.as_lines();
    if expected != actual {
        panic!("snapshot mismatch\n{}", diff_lines(&expected, actual));
    }
}

#[cfg(test)]
mod tests {
    use super::diff_lines;

    #[test]
    fn diff_points_at_first_mismatch() {
        let expected = vec!["a".to_string(), "b".to_string()];
        let actual = vec!["a".to_string(), "c".to_string(), "d".to_string()];
        let diff = diff_lines(&expected, &actual);
        assert!(diff.contains("first mismatch at line 2"));
        assert!(diff.contains(">    2  expected: b"));
        assert!(diff.contains("expected 2 lines, actual 3 lines"));
    }
}
