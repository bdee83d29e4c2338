//! Formatting utilities for CLI output.

/// Truncate `s` to at most `max_chars` characters, ending in `...` when cut.
///
/// Newlines are flattened to spaces so a snippet stays on one line.
pub fn truncate_snippet(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_chars {
        return flat;
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let kept: String = flat.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}
