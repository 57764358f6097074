//! Cleans raw bulk-check input into queries.

/// Characters that end a line: `\n`, `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line and paragraph
/// separators. `\r\n` splits twice and the empty piece is dropped.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split raw form input into trimmed, non-empty queries.
///
/// Order is preserved and duplicates are kept: repeated queries are
/// counted by the reconciler.
pub fn normalize_queries(raw: &str) -> Vec<String> {
    raw.split(LINE_BREAKS)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let raw = "  ABC-123 \n\n\t\nXYZ-000\r\n   \r\nABC-123";
        assert_eq!(normalize_queries(raw), vec!["ABC-123", "XYZ-000", "ABC-123"]);
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(normalize_queries("").is_empty());
        assert!(normalize_queries(" \n \r\n\t").is_empty());
    }

    #[test]
    fn old_mac_line_endings_split() {
        assert_eq!(normalize_queries("A\rB"), vec!["A", "B"]);
    }

    #[test]
    fn unicode_and_control_line_breaks_split() {
        assert_eq!(normalize_queries("A\x0cB"), vec!["A", "B"]);
        assert_eq!(
            normalize_queries("A\x0bB\x1cC\x1dD\x1eE\u{85}F\u{2028}G\u{2029}H"),
            vec!["A", "B", "C", "D", "E", "F", "G", "H"]
        );
    }
}
