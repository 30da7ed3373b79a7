//! Line sequence derived from rendered document text.

/// Split rendered text into lines in reading order.
///
/// Nothing is dropped or reordered; blank lines are kept so line counts match
/// the source. Trimming happens in the reducer, right before matching.
pub fn line_sequence(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order_and_blank_lines() {
        let lines: Vec<&str> = line_sequence("a\r\n\n  b  \nc").collect();
        assert_eq!(lines, vec!["a", "", "  b  ", "c"]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert_eq!(line_sequence("").count(), 0);
    }
}
