use regex::Regex;

/// Collect every non-overlapping match of each pattern.
///
/// Results are grouped by pattern: all matches of the first pattern in
/// source order, then all matches of the second, and so on. They are not
/// interleaved by position.
pub fn find_matches<'t>(text: &'t str, patterns: &[Regex]) -> Vec<&'t str> {
    patterns
        .iter()
        .flat_map(|pattern| pattern.find_iter(text).map(|found| found.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_grouped_by_pattern_order() {
        let patterns = vec![
            Regex::new(r"val\s+\w+").unwrap(),
            Regex::new(r"var\s+\w+").unwrap(),
        ];
        let text = "var a = 1\nval b = 2\nvar c = 3\nval d = 4\n";
        assert_eq!(
            find_matches(text, &patterns),
            vec!["val b", "val d", "var a", "var c"]
        );
    }

    #[test]
    fn no_patterns_or_no_hits_yield_nothing() {
        assert!(find_matches("fun main() {}", &[]).is_empty());
        let patterns = vec![Regex::new(r"while").unwrap()];
        assert!(find_matches("fun main() {}", &patterns).is_empty());
    }

    #[test]
    fn lazy_block_pattern_stops_at_first_closing_brace() {
        let patterns = vec![Regex::new(r"(?s)if\s*\([^{}\n]*?\)\s*\{.*?\}").unwrap()];
        let text = "if (a) {\n    b()\n}\nif (c) { d() }";
        assert_eq!(
            find_matches(text, &patterns),
            vec!["if (a) {\n    b()\n}", "if (c) { d() }"]
        );
    }
}
