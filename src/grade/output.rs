#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Expected-output matching for behavior checks.

use crate::rubric::Pattern;

/// True when the expected pattern occurs anywhere in the captured stdout.
///
/// This is deliberately a search, not an equality test: prompts, extra
/// whitespace, or additional prints around the graded value do not fail the
/// check. The flip side is that a short pattern can match inside unrelated
/// output; rubric authors are expected to write patterns long enough to be
/// unambiguous.
pub fn matches(expected: &Pattern, actual: &str) -> bool {
    expected.is_match(actual)
}

#[cfg(test)]
mod tests {
    use crate::rubric::Pattern;

    /// Compiles a pattern for the tests below.
    fn pattern(source: &str) -> Pattern {
        Pattern::compile(source).expect("test pattern should compile")
    }

    #[test]
    fn matches_anywhere_in_output() {
        assert!(super::matches(
            &pattern("hello, alice"),
            "Welcome!\nHello, Alice! Bye."
        ));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(super::matches(&pattern("HELLO, ALICE"), "hello, alice"));
    }

    #[test]
    fn rejects_disjoint_strings() {
        assert!(!super::matches(&pattern("hello, alice"), "goodbye, bob"));
    }

    #[test]
    fn substring_hits_are_accepted() {
        // A search, not an equality test: "5" inside "15" counts. Existing
        // rubrics rely on this looseness, so it stays.
        assert!(super::matches(&pattern("5"), "Result: 15"));
    }

    #[test]
    fn empty_output_matches_nothing_but_the_empty_pattern() {
        assert!(!super::matches(&pattern("anything"), ""));
        assert!(super::matches(&pattern(""), ""));
    }
}
