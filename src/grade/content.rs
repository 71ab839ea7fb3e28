#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Static content checks against submission text.

use super::results::Note;
use crate::rubric::ContentCheck;

/// Scores submission text against a problem's content checks.
///
/// A check is satisfied as soon as any of its alternative patterns matches
/// the text; satisfied checks contribute their full point value, unsatisfied
/// checks contribute zero and record a note naming the missing field.
/// Absence is a normal outcome, not an error.
pub fn evaluate(text: &str, checks: &[ContentCheck], problem: &str) -> (u32, Vec<Note>) {
    let mut points = 0;
    let mut notes = Vec::new();

    for check in checks {
        let found = check
            .patterns()
            .iter()
            .any(|pattern| pattern.is_match(text));
        if found {
            points += check.points();
        } else {
            notes.push(Note::missing_field(problem, check.field()));
        }
    }

    (points, notes)
}
