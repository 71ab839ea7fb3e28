//! Tests for content check evaluation.

use tally::{
    grade::{NoteKind, content},
    rubric::{ContentCheck, Pattern},
};

fn check(field: &str, patterns: &[&str], points: u32) -> ContentCheck {
    let patterns = patterns
        .iter()
        .map(|source| Pattern::compile(source).expect("compile pattern"))
        .collect();
    ContentCheck::new(field, patterns, points)
}

#[test]
fn awards_full_points_when_a_pattern_matches() {
    let checks = vec![check("greeting", &["hello"], 5)];
    let (points, notes) = content::evaluate("print('hello')", &checks, "greeting");

    assert_eq!(points, 5);
    assert!(notes.is_empty());
}

#[test]
fn matching_ignores_case() {
    let checks = vec![check("greeting", &["HELLO"], 5)];
    let (points, notes) = content::evaluate("print('Hello, world')", &checks, "greeting");

    assert_eq!(points, 5);
    assert!(notes.is_empty());
}

#[test]
fn any_alternative_satisfies_the_check() {
    let checks = vec![check("loop", &[r"for\s+\w+\s+in", "while"], 5)];
    let (points, notes) = content::evaluate("while True:\n    pass", &checks, "loops");

    assert_eq!(points, 5);
    assert!(notes.is_empty());
}

#[test]
fn missing_field_scores_zero_and_records_one_note() {
    let checks = vec![check("greeting", &["hello"], 5)];
    let (points, notes) = content::evaluate("print('goodbye')", &checks, "salutations");

    assert_eq!(points, 0);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].problem(), "salutations");
    assert!(matches!(
        notes[0].kind(),
        NoteKind::MissingField { field } if field == "greeting"
    ));
    assert_eq!(
        notes[0].to_string(),
        "Field 'greeting' not found in 'salutations'"
    );
}

#[test]
fn empty_alternative_list_is_never_satisfied() {
    let checks = vec![check("anything", &[], 5)];
    let (points, notes) = content::evaluate("any text at all", &checks, "p");

    assert_eq!(points, 0);
    assert_eq!(notes.len(), 1);
}

#[test]
fn checks_accumulate_independently() {
    let checks = vec![
        check("hello", &["hello"], 5),
        check("farewell", &["bye"], 4),
        check("loop", &["for"], 3),
    ];
    let (points, notes) = content::evaluate("hello and bye", &checks, "p");

    assert_eq!(points, 9);
    assert_eq!(notes.len(), 1);
    assert!(matches!(
        notes[0].kind(),
        NoteKind::MissingField { field } if field == "loop"
    ));
}
