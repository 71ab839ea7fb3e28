#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Renders scoring state and rubric summaries for the terminal.

use colored::Colorize;
use itertools::Itertools;
use similar::{Algorithm, ChangeTag, utils::diff_unicode_words};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use crate::{
    grade::{Note, NoteKind, ScoringState},
    rubric::Rubric,
};

/// Row in the problems-solved overview table.
#[derive(Tabled)]
struct ProblemRow {
    /// Problem identifier.
    #[tabled(rename = "Problem")]
    problem:     String,
    /// How many submissions matched the problem.
    #[tabled(rename = "Submissions")]
    submissions: u32,
}

/// Row in the per-student overview table.
#[derive(Tabled)]
struct StudentRow {
    /// Student identifier.
    #[tabled(rename = "Student")]
    student:  String,
    /// Total score.
    #[tabled(rename = "Score")]
    score:    u32,
    /// Problems with a graded submission, comma separated.
    #[tabled(rename = "Problems solved")]
    problems: String,
    /// Number of notes recorded.
    #[tabled(rename = "Notes")]
    notes:    usize,
}

/// Row in the rubric summary table.
#[derive(Tabled)]
struct RubricRow {
    /// Problem identifier.
    #[tabled(rename = "Problem")]
    problem:  String,
    /// Accepted file names, comma separated.
    #[tabled(rename = "Accepted files")]
    files:    String,
    /// Number of content checks.
    #[tabled(rename = "Content checks")]
    content:  usize,
    /// Number of behavior checks.
    #[tabled(rename = "Behavior checks")]
    behavior: usize,
    /// Maximum obtainable points.
    #[tabled(rename = "Points")]
    points:   u32,
}

/// Renders the full run report: the problems-solved overview, the student
/// overview, then every student's notes.
pub fn render(state: &ScoringState) -> String {
    let mut out = String::new();
    out.push_str(&problems_table(state).to_string());
    out.push_str("\n\n");
    out.push_str(&students_table(state).to_string());

    for (student, record) in state.students().iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        if record.notes().is_empty() {
            continue;
        }
        out.push_str(&format!("\n\nNotes for {student}:\n"));
        for note in record.notes() {
            out.push_str(&format!("  {}\n", render_note(note)));
        }
    }

    out
}

/// Builds the problems-solved overview table.
fn problems_table(state: &ScoringState) -> Table {
    let rows: Vec<ProblemRow> = state
        .problem_counts()
        .iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(problem, count)| ProblemRow {
            problem:     problem.clone(),
            submissions: *count,
        })
        .collect();

    let total: u32 = rows.iter().map(|row| row.submissions).sum();
    let mut table = Table::new(&rows);
    table
        .with(Panel::header("Problems solved overview"))
        .with(Panel::footer(format!("Total submissions: {total}")))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::last()).with(Alignment::center()))
        .with(Style::modern());
    table
}

/// Builds the per-student overview table.
fn students_table(state: &ScoringState) -> Table {
    let rows: Vec<StudentRow> = state
        .students()
        .iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(student, record)| StudentRow {
            student:  student.clone(),
            score:    record.score(),
            problems: record.problems().keys().sorted().join(", "),
            notes:    record.notes().len(),
        })
        .collect();

    let total: u32 = rows.iter().map(|row| row.score).sum();
    let mut table = Table::new(&rows);
    table
        .with(Panel::header("Student overview"))
        .with(Panel::footer(format!("Total: {total} points")))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::last()).with(Alignment::center()))
        .with(Style::modern());
    table
}

/// Renders one note, highlighting expected/actual word differences for
/// output mismatches.
fn render_note(note: &Note) -> String {
    match note.kind() {
        NoteKind::OutputMismatch {
            index,
            expected,
            actual,
        } => {
            let (expected, actual) = highlight_diff(expected, actual);
            format!(
                "Output mismatch for input '{index}' in '{}':  Expected: {expected}  Got: \
                 {actual}",
                note.problem()
            )
        }
        _ => note.to_string(),
    }
}

/// Word-level diff of expected vs actual, colored for the terminal.
fn highlight_diff(expected_src: &str, actual_src: &str) -> (String, String) {
    let diff = diff_unicode_words(Algorithm::Patience, expected_src, actual_src);

    let mut expected = String::new();
    let mut actual = String::new();
    for (change, value) in diff {
        match change {
            ChangeTag::Equal => {
                expected.push_str(value);
                actual.push_str(value);
            }
            ChangeTag::Delete => {
                expected.push_str(format!("{}", value.red()).as_str());
            }
            ChangeTag::Insert => {
                actual.push_str(format!("{}", value.green()).as_str());
            }
        }
    }

    (expected, actual)
}

/// Describes a validated rubric: each problem, its accepted file names,
/// check counts, and obtainable points.
pub fn describe_rubric(rubric: &Rubric) -> String {
    let rows: Vec<RubricRow> = rubric
        .problems()
        .map(|(problem, entry)| RubricRow {
            problem:  problem.to_string(),
            files:    rubric
                .accepted_filenames()
                .filter(|(_, owner)| *owner == problem)
                .map(|(file, _)| file)
                .join(", "),
            content:  entry.content_checks().len(),
            behavior: entry.behavior_checks().len(),
            points:   entry.possible_points(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table
        .with(Panel::header("Rubric overview"))
        .with(Panel::footer(format!(
            "Points for submission: {}",
            rubric.submission_points()
        )))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::last()).with(Alignment::center()))
        .with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use crate::grade::{GradeResult, Note, ScoringState};

    #[test]
    fn report_shows_scores_and_notes() {
        let mut state = ScoringState::new();
        state.register("alice", 0);
        state.fold(
            "alice",
            "greeting",
            GradeResult::new(
                5,
                vec![Note::output_mismatch("greeting", 0, "hello, alice", "")],
            ),
        );

        let rendered = super::render(&state);
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("greeting"));
        assert!(rendered.contains("Output mismatch"));
        assert!(rendered.contains("Problems solved overview"));
        assert!(rendered.contains("Student overview"));
    }

    #[test]
    fn students_without_notes_get_no_notes_section() {
        let mut state = ScoringState::new();
        state.register("bob", 2);

        let rendered = super::render(&state);
        assert!(rendered.contains("bob"));
        assert!(!rendered.contains("Notes for bob"));
    }
}
