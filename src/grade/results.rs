#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading outcomes: points plus structured discrepancy notes.

use std::{fmt::Display, time::Duration};

use serde::{Deserialize, Serialize};

/// The kinds of discrepancy a grading pass records. Every kind is a normal,
/// non-fatal outcome worth zero points for its check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    /// A required content field was not found in the submission text.
    MissingField {
        /// The rubric field that was not found.
        field: String,
    },
    /// The submission could not be started.
    LaunchFailure {
        /// Why the spawn failed.
        detail: String,
    },
    /// The submission exited with a non-zero status.
    RunError {
        /// Exit code, when the process exited normally.
        code: Option<i32>,
    },
    /// The submission outlived the wall-clock limit and was killed.
    Timeout {
        /// The limit that was exceeded.
        limit: Duration,
    },
    /// The captured stdout did not contain the expected pattern.
    OutputMismatch {
        /// Zero-based index of the behavior check.
        index:    usize,
        /// The expected pattern as written in the rubric.
        expected: String,
        /// Trimmed captured stdout.
        actual:   String,
    },
}

/// A single discrepancy recorded while grading one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// The problem the note belongs to.
    problem: String,
    /// What went wrong.
    kind:    NoteKind,
}

impl Note {
    /// Creates a note for a content field missing from the submission text.
    pub fn missing_field(problem: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            kind:    NoteKind::MissingField {
                field: field.into(),
            },
        }
    }

    /// Creates a note for a submission that could not be started.
    pub fn launch_failure(problem: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            kind:    NoteKind::LaunchFailure {
                detail: detail.into(),
            },
        }
    }

    /// Creates a note for a non-zero exit status.
    pub fn run_error(problem: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            problem: problem.into(),
            kind:    NoteKind::RunError { code },
        }
    }

    /// Creates a note for a run killed at the wall-clock limit.
    pub fn timeout(problem: impl Into<String>, limit: Duration) -> Self {
        Self {
            problem: problem.into(),
            kind:    NoteKind::Timeout { limit },
        }
    }

    /// Creates a note for output that did not contain the expected pattern.
    pub fn output_mismatch(
        problem: impl Into<String>,
        index: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            problem: problem.into(),
            kind:    NoteKind::OutputMismatch {
                index,
                expected: expected.into(),
                actual: actual.into(),
            },
        }
    }

    /// Returns the problem the note belongs to.
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Returns the kind of discrepancy.
    pub fn kind(&self) -> &NoteKind {
        &self.kind
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NoteKind::MissingField { field } => {
                write!(f, "Field '{}' not found in '{}'", field, self.problem)
            }
            NoteKind::LaunchFailure { detail } => {
                write!(f, "Error running '{}': {}", self.problem, detail)
            }
            NoteKind::RunError { code } => match code {
                Some(code) => {
                    write!(f, "Error running '{}': exit status {}", self.problem, code)
                }
                None => write!(f, "Error running '{}': killed by signal", self.problem),
            },
            NoteKind::Timeout { limit } => {
                write!(
                    f,
                    "Timeout running '{}' after {}s",
                    self.problem,
                    limit.as_secs()
                )
            }
            NoteKind::OutputMismatch {
                index,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Output mismatch for input '{index}':  Expected: {expected}  Got: {actual}"
                )
            }
        }
    }
}

/// Points and notes produced by grading one submission file against one
/// problem's rubric entry. Created fresh per grading call and owned by the
/// caller until folded into the scoring state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Points awarded across all checks.
    points: u32,
    /// Discrepancies, in check order.
    notes:  Vec<Note>,
}

impl GradeResult {
    /// Creates a result from accumulated points and notes.
    pub fn new(points: u32, notes: Vec<Note>) -> Self {
        Self { points, notes }
    }

    /// Returns the points awarded.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Returns the recorded notes, in check order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Splits the result into points and notes.
    pub fn into_parts(self) -> (u32, Vec<Note>) {
        (self.points, self.notes)
    }
}
