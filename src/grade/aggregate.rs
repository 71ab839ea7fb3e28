#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Accumulates grading results over one run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::results::{GradeResult, Note};

/// One student's running totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Total score, including base submission points.
    score:    u32,
    /// Notes from every graded file, in fold order.
    notes:    Vec<Note>,
    /// Problem id to the points earned on it.
    problems: HashMap<String, u32>,
}

impl StudentRecord {
    /// Returns the student's total score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns the accumulated notes, in fold order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the per-problem points map.
    pub fn problems(&self) -> &HashMap<String, u32> {
        &self.problems
    }
}

/// Scores accumulated over one grading run, then discarded.
///
/// Mutation is monotonic: scores only grow, notes only append, counts only
/// increment. Folding the same submission twice double-counts, so the
/// orchestrator grades each file exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringState {
    /// Student id to that student's record.
    students:       HashMap<String, StudentRecord>,
    /// Problem id to how many submissions matched it.
    problem_counts: HashMap<String, u32>,
}

impl ScoringState {
    /// Creates an empty scoring state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a student and applies the rubric's base submission points.
    /// Students who submitted nothing still get registered so they show up
    /// in the report.
    pub fn register(&mut self, student: &str, base_points: u32) {
        let record = self.students.entry(student.to_string()).or_default();
        record.score += base_points;
    }

    /// Folds one grading result into the state: adds the points, appends the
    /// notes in order, counts the problem, and records the per-problem score.
    /// A second file for the same problem overwrites the per-problem entry
    /// while the total keeps accumulating.
    pub fn fold(&mut self, student: &str, problem: &str, result: GradeResult) {
        *self.problem_counts.entry(problem.to_string()).or_insert(0) += 1;

        let (points, notes) = result.into_parts();
        let record = self.students.entry(student.to_string()).or_default();
        record.score += points;
        record.notes.extend(notes);
        record.problems.insert(problem.to_string(), points);
    }

    /// Returns one student's record.
    pub fn student(&self, student: &str) -> Option<&StudentRecord> {
        self.students.get(student)
    }

    /// Returns every student's record.
    pub fn students(&self) -> &HashMap<String, StudentRecord> {
        &self.students
    }

    /// Returns how many submissions matched each problem.
    pub fn problem_counts(&self) -> &HashMap<String, u32> {
        &self.problem_counts
    }
}
