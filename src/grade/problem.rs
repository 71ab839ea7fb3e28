#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grades one submission file against one problem's rubric entry.

use std::path::{Path, PathBuf};

use bon::Builder;
use thiserror::Error;
use tracing::debug;

use super::{
    content, output,
    results::{GradeResult, Note},
};
use crate::{
    process::{RunOutcome, Runner},
    rubric::ProblemRubric,
};

/// The submission file could not be read; grading of that file stops here.
/// Every other failure while grading is captured as a note instead.
#[derive(Error, Debug)]
#[error("Could not read submission {}: {source}", path.display())]
pub struct SubmissionReadError {
    /// The file that could not be read.
    pub path:   PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: std::io::Error,
}

/// Grades one submission file against one problem's rubric entry.
///
/// Content checks run first, then behavior checks strictly in rubric order,
/// since only list position pairs an input with its expected output. Each
/// check is attempted independently; a timeout or failed run records a note
/// and grading moves on.
#[derive(Debug, Clone, Builder)]
pub struct ProblemGrader<'g> {
    /// Problem identifier used in notes.
    problem: &'g str,
    /// The rubric entry to grade against.
    rubric:  &'g ProblemRubric,
    /// Runner used for behavior checks.
    runner:  &'g Runner,
}

impl ProblemGrader<'_> {
    /// Grades the file at `path`, returning accumulated points and notes.
    pub async fn grade(&self, path: &Path) -> Result<GradeResult, SubmissionReadError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SubmissionReadError {
                path: path.to_path_buf(),
                source,
            })?;

        let (mut points, mut notes) =
            content::evaluate(&text, self.rubric.content_checks(), self.problem);

        for (index, check) in self.rubric.behavior_checks().iter().enumerate() {
            match self.runner.run(path, check.input()).await {
                RunOutcome::Completed {
                    stdout,
                    stderr,
                    status,
                } => {
                    if !status.success() {
                        debug!(
                            "{} exited with {status} on check {index}: {}",
                            path.display(),
                            stderr.trim()
                        );
                        notes.push(Note::run_error(self.problem, status.code()));
                    }
                    // Partial output may already be correct, so match anyway.
                    if output::matches(check.expected(), &stdout) {
                        points += self.rubric.points_per_check();
                    } else {
                        notes.push(Note::output_mismatch(
                            self.problem,
                            index,
                            check.expected().as_str(),
                            stdout.trim(),
                        ));
                    }
                }
                RunOutcome::TimedOut { limit } => {
                    notes.push(Note::timeout(self.problem, limit));
                }
                RunOutcome::LaunchFailed { reason } => {
                    notes.push(Note::launch_failure(self.problem, reason));
                }
            }
        }

        Ok(GradeResult::new(points, notes))
    }
}
