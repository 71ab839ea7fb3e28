#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! For all things related to grading: content checks, output matching,
//! per-problem grading, and the run-level orchestration that folds results
//! into a score sheet.

/// Accumulates grading results over one run
pub mod aggregate;
/// Static content checks against submission text
pub mod content;
/// Expected-output matching for behavior checks
pub mod output;
/// Grades one submission file against one problem
pub mod problem;
/// Grading outcomes: points and structured notes
pub mod results;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tokio::{
    sync::{Mutex, Semaphore},
    task::JoinSet,
};
use tracing::{error, info, warn};

pub use self::{
    aggregate::{ScoringState, StudentRecord},
    problem::{ProblemGrader, SubmissionReadError},
    results::{GradeResult, Note, NoteKind},
};
use crate::{
    config::GraderConfig,
    process::Runner,
    rubric::Rubric,
    submission::{self, Submission},
};

/// Grades every student folder under the configured submissions root and
/// returns the accumulated scores.
///
/// Students are independent, so each is graded end-to-end by one task on a
/// bounded pool. The scoring state is the only shared mutable value and
/// every write goes through its mutex; the rubric is shared read-only.
pub async fn grade_run(config: &GraderConfig, rubric: Arc<Rubric>) -> Result<ScoringState> {
    let submissions = submission::discover(config.submissions_dir(), config.extension())?;
    info!("Grading {} student folder(s)", submissions.len());

    let runner = Runner::new(config.interpreter(), config.timeout());
    let state = Arc::new(Mutex::new(ScoringState::new()));
    let pool = Arc::new(Semaphore::new(config.jobs()));

    let mut tasks = JoinSet::new();
    for submission in submissions {
        let rubric = Arc::clone(&rubric);
        let state = Arc::clone(&state);
        let pool = Arc::clone(&pool);
        let runner = runner.clone();
        tasks.spawn(async move {
            let _permit = pool
                .acquire_owned()
                .await
                .context("grading pool closed unexpectedly")?;
            grade_student(&submission, &rubric, &runner, &state).await;
            Ok::<(), anyhow::Error>(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.context("grading task panicked")??;
    }

    let state = Arc::try_unwrap(state)
        .map_err(|_| anyhow!("scoring state still shared after all tasks finished"))?;
    Ok(state.into_inner())
}

/// Grades one student's folder end to end, folding each file's result into
/// the shared state. An unreadable file is logged and skipped; the student's
/// other files and every other student are unaffected.
async fn grade_student(
    submission: &Submission,
    rubric: &Rubric,
    runner: &Runner,
    state: &Mutex<ScoringState>,
) {
    info!("Grading folder: {}", submission.student());
    state
        .lock()
        .await
        .register(submission.student(), rubric.submission_points());

    for file in submission.files() {
        let Some((problem, entry)) = rubric.match_file(file) else {
            warn!("No problem name found for file: {}", file.display());
            continue;
        };
        info!("  Grading file: {} for problem: {}", file.display(), problem);

        let grader = ProblemGrader::builder()
            .problem(problem)
            .rubric(entry)
            .runner(runner)
            .build();
        match grader.grade(file).await {
            Ok(result) => {
                state
                    .lock()
                    .await
                    .fold(submission.student(), problem, result);
            }
            Err(e) => error!("{e}"),
        }
    }
}
