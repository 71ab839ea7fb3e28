#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Run configuration resolved from command-line values and the environment.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;

use crate::{process, util};

/// File extension graded when none is configured.
pub const DEFAULT_EXTENSION: &str = "py";

/// Settings for one grading run.
pub struct GraderConfig {
    /// Directory holding one folder per student.
    submissions_dir: PathBuf,
    /// Path to the rubric JSON document.
    rubric_path:     PathBuf,
    /// Wall-clock limit for each submission process.
    timeout:         Duration,
    /// Maximum number of student folders graded concurrently.
    jobs:            usize,
    /// Interpreter used to run submissions.
    interpreter:     OsString,
    /// Extension of submission files, without the leading dot.
    extension:       String,
}

impl GraderConfig {
    /// Resolves a configuration from command-line values, falling back to
    /// `TALLY_*` environment variables and then to built-in defaults.
    pub fn resolve(
        submissions_dir: PathBuf,
        rubric_path: PathBuf,
        timeout_secs: Option<u64>,
        jobs: Option<usize>,
        interpreter: Option<PathBuf>,
        extension: Option<String>,
    ) -> Result<Self> {
        let timeout = timeout_secs
            .or_else(|| env_parse("TALLY_TIMEOUT_SECS"))
            .map(Duration::from_secs)
            .unwrap_or(process::DEFAULT_TIMEOUT);
        let jobs = jobs
            .or_else(|| env_parse("TALLY_JOBS"))
            .unwrap_or_else(default_jobs)
            .max(1);
        let interpreter = match interpreter
            .map(PathBuf::into_os_string)
            .or_else(|| std::env::var_os("TALLY_INTERPRETER"))
        {
            Some(path) => path,
            None => util::python_path()?,
        };
        let extension = extension
            .or_else(|| std::env::var("TALLY_EXTENSION").ok())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        Ok(Self {
            submissions_dir,
            rubric_path,
            timeout,
            jobs,
            interpreter,
            extension,
        })
    }

    /// Returns the directory holding student folders.
    pub fn submissions_dir(&self) -> &Path {
        &self.submissions_dir
    }

    /// Returns the rubric path.
    pub fn rubric_path(&self) -> &Path {
        &self.rubric_path
    }

    /// Returns the per-process wall-clock limit.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of student folders graded concurrently.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Returns the interpreter used to run submissions.
    pub fn interpreter(&self) -> &OsStr {
        &self.interpreter
    }

    /// Returns the graded file extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Parses an environment variable, ignoring unset or malformed values.
fn env_parse<T: std::str::FromStr>(env: &str) -> Option<T> {
    std::env::var(env)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
}

/// Number of grading jobs used when neither the command line nor the
/// environment sets one.
fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    #[test]
    fn explicit_values_win() {
        let config = super::GraderConfig::resolve(
            PathBuf::from("submissions"),
            PathBuf::from("rubric.json"),
            Some(5),
            Some(2),
            Some(PathBuf::from("sh")),
            Some("py".to_string()),
        )
        .unwrap();

        assert_eq!(config.submissions_dir(), PathBuf::from("submissions"));
        assert_eq!(config.rubric_path(), PathBuf::from("rubric.json"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.jobs(), 2);
        assert_eq!(config.interpreter(), "sh");
        assert_eq!(config.extension(), "py");
    }

    #[test]
    fn zero_jobs_is_clamped_to_one() {
        let config = super::GraderConfig::resolve(
            PathBuf::from("submissions"),
            PathBuf::from("rubric.json"),
            Some(1),
            Some(0),
            Some(PathBuf::from("sh")),
            Some("py".to_string()),
        )
        .unwrap();

        assert_eq!(config.jobs(), 1);
    }
}
