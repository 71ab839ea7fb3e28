#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Finds student submission folders and their candidate source files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::find_files;

/// One student's submission folder and the source files found inside it.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Student identifier, taken from the folder name.
    student: String,
    /// The student's folder.
    dir:     PathBuf,
    /// Candidate source files, sorted by path.
    files:   Vec<PathBuf>,
}

impl Submission {
    /// Returns the student identifier.
    pub fn student(&self) -> &str {
        &self.student
    }

    /// Returns the student's folder.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the candidate source files, sorted by path.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Enumerates student folders directly under `root` and collects candidate
/// files with the given extension inside each. Folders with no matching
/// files are still returned so base submission points can apply. Everything
/// is sorted by name so runs are deterministic.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<Submission>> {
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Could not read submissions directory {}", root.display()))?;

    let mut submissions = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Could not read entry in {}", root.display()))?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let student = entry.file_name().to_string_lossy().into_owned();
        let mut files = find_files(extension, 0, &dir)?;
        files.sort();
        submissions.push(Submission {
            student,
            dir,
            files,
        });
    }

    submissions.sort_by(|a, b| a.student.cmp(&b.student));
    Ok(submissions)
}
