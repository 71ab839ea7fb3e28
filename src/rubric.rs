#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rubric model: the on-disk document shape and the validated, immutable
//! form the grading run shares.

use std::{collections::BTreeMap, fmt::Display, path::Path};

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors produced while validating a rubric document.
#[derive(Error, Debug)]
pub enum RubricError {
    /// A content-check pattern does not compile.
    #[error("Invalid pattern `{pattern}` for field `{field}` of problem `{problem}`: {source}")]
    InvalidPattern {
        /// Problem the pattern belongs to.
        problem: String,
        /// Field the pattern belongs to.
        field:   String,
        /// The pattern as written.
        pattern: String,
        /// The underlying compile error.
        source:  regex::Error,
    },

    /// An expected-output pattern does not compile.
    #[error("Invalid expected output `{pattern}` for problem `{problem}`: {source}")]
    InvalidExpectedOutput {
        /// Problem the pattern belongs to.
        problem: String,
        /// The pattern as written.
        pattern: String,
        /// The underlying compile error.
        source:  regex::Error,
    },

    /// Simulated inputs and expected outputs differ in length.
    #[error(
        "Problem `{problem}` has {inputs} simulated inputs but {outputs} expected outputs; the \
         two lists must pair up by index"
    )]
    MisalignedChecks {
        /// Problem with the mismatch.
        problem: String,
        /// Number of simulated inputs.
        inputs:  usize,
        /// Number of expected outputs.
        outputs: usize,
    },

    /// A problem has accepted filenames but no rubric entry, which would make
    /// every matching submission ungradable.
    #[error("Problem `{problem}` has accepted filenames but no entry under problem rubrics")]
    MissingProblemRubric {
        /// The problem without a rubric entry.
        problem: String,
    },
}

/// A rubric pattern kept in both compiled and as-written form.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The pattern as written in the rubric.
    source: String,
    /// Case-insensitive compiled form.
    regex:  Regex,
}

impl Pattern {
    /// Compiles a rubric pattern; all rubric matching is case-insensitive.
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// True when the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as written in the rubric.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// On-disk shape of one content check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCheckFile {
    /// Name of the concept the check looks for.
    pub field:   String,
    /// Alternative patterns, any of which satisfies the check.
    pub regexes: Vec<String>,
    /// Points awarded when satisfied.
    pub points:  u32,
}

/// On-disk shape of one problem's rubric entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemRubricFile {
    /// Static checks against the submission text.
    #[serde(rename = "Content checks", default)]
    pub content_checks:   Vec<ContentCheckFile>,
    /// Inputs piped to the submission, one run each.
    #[serde(rename = "Simulated inputs", default)]
    pub simulated_inputs: Vec<String>,
    /// Expected-output patterns, index-aligned with the inputs.
    #[serde(rename = "Expected outputs", default)]
    pub expected_outputs: Vec<String>,
    /// Points awarded per matching behavior check.
    #[serde(rename = "Points per check", default)]
    pub points_per_check: u32,
}

/// On-disk shape of a whole rubric document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RubricFile {
    /// Base points every student receives for submitting at all.
    #[serde(rename = "Points for submission", default)]
    pub submission_points: u32,
    /// Problem id to the submission filenames accepted for it.
    #[serde(rename = "Problem naming", default)]
    pub problem_naming:    BTreeMap<String, Vec<String>>,
    /// Problem id to that problem's checks.
    #[serde(rename = "Problem specific rubrics", default)]
    pub problem_rubrics:   BTreeMap<String, ProblemRubricFile>,
}

/// A validated content check with compiled patterns.
#[derive(Debug, Clone)]
pub struct ContentCheck {
    /// Name of the concept the check looks for.
    field:    String,
    /// Alternative patterns; the first match satisfies the check. An empty
    /// list is valid rubric data and is never satisfied.
    patterns: Vec<Pattern>,
    /// Points awarded when satisfied.
    points:   u32,
}

impl ContentCheck {
    /// Creates a content check from compiled patterns.
    pub fn new(field: impl Into<String>, patterns: Vec<Pattern>, points: u32) -> Self {
        Self {
            field: field.into(),
            patterns,
            points,
        }
    }

    /// Returns the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the alternative patterns.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Returns the points awarded when satisfied.
    pub fn points(&self) -> u32 {
        self.points
    }
}

/// A validated behavior check: one simulated input paired with the pattern
/// its output must contain.
#[derive(Debug, Clone)]
pub struct BehaviorCheck {
    /// Text piped to the submission's stdin.
    input:    String,
    /// Pattern searched for in the captured stdout.
    expected: Pattern,
}

impl BehaviorCheck {
    /// Creates a behavior check pairing one input with its expected pattern.
    pub fn new(input: impl Into<String>, expected: Pattern) -> Self {
        Self {
            input: input.into(),
            expected,
        }
    }

    /// Returns the simulated input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the expected-output pattern.
    pub fn expected(&self) -> &Pattern {
        &self.expected
    }
}

/// A validated rubric entry for one problem.
#[derive(Debug, Clone, Default)]
pub struct ProblemRubric {
    /// Static checks, in rubric order.
    content_checks:   Vec<ContentCheck>,
    /// Dynamic checks, in rubric order.
    behavior_checks:  Vec<BehaviorCheck>,
    /// Points per matching behavior check.
    points_per_check: u32,
}

impl ProblemRubric {
    /// Creates a rubric entry from its parts.
    pub fn new(
        content_checks: Vec<ContentCheck>,
        behavior_checks: Vec<BehaviorCheck>,
        points_per_check: u32,
    ) -> Self {
        Self {
            content_checks,
            behavior_checks,
            points_per_check,
        }
    }

    /// Returns the content checks, in rubric order.
    pub fn content_checks(&self) -> &[ContentCheck] {
        &self.content_checks
    }

    /// Returns the behavior checks, in rubric order.
    pub fn behavior_checks(&self) -> &[BehaviorCheck] {
        &self.behavior_checks
    }

    /// Returns the points awarded per matching behavior check.
    pub fn points_per_check(&self) -> u32 {
        self.points_per_check
    }

    /// Returns the maximum points obtainable for this problem.
    pub fn possible_points(&self) -> u32 {
        let content: u32 = self.content_checks.iter().map(ContentCheck::points).sum();
        content + self.points_per_check * self.behavior_checks.len() as u32
    }
}

/// A validated, immutable rubric for one assignment. Loaded once per run and
/// shared read-only across every grading call.
#[derive(Debug, Clone, Default)]
pub struct Rubric {
    /// Base points for submitting at all.
    submission_points: u32,
    /// Problem id to its checks.
    problems:          BTreeMap<String, ProblemRubric>,
    /// Lowercased accepted filename to the problem it answers.
    filenames:         BTreeMap<String, String>,
}

impl Rubric {
    /// Loads and validates a rubric document.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read rubric {}", path.display()))?;
        let file: RubricFile = serde_json::from_str(&raw)
            .with_context(|| format!("Could not parse rubric {}", path.display()))?;
        let rubric = Self::try_from(file)
            .with_context(|| format!("Invalid rubric {}", path.display()))?;
        Ok(rubric)
    }

    /// Returns the base points every student receives on registration.
    pub fn submission_points(&self) -> u32 {
        self.submission_points
    }

    /// Iterates problems in name order.
    pub fn problems(&self) -> impl Iterator<Item = (&str, &ProblemRubric)> {
        self.problems
            .iter()
            .map(|(name, rubric)| (name.as_str(), rubric))
    }

    /// Looks up one problem's rubric entry.
    pub fn problem(&self, name: &str) -> Option<&ProblemRubric> {
        self.problems.get(name)
    }

    /// Resolves a submission file to the problem it answers, matching the
    /// file name case-insensitively against the accepted names.
    pub fn match_file(&self, path: &Path) -> Option<(&str, &ProblemRubric)> {
        let file_name = path.file_name()?.to_string_lossy().to_lowercase();
        let problem = self.filenames.get(&file_name)?;
        self.problems
            .get(problem)
            .map(|rubric| (problem.as_str(), rubric))
    }

    /// Iterates accepted filenames and the problems they map to, in filename
    /// order.
    pub fn accepted_filenames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filenames
            .iter()
            .map(|(file, problem)| (file.as_str(), problem.as_str()))
    }
}

impl TryFrom<RubricFile> for Rubric {
    type Error = RubricError;

    fn try_from(file: RubricFile) -> Result<Self, Self::Error> {
        let mut problems = BTreeMap::new();
        for (name, entry) in &file.problem_rubrics {
            if !file.problem_naming.contains_key(name) {
                warn!("Problem `{name}` has a rubric entry but no accepted filenames");
            }
            problems.insert(name.clone(), validate_problem(name, entry)?);
        }

        let mut filenames = BTreeMap::new();
        for (problem, names) in &file.problem_naming {
            if !problems.contains_key(problem) {
                return Err(RubricError::MissingProblemRubric {
                    problem: problem.clone(),
                });
            }
            for name in names {
                let name = name.to_lowercase();
                if let Some(prior) = filenames.get(&name) {
                    warn!(
                        "File name `{name}` is claimed by `{prior}` and `{problem}`; keeping \
                         `{prior}`"
                    );
                    continue;
                }
                filenames.insert(name, problem.clone());
            }
        }

        Ok(Self {
            submission_points: file.submission_points,
            problems,
            filenames,
        })
    }
}

/// Validates one problem entry: compiles every pattern and pairs up the
/// behavior-check lists by index.
fn validate_problem(name: &str, entry: &ProblemRubricFile) -> Result<ProblemRubric, RubricError> {
    let mut content_checks = Vec::with_capacity(entry.content_checks.len());
    for check in &entry.content_checks {
        let mut patterns = Vec::with_capacity(check.regexes.len());
        for regex in &check.regexes {
            let pattern =
                Pattern::compile(regex).map_err(|source| RubricError::InvalidPattern {
                    problem: name.to_string(),
                    field: check.field.clone(),
                    pattern: regex.clone(),
                    source,
                })?;
            patterns.push(pattern);
        }
        content_checks.push(ContentCheck::new(check.field.clone(), patterns, check.points));
    }

    if entry.simulated_inputs.len() != entry.expected_outputs.len() {
        return Err(RubricError::MisalignedChecks {
            problem: name.to_string(),
            inputs: entry.simulated_inputs.len(),
            outputs: entry.expected_outputs.len(),
        });
    }

    let mut behavior_checks = Vec::with_capacity(entry.simulated_inputs.len());
    for (input, expected) in entry.simulated_inputs.iter().zip(&entry.expected_outputs) {
        let expected =
            Pattern::compile(expected).map_err(|source| RubricError::InvalidExpectedOutput {
                problem: name.to_string(),
                pattern: expected.clone(),
                source,
            })?;
        behavior_checks.push(BehaviorCheck::new(input.clone(), expected));
    }

    Ok(ProblemRubric::new(
        content_checks,
        behavior_checks,
        entry.points_per_check,
    ))
}
