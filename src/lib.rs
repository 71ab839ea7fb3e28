//! # tally
//!
//! A rubric-driven autograder. Reads a JSON rubric, discovers student
//! submission folders, runs each submission with simulated input, and
//! tallies scores with feedback notes.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Run configuration resolved from flags and the environment
pub mod config;
/// For all things related to grading
pub mod grade;
/// Runs submission processes with captured output and timeouts
pub mod process;
/// Renders run reports and rubric summaries for the terminal
pub mod report;
/// Rubric parsing and validation
pub mod rubric;
/// Discovers student folders and their submission files
pub mod submission;
/// Utility functions for convenience
pub mod util;
