#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # tally
//! ## Introduction
//!
//! A rubric-driven autograder for introductory programming courses.
//!
//! ## Usage
//!
//! `tally grade <SUBMISSIONS> <RUBRIC>` grades every student folder under
//! `SUBMISSIONS` against the JSON rubric at `RUBRIC` and prints a report.
//!
//! `tally check <RUBRIC>` validates a rubric and describes it without
//! grading anything.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use bpaf::*;
use dotenvy::dotenv;
use tally::{config::GraderConfig, grade, report, rubric::Rubric};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade submissions against a rubric
    Grade {
        /// Per-submission wall-clock limit in seconds
        timeout:     Option<u64>,
        /// Number of student folders graded concurrently
        jobs:        Option<usize>,
        /// Interpreter used to run submissions
        interpreter: Option<PathBuf>,
        /// Extension of submission files, without the leading dot
        extension:   Option<String>,
        /// Directory with one folder per student
        submissions: PathBuf,
        /// Path to the rubric JSON document
        rubric:      PathBuf,
    },
    /// Validate a rubric and describe it
    Check {
        /// Path to the rubric JSON document
        rubric: PathBuf,
    },
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the submissions directory
    fn submissions() -> impl Parser<PathBuf> {
        positional("SUBMISSIONS").help("Directory with one folder per student")
    }

    /// parses the rubric path
    fn rubric() -> impl Parser<PathBuf> {
        positional("RUBRIC").help("Path to the rubric JSON document")
    }

    let timeout = long("timeout")
        .help("Per-submission wall-clock limit in seconds")
        .argument::<u64>("SECS")
        .optional();
    let jobs = long("jobs")
        .help("Number of student folders graded concurrently")
        .argument::<usize>("N")
        .optional();
    let interpreter = long("interpreter")
        .help("Interpreter used to run submissions")
        .argument::<PathBuf>("PATH")
        .optional();
    let extension = long("extension")
        .help("Extension of submission files, without the leading dot")
        .argument::<String>("EXT")
        .optional();

    let grade = construct!(Cmd::Grade {
        timeout,
        jobs,
        interpreter,
        extension,
        submissions(),
        rubric()
    })
    .to_options()
    .command("grade")
    .help("Grade every student folder against a rubric");

    let check = construct!(Cmd::Check { rubric() })
        .to_options()
        .command("check")
        .help("Validate a rubric and describe it");

    let cmd = construct!([grade, check]);

    cmd.to_options().descr("Rubric-driven autograder").run()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Grade {
            timeout,
            jobs,
            interpreter,
            extension,
            submissions,
            rubric,
        } => {
            let config =
                GraderConfig::resolve(submissions, rubric, timeout, jobs, interpreter, extension)?;
            let rubric = Arc::new(Rubric::load(config.rubric_path())?);
            let state = grade::grade_run(&config, rubric).await?;
            println!("{}", report::render(&state));
        }
        Cmd::Check { rubric } => {
            let rubric = Rubric::load(&rubric)?;
            println!("{}", report::describe_rubric(&rubric));
        }
    };

    Ok(())
}
