use std::{
    env, fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use tally::process::{RunOutcome, Runner};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("tally-runner-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write script");
    path
}

#[tokio::test]
async fn captures_stdout_and_exit_status() {
    let root = temp_root();
    let script = write_script(&root, "greeting.py", "printf 'hello, alice\\n'\n");

    let runner = Runner::new("sh", Duration::from_secs(5));
    match runner.run(&script, "").await {
        RunOutcome::Completed { stdout, status, .. } => {
            assert_eq!(stdout, "hello, alice\n");
            assert!(status.success());
        }
        other => panic!("expected completion, got {other:?}"),
    }

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn writes_stdin_then_closes_it() {
    let root = temp_root();
    let script = write_script(
        &root,
        "echo.py",
        "read name\nprintf 'hello, %s\\n' \"$name\"\ncat\n",
    );

    let runner = Runner::new("sh", Duration::from_secs(5));
    match runner.run(&script, "alice\nextra line\n").await {
        RunOutcome::Completed { stdout, status, .. } => {
            // `cat` drains the rest and exits on end-of-stream, so the run
            // finishes instead of hanging on an open stdin.
            assert_eq!(stdout, "hello, alice\nextra line\n");
            assert!(status.success());
        }
        other => panic!("expected completion, got {other:?}"),
    }

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn nonzero_exit_still_returns_captured_output() {
    let root = temp_root();
    let script = write_script(&root, "broken.py", "printf 'partial'\nexit 3\n");

    let runner = Runner::new("sh", Duration::from_secs(5));
    match runner.run(&script, "").await {
        RunOutcome::Completed { stdout, status, .. } => {
            assert_eq!(stdout, "partial");
            assert!(!status.success());
            assert_eq!(status.code(), Some(3));
        }
        other => panic!("expected completion, got {other:?}"),
    }

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn stderr_is_captured_separately() {
    let root = temp_root();
    let script = write_script(
        &root,
        "noisy.py",
        "printf 'value\\n'\nprintf 'warning\\n' >&2\n",
    );

    let runner = Runner::new("sh", Duration::from_secs(5));
    match runner.run(&script, "").await {
        RunOutcome::Completed { stdout, stderr, .. } => {
            assert_eq!(stdout, "value\n");
            assert_eq!(stderr, "warning\n");
        }
        other => panic!("expected completion, got {other:?}"),
    }

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn timeout_kills_the_whole_process_tree() {
    let root = temp_root();
    let marker = root.join("survivor");
    let script = write_script(
        &root,
        "hang.py",
        &format!("( sleep 2 && : > '{}' ) &\nsleep 5\n", marker.display()),
    );

    let runner = Runner::new("sh", Duration::from_millis(250));
    match runner.run(&script, "").await {
        RunOutcome::TimedOut { limit } => assert_eq!(limit, Duration::from_millis(250)),
        other => panic!("expected timeout, got {other:?}"),
    }

    // A surviving background child would create the marker at the two
    // second mark.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!marker.exists(), "background child outlived the kill");

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn lingering_background_child_does_not_stall_the_run() {
    let root = temp_root();
    let marker = root.join("survivor");
    let script = write_script(
        &root,
        "linger.py",
        &format!("( sleep 2 && : > '{}' ) &\nexit 0\n", marker.display()),
    );

    // The parent exits right away; only the background child still holds
    // the output pipes.
    let runner = Runner::new("sh", Duration::from_millis(250));
    let started = Instant::now();
    match runner.run(&script, "").await {
        RunOutcome::TimedOut { limit } => assert_eq!(limit, Duration::from_millis(250)),
        other => panic!("expected timeout, got {other:?}"),
    }
    let elapsed = started.elapsed();
    assert!(elapsed < Duration::from_millis(1500), "run took {elapsed:?}");

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!marker.exists(), "background child outlived the kill");

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn bare_script_name_runs_from_the_inherited_directory() {
    let root = temp_root();
    write_script(&root, "bare.py", "printf 'ran\\n'\n");

    let previous = env::current_dir().expect("read cwd");
    env::set_current_dir(&root).expect("enter temp root");
    let runner = Runner::new("sh", Duration::from_secs(5));
    let outcome = runner.run(Path::new("bare.py"), "").await;
    env::set_current_dir(previous).expect("restore cwd");

    match outcome {
        RunOutcome::Completed { stdout, status, .. } => {
            assert_eq!(stdout, "ran\n");
            assert!(status.success());
        }
        other => panic!("expected completion, got {other:?}"),
    }

    fs::remove_dir_all(&root).expect("cleanup");
}

#[tokio::test]
async fn missing_interpreter_reports_launch_failure() {
    let root = temp_root();
    let script = write_script(&root, "any.py", "printf 'unreachable'\n");

    let runner = Runner::new("tally-no-such-interpreter", Duration::from_secs(5));
    match runner.run(&script, "").await {
        RunOutcome::LaunchFailed { reason } => assert!(!reason.is_empty()),
        other => panic!("expected launch failure, got {other:?}"),
    }

    fs::remove_dir_all(&root).expect("cleanup");
}
