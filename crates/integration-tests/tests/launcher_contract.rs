//! ProcessLauncher contract: the mock and the real launcher behave alike
//!
//! Every check runs against both implementations so tests written with the mock
//! stay meaningful for production.
#![cfg(unix)]

use std::time::Duration;

use onionscan_core::domain::{CommandSpec, ProcessOutput};
use onionscan_core::port::process_launcher::mocks::{MockBehavior, MockProcessLauncher};
use onionscan_core::port::{LaunchError, ProcessLauncher};
use onionscan_infra_system::TokioProcessLauncher;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh", vec!["-c".to_string(), script.to_string()])
}

async fn assert_completes_with(
    launcher: &dyn ProcessLauncher,
    command: &CommandSpec,
    expected: &ProcessOutput,
) {
    let mut process = launcher.launch(command).await.unwrap();
    let output = tokio::time::timeout(Duration::from_secs(10), process.wait_with_output())
        .await
        .expect("process did not finish")
        .unwrap();

    assert_eq!(&output, expected);
}

async fn assert_spawn_fails(launcher: &dyn ProcessLauncher, command: &CommandSpec) {
    let result = launcher.launch(command).await;
    assert!(matches!(result, Err(LaunchError::SpawnFailed(_))));
}

async fn assert_hangs_until_killed(launcher: &dyn ProcessLauncher, command: &CommandSpec) {
    let mut process = launcher.launch(command).await.unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(100), process.wait_with_output()).await;
    assert!(waited.is_err(), "process should still be running");

    process.kill().await.unwrap();
}

#[tokio::test]
async fn test_completed_output_contract() {
    let expected = ProcessOutput::new(r#"{"leaks": []}"#, "warn", Some(2));

    let real = TokioProcessLauncher::new();
    assert_completes_with(
        &real,
        &sh(r#"printf '{"leaks": []}'; printf warn >&2; exit 2"#),
        &expected,
    )
    .await;

    let mock = MockProcessLauncher::new(MockBehavior::Complete(expected.clone()));
    assert_completes_with(&mock, &sh("ignored"), &expected).await;
}

#[tokio::test]
async fn test_default_mock_is_successful_empty_scan() {
    let expected = ProcessOutput::new("{}", "", Some(0));

    let real = TokioProcessLauncher::new();
    assert_completes_with(&real, &sh("printf '{}'"), &expected).await;

    let mock = MockProcessLauncher::default();
    assert_completes_with(&mock, &sh("ignored"), &expected).await;
}

#[tokio::test]
async fn test_spawn_failure_contract() {
    let missing = CommandSpec::new("/nonexistent/dir/onionscan", vec![]);

    assert_spawn_fails(&TokioProcessLauncher::new(), &missing).await;
    assert_spawn_fails(&MockProcessLauncher::new_spawn_fail("ENOENT"), &missing).await;
}

#[tokio::test]
async fn test_hang_and_kill_contract() {
    let real = TokioProcessLauncher::new();
    assert_hangs_until_killed(&real, &sh("exec sleep 30")).await;

    let mock = MockProcessLauncher::new_hanging();
    assert_hangs_until_killed(&mock, &sh("ignored")).await;
    assert_eq!(mock.kill_count(), 1);
}
