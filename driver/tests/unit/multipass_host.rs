//! Unit tests for `MultipassHost`.
//!
//! These tests verify that `MultipassHost` builds the correct `multipass`
//! argument lists and that nonzero exits surface as transport failures.

#![allow(clippy::expect_used)]

use std::path::Path;
use std::process::Output;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use installer_qa::application::ports::{CommandRunner, FileTransfer, HostIdentity, RemoteShell};
use installer_qa::domain::TransportError;
use installer_qa::infra::multipass::{MultipassHost, resolve_address};

use crate::helpers::{err_output, ok_output};

// ─── MockCommandRunner ────────────────────────────────────────────────────────

/// A `CommandRunner` that records every `(program, args, timeout)` call and
/// returns a canned output.
#[derive(Clone)]
struct MockCommandRunner {
    calls: Arc<Mutex<Vec<(String, Vec<String>, Option<Duration>)>>>,
    result: Arc<dyn Fn() -> Output + Send + Sync>,
}

impl MockCommandRunner {
    fn returning(output: Output) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            result: Arc::new(move || output.clone()),
        }
    }

    fn recorded_calls(&self) -> Vec<(String, Vec<String>, Option<Duration>)> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    fn record(&self, program: &str, args: &[&str], timeout: Option<Duration>) {
        self.calls.lock().expect("mutex poisoned").push((
            program.to_owned(),
            args.iter().map(|s| (*s).to_string()).collect(),
            timeout,
        ));
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None);
        Ok((self.result)())
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.record(program, args, Some(timeout));
        Ok((self.result)())
    }
}

const TRANSFER_TIMEOUT: Duration = Duration::from_secs(600);

fn host(runner: &MockCommandRunner) -> MultipassHost<MockCommandRunner> {
    MultipassHost::with_address(runner.clone(), "qa-ubuntu", "10.0.0.7", TRANSFER_TIMEOUT)
}

fn args(call: &(String, Vec<String>, Option<Duration>)) -> Vec<&str> {
    call.1.iter().map(String::as_str).collect()
}

// ─── execute ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn execute_wraps_command_in_bash() {
    let runner = MockCommandRunner::returning(ok_output(b"hello\n"));
    let output = host(&runner)
        .execute("cd /tmp && ls neo4j*")
        .await
        .expect("execute");

    assert_eq!(output, "hello\n");
    let calls = runner.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "multipass");
    assert_eq!(
        args(&calls[0]),
        vec!["exec", "qa-ubuntu", "--", "bash", "-c", "cd /tmp && ls neo4j*"]
    );
}

#[tokio::test]
async fn execute_nonzero_exit_is_transport_failure() {
    let runner = MockCommandRunner::returning(err_output(2, b"mkdir: cannot create directory\n"));
    let err = host(&runner)
        .execute("mkdir /home/vagrant/installer")
        .await
        .expect_err("nonzero exit must fail");

    match err.downcast_ref::<TransportError>() {
        Some(TransportError::CommandFailed {
            host,
            command,
            stderr,
            ..
        }) => {
            assert_eq!(host, "10.0.0.7");
            assert_eq!(command, "mkdir /home/vagrant/installer");
            assert_eq!(stderr, "mkdir: cannot create directory");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ─── transfer ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn copy_to_remote_targets_instance_path() {
    let runner = MockCommandRunner::returning(ok_output(b""));
    host(&runner)
        .copy_to_remote(
            Path::new("/tmp/server-1.0.tar.gz"),
            "/home/vagrant/installer/server-1.0.tar.gz",
        )
        .await
        .expect("copy");

    let calls = runner.recorded_calls();
    assert_eq!(
        args(&calls[0]),
        vec![
            "transfer",
            "/tmp/server-1.0.tar.gz",
            "qa-ubuntu:/home/vagrant/installer/server-1.0.tar.gz",
        ]
    );
    assert_eq!(calls[0].2, Some(TRANSFER_TIMEOUT));
}

#[tokio::test]
async fn copy_from_remote_reverses_direction() {
    let runner = MockCommandRunner::returning(ok_output(b""));
    host(&runner)
        .copy_from_remote("/var/lib/neo4j/conf/neo4j.properties", Path::new("/tmp/out/x"))
        .await
        .expect("copy");

    assert_eq!(
        args(&runner.recorded_calls()[0]),
        vec![
            "transfer",
            "qa-ubuntu:/var/lib/neo4j/conf/neo4j.properties",
            "/tmp/out/x",
        ]
    );
}

#[tokio::test]
async fn failed_transfer_is_transport_failure() {
    let runner = MockCommandRunner::returning(err_output(1, b"source path does not exist"));
    let err = host(&runner)
        .copy_from_remote("/missing", Path::new("/tmp/x"))
        .await
        .expect_err("transfer should fail");

    assert!(matches!(
        err.downcast_ref::<TransportError>(),
        Some(TransportError::TransferFailed { from, .. }) if from == "qa-ubuntu:/missing"
    ));
}

/// A runner whose every call exceeds its deadline.
struct ExpiringRunner;

impl CommandRunner for ExpiringRunner {
    async fn run(&self, program: &str, _: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, &[], Duration::from_secs(120)).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        _: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        Err(TransportError::Timeout {
            program: program.to_string(),
            timeout,
        }
        .into())
    }
}

#[tokio::test]
async fn transfer_timeout_stays_downcastable() {
    let host =
        MultipassHost::with_address(ExpiringRunner, "qa-ubuntu", "10.0.0.7", TRANSFER_TIMEOUT);
    let err = host
        .copy_to_remote(
            Path::new("/tmp/server.tar.gz"),
            "/home/vagrant/installer/server.tar.gz",
        )
        .await
        .expect_err("transfer should time out");

    assert!(matches!(
        err.downcast_ref::<TransportError>(),
        Some(TransportError::Timeout { program, timeout })
            if program == "multipass" && *timeout == TRANSFER_TIMEOUT
    ));
}

// ─── address resolution ──────────────────────────────────────────────────────

#[tokio::test]
async fn connect_resolves_first_ipv4() {
    let runner = MockCommandRunner::returning(ok_output(
        br#"{"info":{"qa-ubuntu":{"state":"Running","ipv4":["192.168.64.5","10.1.0.1"]}}}"#,
    ));
    let host = MultipassHost::connect(runner.clone(), "qa-ubuntu", TRANSFER_TIMEOUT)
        .await
        .expect("connect");

    assert_eq!(host.address(), "192.168.64.5");
    assert_eq!(host.instance(), "qa-ubuntu");
    assert_eq!(
        args(&runner.recorded_calls()[0]),
        vec!["info", "qa-ubuntu", "--format", "json"]
    );
}

#[tokio::test]
async fn resolve_without_ipv4_reports_no_address() {
    let runner = MockCommandRunner::returning(ok_output(
        br#"{"info":{"qa-ubuntu":{"state":"Stopped","ipv4":[]}}}"#,
    ));
    let err = resolve_address(&runner, "qa-ubuntu")
        .await
        .expect_err("no address");
    assert!(matches!(
        err.downcast_ref::<TransportError>(),
        Some(TransportError::NoAddress { instance }) if instance == "qa-ubuntu"
    ));
}

#[tokio::test]
async fn resolve_fails_when_instance_missing() {
    let runner = MockCommandRunner::returning(err_output(
        2,
        b"info failed: The following errors occurred:\ninstance \"qa-ubuntu\" does not exist",
    ));
    let err = resolve_address(&runner, "qa-ubuntu")
        .await
        .expect_err("missing instance");
    assert!(err.to_string().contains("does not exist"));
}
