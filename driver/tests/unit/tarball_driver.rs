//! Unit tests for the tar.gz lifecycle driver.
//!
//! Each test drives `TarballDriver` against a `FakeHost` and asserts the
//! exact remote command script and the marker-based outcome.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use installer_qa::application::drivers::TarballDriver;
use installer_qa::application::ports::LifecycleDriver;
use installer_qa::domain::{
    ConfigError, InitScript, InstallationDescriptor, LifecycleError, TarballLayout,
};

use crate::helpers::{
    ARTIFACT, FakeHost, HOST, TestFiles, descriptor, descriptor_without_artifact,
};

fn driver(
    host: &FakeHost,
    descriptor: InstallationDescriptor,
) -> TarballDriver<'_, FakeHost, TestFiles> {
    TarballDriver::new(
        host,
        &TestFiles,
        descriptor,
        TarballLayout::default(),
        InitScript::default(),
    )
}

// ── install ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn install_runs_full_script_in_order() {
    let host = FakeHost::new();
    driver(&host, descriptor()).install().await.expect("install");

    assert_eq!(
        host.commands(),
        vec![
            "mkdir /home/vagrant/installer",
            "sudo mkdir /var/lib/neo4j",
            "cd /home/vagrant/installer/ && tar xf server-1.0.tar.gz",
            "sudo mv /home/vagrant/installer/neo4j*/* /var/lib/neo4j",
            "sudo /var/lib/neo4j/bin/neo4j -h -u neo4j install",
            "sudo chown neo4j:neo4j -R /var/lib/neo4j",
            "sudo chmod -R 777 /var/lib/neo4j/conf",
        ]
    );
}

#[tokio::test]
async fn install_stages_artifact_before_extraction() {
    let host = FakeHost::new();
    driver(&host, descriptor()).install().await.expect("install");

    assert_eq!(
        host.uploads(),
        vec![(
            PathBuf::from(ARTIFACT),
            "/home/vagrant/installer/server-1.0.tar.gz".to_string()
        )]
    );
}

#[tokio::test]
async fn install_without_artifact_issues_no_commands() {
    let host = FakeHost::new();
    let err = driver(&host, descriptor_without_artifact())
        .install()
        .await
        .expect_err("install should fail");

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::MissingArtifact)
    );
    assert!(host.commands().is_empty());
    assert!(host.uploads().is_empty());
}

#[tokio::test]
async fn install_with_absent_local_artifact_leaves_vm_untouched() {
    let host = FakeHost::new();
    let descriptor = descriptor_without_artifact().with_artifact(
        installer_qa::domain::Artifact::new("/srv/builds/server-9.9.tar.gz").expect("artifact"),
    );
    let err = driver(&host, descriptor)
        .install()
        .await
        .expect_err("install should fail");

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::ArtifactNotFound(
            "/srv/builds/server-9.9.tar.gz".to_string()
        ))
    );
    assert!(host.commands().is_empty());
    assert!(host.uploads().is_empty());
}

#[tokio::test]
async fn install_stops_at_first_transport_failure() {
    let host = FakeHost::new().fail_on("tar xf", "tar: Error is not recoverable");
    let err = driver(&host, descriptor())
        .install()
        .await
        .expect_err("install should fail");

    assert!(format!("{err:#}").contains("tar: Error is not recoverable"));
    let commands = host.commands();
    assert_eq!(commands.len(), 3, "no command after the failing one: {commands:?}");
    assert!(host.position("chown").is_none());
}

#[tokio::test]
async fn install_does_not_detect_application_level_failure() {
    let host = FakeHost::new().respond("install", "WARNING: service registration failed");
    driver(&host, descriptor())
        .install()
        .await
        .expect("zero transport result counts as success");
}

#[tokio::test]
async fn install_honours_injected_install_dir_and_layout() {
    let host = FakeHost::new();
    let descriptor = InstallationDescriptor::new("/opt/graph")
        .expect("descriptor")
        .with_artifact(installer_qa::domain::Artifact::new(ARTIFACT).expect("artifact"));
    let layout = TarballLayout {
        staging_dir: "/tmp/stage/".to_string(),
        archive_root: "server-*".to_string(),
        service_user: "graph".to_string(),
    };
    TarballDriver::new(&host, &TestFiles, descriptor, layout, InitScript::default())
        .install()
        .await
        .expect("install");

    let commands = host.commands();
    assert!(commands.contains(&"mkdir /tmp/stage".to_string()));
    assert!(commands.contains(&"sudo mv /tmp/stage/server-*/* /opt/graph".to_string()));
    assert!(commands.contains(&"sudo /opt/graph/bin/neo4j -h -u graph install".to_string()));
    assert!(commands.contains(&"sudo chown graph:graph -R /opt/graph".to_string()));
    assert!(commands.contains(&"sudo chmod -R 777 /opt/graph/conf".to_string()));
}

// ── uninstall ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn uninstall_removes_service_then_directory() {
    let host = FakeHost::new();
    driver(&host, descriptor_without_artifact())
        .uninstall()
        .await
        .expect("uninstall");

    assert_eq!(
        host.commands(),
        vec![
            "sudo /var/lib/neo4j/bin/neo4j -h remove",
            "sudo rm /var/lib/neo4j -rf",
        ]
    );
}

#[tokio::test]
async fn uninstall_propagates_missing_registration() {
    let host = FakeHost::new().fail_on("-h remove", "service not installed");
    let err = driver(&host, descriptor())
        .uninstall()
        .await
        .expect_err("uninstall should fail");
    assert!(format!("{err:#}").contains("service not installed"));
    assert!(host.position("rm /var/lib/neo4j").is_none());
}

// ── start ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn start_succeeds_without_failure_marker() {
    let host = FakeHost::new().respond("neo4j-service start", "Starting Neo4j Server... OK.\n");
    driver(&host, descriptor()).start().await.expect("start");
    assert_eq!(host.commands(), vec!["sudo /etc/init.d/neo4j-service start"]);
}

#[tokio::test]
async fn start_fails_on_marker_naming_host() {
    let host = FakeHost::new().respond(
        "neo4j-service start",
        "Starting Neo4j Server...process [1234]... waiting for server to be ready... BAD.\n",
    );
    let err = driver(&host, descriptor())
        .start()
        .await
        .expect_err("start should fail");

    let lifecycle = err.downcast_ref::<LifecycleError>().expect("lifecycle error");
    assert_eq!(lifecycle.host(), HOST);
    assert_eq!(err.to_string(), "Starting neo4j-service failed on [10.0.0.7]");
}

// ── stop ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stop_output_exactly_done_is_treated_as_failure() {
    let host = FakeHost::new().respond("neo4j-service stop", "done");
    let err = driver(&host, descriptor())
        .stop()
        .await
        .expect_err("current predicate treats trailing 'done' as failure");

    assert_eq!(
        err.downcast_ref::<LifecycleError>(),
        Some(&LifecycleError::StopFailed {
            service: "neo4j-service".to_string(),
            host: HOST.to_string(),
        })
    );
}

#[tokio::test]
async fn stop_output_with_trailing_newline_is_success() {
    let host = FakeHost::new().respond("neo4j-service stop", "Stopping Neo4j Server.... done\n");
    driver(&host, descriptor()).stop().await.expect("stop");
}

#[tokio::test]
async fn stop_output_not_running_is_success() {
    let host = FakeHost::new().respond("neo4j-service stop", "ERROR: Neo4j Server not running");
    driver(&host, descriptor()).stop().await.expect("stop");
    assert_eq!(host.commands(), vec!["sudo /etc/init.d/neo4j-service stop"]);
}

// ── install_dir ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn install_dir_is_fixed_and_touches_no_vm() {
    let host = FakeHost::new();
    let driver = driver(&host, descriptor());
    assert_eq!(driver.install_dir(), "/var/lib/neo4j");
    driver.install().await.expect("install");
    assert_eq!(driver.install_dir(), "/var/lib/neo4j");

    let before = host.commands().len();
    let _ = driver.install_dir();
    assert_eq!(host.commands().len(), before);
}

#[test]
fn diagnostic_paths_live_under_install_dir() {
    let host = FakeHost::new();
    assert_eq!(
        driver(&host, descriptor()).diagnostic_paths(),
        vec![
            "/var/lib/neo4j/data/graph.db/messages.log",
            "/var/lib/neo4j/data/log/neo4j.0.0.log",
            "/var/lib/neo4j/conf/neo4j-server.properties",
            "/var/lib/neo4j/conf/neo4j.properties",
        ]
    );
}
