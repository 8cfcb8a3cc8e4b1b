//! Diagnostic artifact naming and the existence-probe heuristic.

use std::path::{Path, PathBuf};

/// Written locally in place of an artifact that is missing on the VM.
pub const MISSING_ARTIFACT_PLACEHOLDER: &str = "This log file did not exist on the VM.";

/// Substring `ls` prints for a path that does not exist.
pub const MISSING_FILE_MARKER: &str = "No such file";

/// One known log or config file and where its local copy goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticArtifact {
    pub remote_path: String,
    pub local_path: PathBuf,
}

impl DiagnosticArtifact {
    /// Pair `remote_path` with `<destination>/<host>-<basename>`.
    #[must_use]
    pub fn new(remote_path: impl Into<String>, destination: &Path, host: &str) -> Self {
        let remote_path = remote_path.into();
        let local_path = destination.join(local_file_name(host, &remote_path));
        Self {
            remote_path,
            local_path,
        }
    }

    /// Shell command whose output tells whether the artifact exists.
    ///
    /// `|| true` keeps a missing file from failing the command at the
    /// transport level; absence is read from the output instead.
    #[must_use]
    pub fn probe_command(&self) -> String {
        format!("ls {} 2>&1 || true", self.remote_path)
    }
}

/// Host-qualified local file name, so several VMs can share a destination.
#[must_use]
pub fn local_file_name(host: &str, remote_path: &str) -> String {
    let base = remote_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(remote_path);
    format!("{host}-{base}")
}

/// `true` if the probe output says the file is absent.
#[must_use]
pub fn is_missing(probe_output: &str) -> bool {
    probe_output.contains(MISSING_FILE_MARKER)
}

/// Plan one artifact per remote path, preserving order.
#[must_use]
pub fn plan(remote_paths: &[String], destination: &Path, host: &str) -> Vec<DiagnosticArtifact> {
    remote_paths
        .iter()
        .map(|remote| DiagnosticArtifact::new(remote.clone(), destination, host))
        .collect()
}
