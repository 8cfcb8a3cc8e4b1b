//! Diagnostics collection: one local file per known artifact, always.
//!
//! Present artifacts are downloaded verbatim. Missing ones are replaced by a
//! one-line placeholder so a missing log never aborts the pass. Transport
//! failures and local write failures are fatal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LocalFiles, RemoteHost};
use crate::domain::diagnostics::{self, DiagnosticArtifact, MISSING_ARTIFACT_PLACEHOLDER};

/// Collect every artifact in `remote_paths` into `destination`.
///
/// Returns the local paths produced, in the order of `remote_paths`.
///
/// # Errors
///
/// Returns an error if the destination cannot be created, a probe or download
/// fails at the transport level, or a placeholder cannot be written.
pub async fn collect(
    host: &impl RemoteHost,
    files: &impl LocalFiles,
    remote_paths: &[String],
    destination: &Path,
) -> Result<Vec<PathBuf>> {
    let address = host.address();
    tracing::info!(
        host = address,
        destination = %destination.display(),
        "downloading diagnostics"
    );
    files
        .ensure_dir(destination)
        .with_context(|| format!("creating diagnostics directory {}", destination.display()))?;

    let mut produced = Vec::with_capacity(remote_paths.len());
    for artifact in diagnostics::plan(remote_paths, destination, address) {
        download(host, files, &artifact).await?;
        produced.push(artifact.local_path);
    }
    Ok(produced)
}

/// Download one artifact, or write its placeholder if it is missing.
///
/// # Errors
///
/// Returns an error on transport failure or if the placeholder write fails.
pub async fn download(
    host: &impl RemoteHost,
    files: &impl LocalFiles,
    artifact: &DiagnosticArtifact,
) -> Result<()> {
    let probe = host
        .execute(&artifact.probe_command())
        .await
        .with_context(|| format!("probing {}", artifact.remote_path))?;

    if diagnostics::is_missing(&probe) {
        tracing::debug!(remote = %artifact.remote_path, "artifact missing on VM");
        files
            .write_text(&artifact.local_path, MISSING_ARTIFACT_PLACEHOLDER)
            .with_context(|| format!("writing placeholder {}", artifact.local_path.display()))
    } else {
        host.copy_from_remote(&artifact.remote_path, &artifact.local_path)
            .await
            .with_context(|| format!("downloading {}", artifact.remote_path))
    }
}
