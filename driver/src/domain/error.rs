//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers that need to branch on the failure kind can
//! `downcast_ref` the `anyhow::Error`.

use std::time::Duration;

use thiserror::Error;

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// A service-manager marker was found in command output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Starting {service} failed on [{host}]")]
    StartFailed { service: String, host: String },

    #[error("Stopping {service} failed on [{host}]")]
    StopFailed { service: String, host: String },
}

impl LifecycleError {
    /// Address of the VM the failure was detected on.
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            Self::StartFailed { host, .. } | Self::StopFailed { host, .. } => host,
        }
    }
}

// ── Transport errors ──────────────────────────────────────────────────────────

/// The remote execution channel itself reported a failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("remote command failed on [{host}] ({status}): {command}\n{stderr}")]
    CommandFailed {
        host: String,
        command: String,
        status: String,
        stderr: String,
    },

    #[error("file transfer {from} -> {to} failed ({status})\n{stderr}")]
    TransferFailed {
        from: String,
        to: String,
        status: String,
        stderr: String,
    },

    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("no IPv4 address reported for instance '{instance}'. Is the VM running?")]
    NoAddress { instance: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to driver configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No installer artifact configured. Pass --artifact <path> or set 'artifact' in the config file.")]
    MissingArtifact,

    #[error("Installer artifact path has no file name: {0}")]
    InvalidArtifact(String),

    #[error("{key} must be an absolute path, got '{value}'")]
    RelativeDirectory { key: &'static str, value: String },

    #[error("Installer artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("{0} must not be the filesystem root")]
    RootDirectory(&'static str),

    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    #[error("Unknown package variant '{0}'. Valid variants: tarball, debian")]
    UnknownVariant(String),
}
