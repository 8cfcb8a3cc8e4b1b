//! Domain layer — pure types, conventions, and output heuristics.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod install;
pub mod service;

pub use config::{DriverConfig, PackageVariant, TimeoutConfig};
pub use diagnostics::{DiagnosticArtifact, MISSING_ARTIFACT_PLACEHOLDER};
pub use error::{ConfigError, LifecycleError, TransportError};
pub use install::{
    Artifact, DebianLayout, InstallationDescriptor, LifecycleState, LifecycleStep, TarballLayout,
};
pub use service::{InitScript, ServiceMarkers};
