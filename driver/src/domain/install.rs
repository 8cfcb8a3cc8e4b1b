//! Installation descriptors, per-variant install layouts, and lifecycle states.
//!
//! Every remote path here is a pure function of configuration values fixed at
//! construction. Nothing is discovered from the VM.

use std::path::{Path, PathBuf};

use crate::domain::error::ConfigError;

// ── Conventions ───────────────────────────────────────────────────────────────

pub const DEFAULT_INSTALL_DIR: &str = "/var/lib/neo4j";
pub const DEFAULT_STAGING_DIR: &str = "/home/vagrant/installer";
pub const DEFAULT_SERVICE_USER: &str = "neo4j";
pub const DEFAULT_ARCHIVE_ROOT: &str = "neo4j*";
pub const DEFAULT_PACKAGE_NAME: &str = "neo4j";

/// Join a relative path onto a remote (POSIX) directory.
#[must_use]
pub fn remote_join(dir: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        dir.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Reject empty, relative, and root remote directories.
///
/// Drivers `chown -R` and `rm -rf` these paths, and strip trailing slashes
/// before joining, so `/` is never a usable value.
///
/// # Errors
///
/// Returns `ConfigError` if `value` is empty, does not start with `/`, or
/// is `/` itself.
pub fn validate_remote_dir(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyValue(key));
    }
    if !value.starts_with('/') {
        return Err(ConfigError::RelativeDirectory {
            key,
            value: value.to_string(),
        });
    }
    if value.trim_end_matches('/').is_empty() {
        return Err(ConfigError::RootDirectory(key));
    }
    Ok(())
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Conceptual deployment state on the VM. Never tracked by a driver; the
/// caller sequences lifecycle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Absent,
    Installed,
    Running,
    Stopped,
}

/// One of the four state-changing lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Install,
    Start,
    Stop,
    Uninstall,
}

impl LifecycleStep {
    /// The canonical clean-VM pass.
    pub const SEQUENCE: [Self; 4] = [Self::Install, Self::Start, Self::Stop, Self::Uninstall];

    /// States the step may be invoked from.
    #[must_use]
    pub fn preconditions(self) -> &'static [LifecycleState] {
        match self {
            Self::Install => &[LifecycleState::Absent],
            Self::Start => &[LifecycleState::Installed, LifecycleState::Stopped],
            Self::Stop => &[LifecycleState::Running],
            Self::Uninstall => &[
                LifecycleState::Installed,
                LifecycleState::Running,
                LifecycleState::Stopped,
            ],
        }
    }

    /// State reached when the step succeeds.
    #[must_use]
    pub fn postcondition(self) -> LifecycleState {
        match self {
            Self::Install => LifecycleState::Installed,
            Self::Start => LifecycleState::Running,
            Self::Stop => LifecycleState::Stopped,
            Self::Uninstall => LifecycleState::Absent,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Uninstall => "uninstall",
        }
    }
}

// ── Artifact and descriptor ───────────────────────────────────────────────────

/// The installable artifact on the local machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    local_path: PathBuf,
    file_name: String,
}

impl Artifact {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidArtifact` if the path has no UTF-8 file name.
    pub fn new(local_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let local_path = local_path.into();
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| ConfigError::InvalidArtifact(local_path.display().to_string()))?;
        Ok(Self {
            local_path,
            file_name,
        })
    }

    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Where the artifact lands when uploaded into `staging_dir`.
    #[must_use]
    pub fn staged_path(&self, staging_dir: &str) -> String {
        remote_join(staging_dir, &self.file_name)
    }
}

/// Immutable record of what gets installed and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationDescriptor {
    artifact: Option<Artifact>,
    install_dir: String,
}

impl InstallationDescriptor {
    /// # Errors
    ///
    /// Returns `ConfigError` if `install_dir` is empty or relative.
    pub fn new(install_dir: impl Into<String>) -> Result<Self, ConfigError> {
        let install_dir = install_dir.into();
        validate_remote_dir("install_dir", &install_dir)?;
        Ok(Self {
            artifact: None,
            install_dir,
        })
    }

    #[must_use]
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// The artifact, required only by `install`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingArtifact` when none was configured.
    pub fn artifact(&self) -> Result<&Artifact, ConfigError> {
        self.artifact.as_ref().ok_or(ConfigError::MissingArtifact)
    }

    #[must_use]
    pub fn install_dir(&self) -> &str {
        &self.install_dir
    }

    /// Absolute remote path of `relative` inside the install directory.
    #[must_use]
    pub fn path(&self, relative: &str) -> String {
        remote_join(&self.install_dir, relative)
    }
}

// ── Variant layouts ───────────────────────────────────────────────────────────

/// Staging and ownership conventions for tar.gz installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarballLayout {
    pub staging_dir: String,
    /// Glob matching the archive's top-level directory after extraction.
    pub archive_root: String,
    pub service_user: String,
}

impl Default for TarballLayout {
    fn default() -> Self {
        Self {
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
            archive_root: DEFAULT_ARCHIVE_ROOT.to_string(),
            service_user: DEFAULT_SERVICE_USER.to_string(),
        }
    }
}

/// Staging and package naming conventions for `.deb` installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebianLayout {
    pub staging_dir: String,
    pub package_name: String,
    pub service_user: String,
}

impl Default for DebianLayout {
    fn default() -> Self {
        Self {
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            service_user: DEFAULT_SERVICE_USER.to_string(),
        }
    }
}
