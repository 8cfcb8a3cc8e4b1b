//! Driver configuration schema and validation.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::install::{
    Artifact, DEFAULT_ARCHIVE_ROOT, DEFAULT_INSTALL_DIR, DEFAULT_PACKAGE_NAME,
    DEFAULT_SERVICE_USER, DEFAULT_STAGING_DIR, DebianLayout, InstallationDescriptor,
    TarballLayout, validate_remote_dir,
};
use crate::domain::service::{DEFAULT_SERVICE_NAME, InitScript};

pub const DEFAULT_INSTANCE: &str = "installer-qa";

// ── Variant ──────────────────────────────────────────────────────────────────

/// Install mechanism of the artifact under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageVariant {
    /// `.tar.gz` archive unpacked into the install directory.
    #[default]
    Tarball,
    /// `.deb` package installed with `dpkg`.
    Debian,
}

impl FromStr for PackageVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tarball" | "tar.gz" => Ok(Self::Tarball),
            "debian" | "deb" => Ok(Self::Debian),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for PackageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tarball => "tarball",
            Self::Debian => "debian",
        })
    }
}

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, typically `~/.config/installer-qa/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Multipass instance the driver is bound to.
    pub instance: String,
    pub variant: PackageVariant,
    /// Local path of the installer artifact.
    pub artifact: Option<PathBuf>,
    /// Overrides the address reported by the provisioner.
    pub address: Option<String>,
    pub install_dir: String,
    pub staging_dir: String,
    pub service_user: String,
    /// Init script name under `/etc/init.d`.
    pub service_name: String,
    pub archive_root: String,
    pub package_name: String,
    pub timeouts: TimeoutConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            variant: PackageVariant::default(),
            artifact: None,
            address: None,
            install_dir: DEFAULT_INSTALL_DIR.to_string(),
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
            service_user: DEFAULT_SERVICE_USER.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            archive_root: DEFAULT_ARCHIVE_ROOT.to_string(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Transport timeouts in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub command_secs: u64,
    pub transfer_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            command_secs: 120,
            transfer_secs: 600,
        }
    }
}

impl TimeoutConfig {
    #[must_use]
    pub fn command(&self) -> Duration {
        Duration::from_secs(self.command_secs)
    }

    #[must_use]
    pub fn transfer(&self) -> Duration {
        Duration::from_secs(self.transfer_secs)
    }
}

impl DriverConfig {
    /// Check every value a driver will put into a remote command.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_remote_dir("install_dir", &self.install_dir)?;
        validate_remote_dir("staging_dir", &self.staging_dir)?;
        for (key, value) in [
            ("instance", &self.instance),
            ("service_user", &self.service_user),
            ("service_name", &self.service_name),
            ("archive_root", &self.archive_root),
            ("package_name", &self.package_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue(key));
            }
        }
        Ok(())
    }

    /// Build the installation descriptor, attaching the artifact if set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config is invalid or the artifact path
    /// has no file name.
    pub fn descriptor(&self) -> Result<InstallationDescriptor, ConfigError> {
        self.validate()?;
        let descriptor = InstallationDescriptor::new(self.install_dir.clone())?;
        match &self.artifact {
            Some(path) => Ok(descriptor.with_artifact(Artifact::new(path.clone())?)),
            None => Ok(descriptor),
        }
    }

    #[must_use]
    pub fn tarball_layout(&self) -> TarballLayout {
        TarballLayout {
            staging_dir: self.staging_dir.clone(),
            archive_root: self.archive_root.clone(),
            service_user: self.service_user.clone(),
        }
    }

    #[must_use]
    pub fn debian_layout(&self) -> DebianLayout {
        DebianLayout {
            staging_dir: self.staging_dir.clone(),
            package_name: self.package_name.clone(),
            service_user: self.service_user.clone(),
        }
    }

    #[must_use]
    pub fn init_script(&self) -> InitScript {
        InitScript::new(self.service_name.clone())
    }
}
