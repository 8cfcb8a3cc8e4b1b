//! Application context — unified state passed to every command handler.
//!
//! `AppContext` resolves configuration once (file, then CLI overrides) and
//! owns the output context, so command handlers only decide what to run.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{DriverConfig, PackageVariant};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::multipass::MultipassHost;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub instance: Option<String>,
    pub variant: Option<PackageVariant>,
    pub artifact: Option<PathBuf>,
    pub install_dir: Option<String>,
    pub address: Option<String>,
}

impl ConfigOverrides {
    /// Overwrite every field of `config` that was given on the command line.
    pub fn apply(&self, config: &mut DriverConfig) {
        if let Some(instance) = &self.instance {
            config.instance.clone_from(instance);
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(artifact) = &self.artifact {
            config.artifact = Some(artifact.clone());
        }
        if let Some(install_dir) = &self.install_dir {
            config.install_dir.clone_from(install_dir);
        }
        if let Some(address) = &self.address {
            config.address = Some(address.clone());
        }
    }
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Resolved and validated driver configuration.
    pub config: DriverConfig,
    /// Local filesystem used for diagnostics.
    pub files: LocalFs,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the resulting configuration is invalid.
    pub fn new(output: &OutputFlags, overrides: &ConfigOverrides) -> Result<Self> {
        let store = YamlConfigStore::new(overrides.config.clone());
        let mut config = store.load()?;
        overrides.apply(&mut config);
        config.validate().context("invalid configuration")?;
        tracing::debug!(?config, "configuration resolved");

        Ok(Self {
            output: OutputContext::new(output.no_color, output.quiet),
            config,
            files: LocalFs,
        })
    }

    /// Connect to the configured VM.
    ///
    /// # Errors
    ///
    /// Returns an error if the VM address cannot be resolved.
    pub async fn connect(&self) -> Result<MultipassHost<TokioCommandRunner>> {
        MultipassHost::from_config(&self.config)
            .await
            .with_context(|| format!("connecting to instance '{}'", self.config.instance))
    }
}
