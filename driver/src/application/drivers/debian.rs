//! Ubuntu `.deb` driver.
//!
//! `dpkg` lays out the install directory and registers the init script, so
//! install only stages the package and normalizes permissions afterwards.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::drivers::{
    local_artifact, neo4j_diagnostic_paths, sh, start_service, stop_service,
};
use crate::application::ports::{LifecycleDriver, LocalFiles, RemoteHost};
use crate::application::services::diagnostics;
use crate::domain::{DebianLayout, InitScript, InstallationDescriptor};

/// Lifecycle driver for Debian packages.
pub struct DebianDriver<'h, H, F> {
    host: &'h H,
    files: &'h F,
    descriptor: InstallationDescriptor,
    layout: DebianLayout,
    service: InitScript,
}

impl<'h, H: RemoteHost, F: LocalFiles> DebianDriver<'h, H, F> {
    #[must_use]
    pub fn new(
        host: &'h H,
        files: &'h F,
        descriptor: InstallationDescriptor,
        layout: DebianLayout,
        service: InitScript,
    ) -> Self {
        Self {
            host,
            files,
            descriptor,
            layout,
            service,
        }
    }

    #[must_use]
    pub fn diagnostic_paths(&self) -> Vec<String> {
        neo4j_diagnostic_paths(&self.descriptor)
    }
}

impl<H: RemoteHost, F: LocalFiles> LifecycleDriver for DebianDriver<'_, H, F> {
    async fn install(&self) -> Result<()> {
        let artifact = local_artifact(&self.descriptor, self.files)?;
        let staging = self.layout.staging_dir.trim_end_matches('/');
        let staged = artifact.staged_path(staging);
        let user = &self.layout.service_user;

        sh(self.host, &format!("mkdir {staging}")).await?;
        self.host
            .copy_to_remote(artifact.local_path(), &staged)
            .await
            .with_context(|| format!("uploading {}", artifact.local_path().display()))?;

        sh(self.host, &format!("sudo dpkg -i {staged}")).await?;

        sh(
            self.host,
            &format!(
                "sudo chown {user}:{user} -R {}",
                self.descriptor.install_dir()
            ),
        )
        .await?;
        sh(
            self.host,
            &format!("sudo chmod -R 777 {}", self.descriptor.path("conf")),
        )
        .await?;
        Ok(())
    }

    async fn uninstall(&self) -> Result<()> {
        sh(
            self.host,
            &format!("sudo dpkg --purge {}", self.layout.package_name),
        )
        .await?;
        sh(
            self.host,
            &format!("sudo rm {} -rf", self.descriptor.install_dir()),
        )
        .await?;
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        start_service(self.host, &self.service).await
    }

    async fn stop(&self) -> Result<()> {
        stop_service(self.host, &self.service).await
    }

    fn install_dir(&self) -> &str {
        self.descriptor.install_dir()
    }

    async fn collect_diagnostics(&self, destination: &Path) -> Result<Vec<PathBuf>> {
        diagnostics::collect(self.host, self.files, &self.diagnostic_paths(), destination).await
    }
}
