//! Ubuntu tar.gz driver.
//!
//! Unpacks the archive in a staging directory, moves its contents into the
//! install directory, and registers the bundled init script through the
//! launcher's `install` hook.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::drivers::{
    local_artifact, neo4j_diagnostic_paths, sh, start_service, stop_service,
};
use crate::application::ports::{LifecycleDriver, LocalFiles, RemoteHost};
use crate::application::services::diagnostics;
use crate::domain::install::remote_join;
use crate::domain::{InitScript, InstallationDescriptor, TarballLayout};

/// Lifecycle driver for `.tar.gz` distributions.
pub struct TarballDriver<'h, H, F> {
    host: &'h H,
    files: &'h F,
    descriptor: InstallationDescriptor,
    layout: TarballLayout,
    service: InitScript,
}

impl<'h, H: RemoteHost, F: LocalFiles> TarballDriver<'h, H, F> {
    #[must_use]
    pub fn new(
        host: &'h H,
        files: &'h F,
        descriptor: InstallationDescriptor,
        layout: TarballLayout,
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

    /// The launcher script shipped inside the archive.
    fn launcher(&self) -> String {
        self.descriptor.path("bin/neo4j")
    }

    /// Remote paths collected by `collect_diagnostics`.
    #[must_use]
    pub fn diagnostic_paths(&self) -> Vec<String> {
        neo4j_diagnostic_paths(&self.descriptor)
    }
}

impl<H: RemoteHost, F: LocalFiles> LifecycleDriver for TarballDriver<'_, H, F> {
    async fn install(&self) -> Result<()> {
        let artifact = local_artifact(&self.descriptor, self.files)?;
        let install_dir = self.descriptor.install_dir();
        let staging = self.layout.staging_dir.trim_end_matches('/');
        let user = &self.layout.service_user;

        sh(self.host, &format!("mkdir {staging}")).await?;
        sh(self.host, &format!("sudo mkdir {install_dir}")).await?;

        self.host
            .copy_to_remote(artifact.local_path(), &artifact.staged_path(staging))
            .await
            .with_context(|| format!("uploading {}", artifact.local_path().display()))?;

        sh(
            self.host,
            &format!("cd {staging}/ && tar xf {}", artifact.file_name()),
        )
        .await?;
        let unpacked = remote_join(staging, &self.layout.archive_root);
        sh(self.host, &format!("sudo mv {unpacked}/* {install_dir}")).await?;

        sh(self.host, &format!("sudo {} -h -u {user} install", self.launcher())).await?;

        sh(self.host, &format!("sudo chown {user}:{user} -R {install_dir}")).await?;
        sh(
            self.host,
            &format!("sudo chmod -R 777 {}", self.descriptor.path("conf")),
        )
        .await?;
        Ok(())
    }

    async fn uninstall(&self) -> Result<()> {
        sh(self.host, &format!("sudo {} -h remove", self.launcher())).await?;
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
