//! `installer-qa diagnostics <DEST>` — collect logs and config files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::drivers::VariantDriver;
use crate::application::ports::LifecycleDriver;

/// Arguments for the diagnostics command.
#[derive(Args)]
pub struct DiagnosticsArgs {
    /// Local directory to write the files into
    pub dest: PathBuf,
}

/// Run `installer-qa diagnostics`.
///
/// # Errors
///
/// Returns an error if the VM cannot be reached, a download fails, or a
/// placeholder cannot be written.
pub async fn run(app: &AppContext, args: &DiagnosticsArgs) -> Result<()> {
    let host = app.connect().await?;
    let driver = VariantDriver::from_config(&host, &app.files, &app.config)?;

    let files = driver.collect_diagnostics(&args.dest).await?;
    app.output.success(&format!("collected {} files", files.len()));
    for file in &files {
        app.output.kv("wrote", &file.display().to_string());
    }
    Ok(())
}
