//! `installer-qa cycle` — install, start, stop, and uninstall in one pass.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::drivers::VariantDriver;
use crate::application::services::sequence;
use crate::output::TerminalReporter;

/// Arguments for the cycle command.
#[derive(Args)]
pub struct CycleArgs {
    /// Collect diagnostics into this directory before uninstalling, or on failure
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,
}

/// Run `installer-qa cycle`.
///
/// # Errors
///
/// Returns the first failing step's error.
pub async fn run(app: &AppContext, args: &CycleArgs) -> Result<()> {
    let host = app.connect().await?;
    let driver = VariantDriver::from_config(&host, &app.files, &app.config)?;
    let reporter = TerminalReporter::new(&app.output);

    let report = sequence::run_sequence(&driver, &reporter, args.diagnostics.as_deref()).await?;
    app.output.success(&format!(
        "{} steps completed on {}",
        report.completed.len(),
        host.instance()
    ));
    for file in &report.diagnostics {
        app.output.kv("wrote", &file.display().to_string());
    }
    Ok(())
}
