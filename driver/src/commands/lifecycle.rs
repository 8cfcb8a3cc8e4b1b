//! `installer-qa install|start|stop|uninstall` — run one lifecycle step.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::drivers::VariantDriver;
use crate::application::ports::ProgressReporter;
use crate::application::services::sequence;
use crate::domain::LifecycleStep;
use crate::output::TerminalReporter;

/// Run a single lifecycle step against the configured VM.
///
/// # Errors
///
/// Returns an error if the VM cannot be reached or the step fails.
pub async fn run(app: &AppContext, step: LifecycleStep) -> Result<()> {
    let host = app.connect().await?;
    let driver = VariantDriver::from_config(&host, &app.files, &app.config)?;
    let reporter = TerminalReporter::new(&app.output);

    reporter.step(&format!(
        "{} {} on {}...",
        step.as_str(),
        driver.variant(),
        host.instance()
    ));
    sequence::run_step(&driver, step).await?;
    reporter.success(&format!(
        "{} complete ({:?})",
        step.as_str(),
        step.postcondition()
    ));
    Ok(())
}
