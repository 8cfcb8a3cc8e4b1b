//! The full clean-VM pass: install → start → stop → uninstall.
//!
//! Steps run one at a time and are never retried. The first failure ends the
//! pass; when a diagnostics directory is given, diagnostics are collected
//! before that failure is returned.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LifecycleDriver, ProgressReporter};
use crate::domain::LifecycleStep;

/// Outcome of a successful pass.
#[derive(Debug, Default)]
pub struct SequenceReport {
    pub completed: Vec<LifecycleStep>,
    pub diagnostics: Vec<PathBuf>,
}

/// Run a single lifecycle step against `driver`.
///
/// # Errors
///
/// Propagates the driver's error unchanged.
pub async fn run_step(driver: &impl LifecycleDriver, step: LifecycleStep) -> Result<()> {
    match step {
        LifecycleStep::Install => driver.install().await,
        LifecycleStep::Start => driver.start().await,
        LifecycleStep::Stop => driver.stop().await,
        LifecycleStep::Uninstall => driver.uninstall().await,
    }
}

/// Drive a deployment through every lifecycle state and back to absent.
///
/// # Errors
///
/// Returns the first step failure, with the step name as context, or a
/// diagnostics failure on the success path.
pub async fn run_sequence(
    driver: &impl LifecycleDriver,
    reporter: &impl ProgressReporter,
    diagnostics_dir: Option<&Path>,
) -> Result<SequenceReport> {
    let mut report = SequenceReport::default();

    for step in LifecycleStep::SEQUENCE {
        if step == LifecycleStep::Uninstall {
            if let Some(dir) = diagnostics_dir {
                reporter.step("collecting diagnostics...");
                report.diagnostics = driver
                    .collect_diagnostics(dir)
                    .await
                    .context("collecting diagnostics")?;
                reporter.success(&format!("diagnostics written to {}", dir.display()));
            }
        }

        reporter.step(&format!("{}...", step.as_str()));
        if let Err(err) = run_step(driver, step).await {
            if let Some(dir) = diagnostics_dir {
                salvage_diagnostics(driver, reporter, dir).await;
            }
            return Err(err.context(format!("{} failed", step.as_str())));
        }
        tracing::debug!(step = step.as_str(), state = ?step.postcondition(), "step complete");
        reporter.success(step.as_str());
        report.completed.push(step);
    }

    Ok(report)
}

// The step error is what the caller needs; a diagnostics failure here is
// only reported.
async fn salvage_diagnostics(
    driver: &impl LifecycleDriver,
    reporter: &impl ProgressReporter,
    dir: &Path,
) {
    match driver.collect_diagnostics(dir).await {
        Ok(paths) => reporter.warn(&format!(
            "collected {} diagnostic files into {}",
            paths.len(),
            dir.display()
        )),
        Err(err) => reporter.warn(&format!("diagnostics collection failed: {err:#}")),
    }
}
