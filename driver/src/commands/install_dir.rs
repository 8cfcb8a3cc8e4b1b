//! `installer-qa install-dir` — print the install directory without
//! contacting the VM.

use anyhow::Result;

use crate::app::AppContext;

/// Run `installer-qa install-dir`.
///
/// # Errors
///
/// Returns an error if the configured install directory is invalid.
pub fn run(app: &AppContext) -> Result<()> {
    let descriptor = app.config.descriptor()?;
    println!("{}", descriptor.install_dir());
    Ok(())
}
