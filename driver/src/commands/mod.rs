//! Command implementations

pub mod cycle;
pub mod diagnostics;
pub mod install_dir;
pub mod lifecycle;
