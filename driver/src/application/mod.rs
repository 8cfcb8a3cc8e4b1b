//! Application layer — port trait definitions, package drivers, and
//! use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod drivers;
pub mod ports;
pub mod services;

pub use ports::{
    CommandRunner, ConfigStore, FileTransfer, HostIdentity, LifecycleDriver, LocalFiles,
    ProgressReporter, RemoteHost, RemoteShell,
};
