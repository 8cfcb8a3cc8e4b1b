//! Unit tests for installer-qa
//!
//! These tests use fake hosts and mock runners and run fast without
//! external I/O beyond temporary directories.

mod multipass_host;
mod tarball_driver;
