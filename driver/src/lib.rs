//! Installer QA library — lifecycle drivers for packaged server
//! distributions on disposable VMs, exposed for acceptance-test harnesses.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
