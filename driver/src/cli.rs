//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, ConfigOverrides, OutputFlags};
use crate::commands;
use crate::domain::{LifecycleStep, PackageVariant};

/// Install, start, stop, and uninstall a packaged server on a test VM
#[derive(Parser)]
#[command(
    name = "installer-qa",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: $INSTALLER_QA_CONFIG or ~/.config/installer-qa/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Multipass instance to drive
    #[arg(long, global = true)]
    pub instance: Option<String>,

    /// Package format of the artifact (tarball, debian)
    #[arg(long, global = true)]
    pub variant: Option<PackageVariant>,

    /// Local installer artifact
    #[arg(long, global = true)]
    pub artifact: Option<PathBuf>,

    /// Remote install directory
    #[arg(long, global = true)]
    pub install_dir: Option<String>,

    /// VM address to use instead of asking multipass
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-empty `NO_COLOR` other than 0/false/off counts)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stage and install the artifact
    Install,

    /// Start the service
    Start,

    /// Stop the service
    Stop,

    /// Remove the service and its install directory
    Uninstall,

    /// Download logs and config files
    Diagnostics(commands::diagnostics::DiagnosticsArgs),

    /// Print the install directory
    InstallDir,

    /// Run install, start, stop, and uninstall in order
    Cycle(commands::cycle::CycleArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            instance,
            variant,
            artifact,
            install_dir,
            address,
            quiet,
            no_color,
            command,
        } = self;
        let overrides = ConfigOverrides {
            config,
            instance,
            variant,
            artifact,
            install_dir,
            address,
        };
        let app = AppContext::new(&OutputFlags { no_color, quiet }, &overrides)?;

        match command {
            Command::Install => commands::lifecycle::run(&app, LifecycleStep::Install).await,
            Command::Start => commands::lifecycle::run(&app, LifecycleStep::Start).await,
            Command::Stop => commands::lifecycle::run(&app, LifecycleStep::Stop).await,
            Command::Uninstall => commands::lifecycle::run(&app, LifecycleStep::Uninstall).await,
            Command::Diagnostics(args) => commands::diagnostics::run(&app, &args).await,
            Command::InstallDir => commands::install_dir::run(&app),
            Command::Cycle(args) => commands::cycle::run(&app, &args).await,
        }
    }
}
