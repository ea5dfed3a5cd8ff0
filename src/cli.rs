//! Command-line surface
//!
//! Parsing is kept pure: clap produces a `Cli`, and `to_partial` turns it
//! into the highest-priority `PartialConfig` with no side effects. Flags
//! the user did not pass stay unset rather than defaulted; even the output
//! path default is deferred to validation.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Command, Hypervisor, PartialConfig, SourcePriority};

#[derive(Debug, Parser)]
#[command(name = "vm-forge")]
#[command(about = "Resolve and validate the configuration for a Packer VM build", version)]
pub struct Cli {
    /// Subcommand to run
    #[arg(value_enum)]
    pub command: Command,

    /// Which hypervisor to create the VM with
    #[arg(long, alias = "hy", value_enum)]
    pub hypervisor: Option<Hypervisor>,

    /// Path to the packer binary
    #[arg(long, short = 'p')]
    pub packer_path: Option<PathBuf>,

    /// Path to the output directory for the VM created
    #[arg(long, short = 'o')]
    pub output_path: Option<PathBuf>,

    /// Update the config file using the values resolved for this run
    #[arg(long, short = 'u')]
    pub update_config: bool,

    /// Use defaults from a config file
    #[arg(long, short = 'f', visible_alias = "file")]
    pub config_file: Option<PathBuf>,
}

impl Cli {
    /// The command line's contribution to the configuration.
    ///
    /// A boolean flag left off the command line is unset, not `false`,
    /// so it cannot shadow a value from a config file.
    pub fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            priority: SourcePriority::CommandLine,
            command: Some(self.command),
            config_file: self.config_file.clone(),
            hypervisor: self.hypervisor,
            output_path: self.output_path.clone(),
            packer_path: self.packer_path.clone(),
            update_config: self.update_config.then_some(true),
        }
    }
}
