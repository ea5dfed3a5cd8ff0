//! Configuration field set and per-source records
//!
//! Every source of configuration (command line, named file, default file)
//! contributes a `PartialConfig`: each field is either a concrete value or
//! `None`. Unset is always `None`, never an empty string or `false`, so a
//! present-but-empty file value can be told apart from an explicit override.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Subcommand to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    Create,
    Destroy,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Create => "create",
            Command::Destroy => "destroy",
        }
    }
}

/// The supported hypervisor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Hypervisor {
    VmwareWorkstationPro,
    Virtualbox,
}

impl Hypervisor {
    /// Parse a hypervisor identifier as it appears in a config file.
    ///
    /// Returns `None` for names outside the supported set.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "vmware-workstation-pro" => Some(Hypervisor::VmwareWorkstationPro),
            "virtualbox" => Some(Hypervisor::Virtualbox),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hypervisor::VmwareWorkstationPro => "vmware-workstation-pro",
            Hypervisor::Virtualbox => "virtualbox",
        }
    }
}

impl std::fmt::Display for Hypervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a `PartialConfig` came from, in precedence order.
///
/// The derived `Ord` is the priority model: the command line always wins,
/// a user-named config file outranks the implicit default-location file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourcePriority {
    DefaultFile,
    NamedFile,
    CommandLine,
}

/// One source's contribution to the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialConfig {
    /// Precedence of this source. Always set.
    pub priority: SourcePriority,

    /// Subcommand to run (only the command line supplies this).
    pub command: Option<Command>,

    /// Explicitly named config file (only the command line supplies this).
    pub config_file: Option<PathBuf>,

    /// Hypervisor to create the VM with.
    pub hypervisor: Option<Hypervisor>,

    /// Output directory for the VM created.
    pub output_path: Option<PathBuf>,

    /// Path to the packer binary.
    pub packer_path: Option<PathBuf>,

    /// Whether to write resolved values back to the config file.
    pub update_config: Option<bool>,
}

impl PartialConfig {
    /// An all-unset record at the given priority.
    pub fn empty(priority: SourcePriority) -> Self {
        Self {
            priority,
            command: None,
            config_file: None,
            hypervisor: None,
            output_path: None,
            packer_path: None,
            update_config: None,
        }
    }

    /// True if no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.command.is_none()
            && self.config_file.is_none()
            && self.hypervisor.is_none()
            && self.output_path.is_none()
            && self.packer_path.is_none()
            && self.update_config.is_none()
    }

    /// Overlay a higher-priority record on top of this one.
    ///
    /// Every field the overlay has set replaces the base value; an unset
    /// field never clobbers a set one. The result carries the overlay's
    /// priority.
    pub fn overlay(self, higher: PartialConfig) -> PartialConfig {
        PartialConfig {
            priority: higher.priority,
            command: higher.command.or(self.command),
            config_file: higher.config_file.or(self.config_file),
            hypervisor: higher.hypervisor.or(self.hypervisor),
            output_path: higher.output_path.or(self.output_path),
            packer_path: higher.packer_path.or(self.packer_path),
            update_config: higher.update_config.or(self.update_config),
        }
    }
}
