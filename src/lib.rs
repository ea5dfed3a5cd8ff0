//! vm-forge - effective configuration for Packer VM builds
//!
//! Resolves one effective configuration from three possibly-conflicting
//! sources (command line, default config file, named config file) and
//! validates it against the host before a build is launched.

pub mod cli;
pub mod config;
pub mod packer;
pub mod persist;
pub mod validate;

pub use cli::Cli;
pub use config::{EffectiveConfig, PartialConfig, SourcePriority};
pub use validate::ValidationError;
