//! Configuration resolution
//!
//! Three sources can contribute configuration, in precedence order:
//! 1. Command-line arguments (always present, always wins)
//! 2. A config file named with `--config-file`
//! 3. `config.toml` in the working directory, if it exists
//!
//! Each source yields a `PartialConfig`; the resolver merges them
//! field-by-field into the `EffectiveConfig` handed to validation.

mod file;
mod resolver;
mod source;

pub use file::{
    load_default, load_named, ConfigError, ConfigFile, DefaultSection, DEFAULT_CONFIG_FILE,
};
pub use resolver::{resolve, EffectiveConfig, ResolveError};
pub use source::{Command, Hypervisor, PartialConfig, SourcePriority};
