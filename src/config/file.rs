//! Config file adapters
//!
//! Reads the `[default]` section of a TOML config file into a
//! `PartialConfig`. Two adapters share the parsing: the default-location
//! file (`config.toml` in the working directory), which contributes nothing
//! when absent, and a user-named file, which must exist.
//!
//! A zero-length value for a recognized key is treated as if the key were
//! absent. A present-but-empty file must not override anything.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::source::{Hypervisor, PartialConfig, SourcePriority};

/// Well-known config file name, probed in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Errors from reading or interpreting a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unsupported hypervisor '{value}' in config file {path}")]
    UnsupportedHypervisor { value: String, path: PathBuf },
}

/// On-disk shape of a config file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub default: DefaultSection,
}

/// The `[default]` section. Unknown keys are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DefaultSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub packer_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// Load the default-location config file from `dir`, if present.
///
/// An absent file contributes no record at all. This is deliberately not an
/// all-unset record: contributing nothing keeps the resolver contract free
/// of placeholder sources.
pub fn load_default(dir: &Path) -> Result<Option<PartialConfig>, ConfigError> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no default config file");
        return Ok(None);
    }
    debug!(path = %path.display(), "loading default config file");
    load_file(&path, SourcePriority::DefaultFile).map(Some)
}

/// Load a config file the user named on the command line.
///
/// The file must exist; a missing named file is an immediate error, raised
/// before any other validation runs.
pub fn load_named(path: &Path) -> Result<PartialConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "loading named config file");
    load_file(path, SourcePriority::NamedFile)
}

fn load_file(path: &Path, priority: SourcePriority) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut record = PartialConfig::empty(priority);

    if let Some(name) = non_empty(parsed.default.hypervisor) {
        record.hypervisor = Some(Hypervisor::parse(&name).ok_or_else(|| {
            ConfigError::UnsupportedHypervisor {
                value: name.clone(),
                path: path.to_path_buf(),
            }
        })?);
    }
    record.packer_path = non_empty(parsed.default.packer_path).map(PathBuf::from);
    record.output_path = non_empty(parsed.default.output_path).map(PathBuf::from);

    Ok(record)
}

/// Empty means unset: a key with a zero-length value is not an override.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
