//! Config persistence collaborator
//!
//! When `--update-config` is passed, the resolved values are written back so
//! later runs can omit the flags. The written shape is the same `[default]`
//! section the file adapters read.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ConfigFile, DefaultSection, EffectiveConfig, DEFAULT_CONFIG_FILE};

/// Persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to write config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Writes resolved configuration values back to a config file.
pub trait ConfigPersister {
    fn persist(&self, config: &EffectiveConfig) -> Result<(), PersistError>;
}

/// Persists to the named config file, or to the default location in the
/// base directory when no file was named.
pub struct TomlPersister {
    base_dir: PathBuf,
}

impl TomlPersister {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    fn target(&self, config: &EffectiveConfig) -> PathBuf {
        config
            .config_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_CONFIG_FILE))
    }
}

impl ConfigPersister for TomlPersister {
    fn persist(&self, config: &EffectiveConfig) -> Result<(), PersistError> {
        let path = self.target(config);

        let file = ConfigFile {
            default: DefaultSection {
                hypervisor: config.hypervisor.map(|hy| hy.as_str().to_string()),
                packer_path: config
                    .packer_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                output_path: config
                    .output_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            },
        };

        let contents = toml::to_string(&file)?;
        debug!(path = %path.display(), "updating config file");
        fs::write(&path, contents).map_err(|source| PersistError::Io { path, source })
    }
}
