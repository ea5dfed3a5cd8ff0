//! Effective-configuration validation
//!
//! Checks the merged configuration against the environment in a fixed order,
//! failing fast on the first problem. The validator is the only place
//! allowed to fill fields the sources left unset: a discovered packer path,
//! the working directory as output path, and the default config file when
//! one is present.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{EffectiveConfig, DEFAULT_CONFIG_FILE};
use crate::packer::{self, PackerLocator, VERSION_PROBE_TIMEOUT};
use crate::persist::{ConfigPersister, PersistError};

/// Validation failures. All fatal; the tool performs no retries.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Please specify a hypervisor")]
    MissingHypervisor,

    #[error("Packer path not found")]
    PackerNotFound,

    #[error("Packer path does not exist: {0}")]
    PackerPathNotFound(PathBuf),

    #[error("Packer executable not present in path: {path}")]
    PackerInvalid {
        path: PathBuf,
        #[source]
        source: packer::PackerError,
    },

    #[error("Config file does not exist: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to update config file: {0}")]
    UpdateConfig(#[from] PersistError),
}

/// Validate the merged configuration against the environment.
///
/// `base_dir` is the directory defaults are anchored to (the process
/// working directory in normal operation). Returns the configuration with
/// validator-owned defaults filled in; on error the configuration is
/// discarded, never partially used.
pub fn validate(
    mut config: EffectiveConfig,
    base_dir: &Path,
    locator: &dyn PackerLocator,
    persister: &dyn ConfigPersister,
) -> Result<EffectiveConfig, ValidationError> {
    // Hypervisor: must have been resolved from some source.
    if config.hypervisor.is_none() {
        return Err(ValidationError::MissingHypervisor);
    }

    // Packer: discover when unconfigured, otherwise verify the configured
    // binary. A discovered path is trusted as-is; discovery only yields
    // executables already on the search path.
    match &config.packer_path {
        None => {
            let found = locator.locate().ok_or(ValidationError::PackerNotFound)?;
            debug!(path = %found.display(), "using discovered packer");
            config.packer_path = Some(found);
        }
        Some(path) => {
            if !path.exists() {
                return Err(ValidationError::PackerPathNotFound(path.clone()));
            }
            packer::verify_version(path, VERSION_PROBE_TIMEOUT).map_err(|source| {
                ValidationError::PackerInvalid {
                    path: path.clone(),
                    source,
                }
            })?;
        }
    }

    // Output path: the one field the validator may default.
    if config.output_path.is_none() {
        config.output_path = Some(base_dir.to_path_buf());
    }

    if config.update_config == Some(true) {
        persister.persist(&config)?;
    }

    // Config file: a named file must exist; otherwise adopt the default
    // location only if something is actually there.
    match &config.config_file {
        Some(path) if !path.exists() => {
            return Err(ValidationError::ConfigFileNotFound(path.clone()));
        }
        Some(_) => {}
        None => {
            let default = base_dir.join(DEFAULT_CONFIG_FILE);
            if default.exists() {
                config.config_file = Some(default);
            }
        }
    }

    Ok(config)
}
