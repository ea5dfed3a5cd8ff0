//! Priority resolver
//!
//! Merges the per-source `PartialConfig` records into one `EffectiveConfig`.
//! Sources are sorted ascending by priority and folded together: each
//! higher-priority record overlays the accumulated base, so the highest
//! priority record's set fields always survive and an unset field never
//! overwrites a set one.

use std::path::PathBuf;

use tracing::debug;

use super::source::{Command, Hypervisor, PartialConfig};

/// The fully merged configuration, priority dropped.
///
/// Fields left `None` are unset by design at this stage; the validator
/// fills `packer_path` (by discovery), `output_path` (working directory)
/// and `config_file` (default-location probe) where the sources were silent.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub command: Option<Command>,
    pub config_file: Option<PathBuf>,
    pub hypervisor: Option<Hypervisor>,
    pub output_path: Option<PathBuf>,
    pub packer_path: Option<PathBuf>,
    pub update_config: Option<bool>,
}

impl From<PartialConfig> for EffectiveConfig {
    fn from(merged: PartialConfig) -> Self {
        Self {
            command: merged.command,
            config_file: merged.config_file,
            hypervisor: merged.hypervisor,
            output_path: merged.output_path,
            packer_path: merged.packer_path,
            update_config: merged.update_config,
        }
    }
}

/// Resolver failures.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No configuration sources produced a record")]
    EmptySourceSet,
}

/// Merge source records into the effective configuration.
///
/// Only sources that actually produced a record belong here: an absent
/// default file contributes nothing, not an empty record.
pub fn resolve(mut sources: Vec<PartialConfig>) -> Result<EffectiveConfig, ResolveError> {
    sources.sort_by_key(|source| source.priority);

    let mut records = sources.into_iter();
    let seed = records.next().ok_or(ResolveError::EmptySourceSet)?;
    debug!(priority = ?seed.priority, "seeding merge");

    let merged = records.fold(seed, |base, higher| {
        debug!(priority = ?higher.priority, "overlaying source");
        base.overlay(higher)
    });

    Ok(EffectiveConfig::from(merged))
}
