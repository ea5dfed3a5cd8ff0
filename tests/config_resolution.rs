//! End-to-end configuration resolution scenarios
//!
//! Exercises the adapters, the resolver and the validator together the way
//! the binary wires them, with the filesystem and collaborators under test
//! control.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use vm_forge::config::{self, Command, Hypervisor, SourcePriority};
use vm_forge::packer::PackerLocator;
use vm_forge::persist::{ConfigPersister, PersistError};
use vm_forge::validate::{validate, ValidationError};
use vm_forge::{Cli, EffectiveConfig};

struct FakeLocator(Option<PathBuf>);

impl PackerLocator for FakeLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

struct NullPersister;

impl ConfigPersister for NullPersister {
    fn persist(&self, _config: &EffectiveConfig) -> Result<(), PersistError> {
        Ok(())
    }
}

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["vm-forge"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

/// Gather sources the way the binary does: CLI always, named file when
/// requested, default file when present.
fn gather(cli: &Cli, dir: &Path) -> Result<Vec<vm_forge::PartialConfig>, config::ConfigError> {
    let mut sources = vec![cli.to_partial()];
    if let Some(path) = &cli.config_file {
        sources.push(config::load_named(path)?);
    }
    if let Some(record) = config::load_default(dir)? {
        sources.push(record);
    }
    Ok(sources)
}

#[test]
fn default_file_hypervisor_applies_when_cli_is_silent() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[default]\nhypervisor = \"virtualbox\"\n",
    )
    .unwrap();

    let sources = gather(&cli(&["create"]), dir.path()).unwrap();
    let effective = config::resolve(sources).unwrap();

    assert_eq!(effective.hypervisor, Some(Hypervisor::Virtualbox));
    assert_eq!(effective.command, Some(Command::Create));
}

#[test]
fn cli_hypervisor_beats_named_file() {
    let dir = TempDir::new().unwrap();
    let named = dir.path().join("build.toml");
    fs::write(&named, "[default]\nhypervisor = \"virtualbox\"\n").unwrap();

    let args = cli(&[
        "create",
        "--hypervisor",
        "vmware-workstation-pro",
        "-f",
        named.to_str().unwrap(),
    ]);
    let effective = config::resolve(gather(&args, dir.path()).unwrap()).unwrap();

    assert_eq!(effective.hypervisor, Some(Hypervisor::VmwareWorkstationPro));
}

#[test]
fn named_file_beats_default_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[default]\npacker_path = \"/default/packer\"\n",
    )
    .unwrap();
    let named = dir.path().join("build.toml");
    fs::write(&named, "[default]\npacker_path = \"/named/packer\"\n").unwrap();

    let args = cli(&["create", "-f", named.to_str().unwrap()]);
    let effective = config::resolve(gather(&args, dir.path()).unwrap()).unwrap();

    assert_eq!(effective.packer_path, Some(PathBuf::from("/named/packer")));
}

#[test]
fn empty_file_value_contributes_no_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[default]\nhypervisor = \"\"\n",
    )
    .unwrap();

    let sources = gather(&cli(&["create"]), dir.path()).unwrap();
    let record = sources
        .iter()
        .find(|s| s.priority == SourcePriority::DefaultFile)
        .unwrap();
    assert!(record.hypervisor.is_none());

    let effective = config::resolve(sources).unwrap();
    assert!(effective.hypervisor.is_none());
}

#[test]
fn missing_named_file_fails_before_validation() {
    let dir = TempDir::new().unwrap();
    let args = cli(&["create", "--hypervisor", "virtualbox", "-f", "missing.ini"]);

    let err = gather(&args, dir.path()).unwrap_err();
    assert!(matches!(err, config::ConfigError::NotFound(_)));
    assert!(err.to_string().contains("missing.ini"));
}

#[test]
fn failed_discovery_reports_packer_not_found_not_hypervisor() {
    let dir = TempDir::new().unwrap();
    let args = cli(&["create", "--hypervisor", "vmware-workstation-pro"]);
    let effective = config::resolve(gather(&args, dir.path()).unwrap()).unwrap();

    let err = validate(effective, dir.path(), &FakeLocator(None), &NullPersister).unwrap_err();
    assert!(matches!(err, ValidationError::PackerNotFound));
}

#[test]
fn validated_run_fills_validator_owned_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[default]\nhypervisor = \"virtualbox\"\n",
    )
    .unwrap();

    let sources = gather(&cli(&["create"]), dir.path()).unwrap();
    let effective = config::resolve(sources).unwrap();
    let discovered = PathBuf::from("/usr/local/bin/packer");

    let validated = validate(
        effective,
        dir.path(),
        &FakeLocator(Some(discovered.clone())),
        &NullPersister,
    )
    .unwrap();

    assert_eq!(validated.packer_path, Some(discovered));
    assert_eq!(validated.output_path, Some(dir.path().to_path_buf()));
    // The default file exists, so it is adopted as the config file.
    assert_eq!(validated.config_file, Some(dir.path().join("config.toml")));
}

#[test]
fn resolution_is_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[default]\nhypervisor = \"virtualbox\"\noutput_path = \"/var/vm\"\n",
    )
    .unwrap();
    let args = cli(&["destroy", "-p", "/opt/packer"]);

    let first = config::resolve(gather(&args, dir.path()).unwrap()).unwrap();
    let second = config::resolve(gather(&args, dir.path()).unwrap()).unwrap();
    assert_eq!(first, second);
}
