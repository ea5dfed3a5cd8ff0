//! Packer executable collaborators
//!
//! Two environment-facing operations the validator depends on: locating a
//! packer binary on the host when none was configured, and probing a
//! configured binary's identity by running `packer version`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

/// How long the version probe may run before the child is killed.
pub const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Finds a packer executable on the host.
pub trait PackerLocator {
    /// Locate a packer binary, or `None` if the host has none.
    fn locate(&self) -> Option<PathBuf>;
}

/// Locates packer via the `PATH` search, like a shell would.
pub struct SystemLocator;

impl PackerLocator for SystemLocator {
    fn locate(&self) -> Option<PathBuf> {
        match which::which("packer") {
            Ok(path) => {
                debug!(path = %path.display(), "discovered packer on PATH");
                Some(path)
            }
            Err(err) => {
                debug!(error = %err, "packer discovery failed");
                None
            }
        }
    }
}

/// Version probe failures.
#[derive(Debug, thiserror::Error)]
pub enum PackerError {
    #[error("Failed to invoke {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Version probe of {0} timed out")]
    Timeout(PathBuf),

    #[error("{0} exited with a failure running 'version'")]
    ExitFailure(PathBuf),

    #[error("{0} did not identify itself as Packer")]
    UnrecognizedOutput(PathBuf),
}

/// Run `<path> version` and check the binary identifies itself as Packer.
///
/// The child is killed if it outlives `timeout`; a hung probe must not hang
/// the whole run.
pub fn verify_version(path: &Path, timeout: Duration) -> Result<(), PackerError> {
    let mut child = Command::new(path)
        .arg("version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| PackerError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PackerError::Timeout(path.to_path_buf()));
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(source) => {
                return Err(PackerError::Spawn {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    };

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        let _ = pipe.read_to_string(&mut stdout);
    }
    debug!(status = %status, output = %stdout.trim(), "packer version probe");

    if !status.success() {
        return Err(PackerError::ExitFailure(path.to_path_buf()));
    }
    if !stdout.contains("Packer") {
        return Err(PackerError::UnrecognizedOutput(path.to_path_buf()));
    }
    Ok(())
}
