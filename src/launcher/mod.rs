//! The launcher: resolve the platform, find the installed package, run
//! its binary transparently.
//!
//! Every failure here is terminal. Running a possibly-wrong binary is
//! strictly worse than a clear error, so there is no fallback, no retry,
//! and no degraded mode; the child's own failures are not launcher
//! failures and pass through as exit status.

mod locate;

pub use locate::find_installed;

use log::{debug, warn};
use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::package::{LOADER_FILE, LoaderStub, MANIFEST_FILE, Manifest};
use crate::platform::{PlatformKey, SystemLibcProbe, host_cpu, host_os, resolve};
use crate::process::{ExecOutcome, run_and_wait};
use crate::registry;
use crate::runtime::Runtime;

/// Overrides the resolved platform key, verbatim. Diagnostic hatch.
pub const PLATFORM_ENV: &str = "ANSILUST_PLATFORM";

/// Points directly at an installed package directory, skipping the
/// candidate search.
pub const PACKAGE_DIR_ENV: &str = "ANSILUST_PACKAGE_DIR";

/// Fatal launcher failures. The two kinds stay distinct because their
/// remediation differs: an absent package means installation never
/// happened for this platform, a broken payload means it did and the
/// package needs reinstalling.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("no installed package {package} for platform {key}")]
    UnsupportedPlatform { key: String, package: String },

    #[error("package {package} is corrupted: {reason}")]
    CorruptInstallation {
        package: String,
        path: PathBuf,
        reason: String,
    },
}

impl LaunchError {
    /// Full user-facing diagnostic, including remediation.
    pub fn render(&self) -> String {
        match self {
            LaunchError::UnsupportedPlatform { key, package } => {
                let mut msg = String::new();
                let _ = writeln!(
                    msg,
                    "Error: ansilust is not available for your platform ({})",
                    key
                );
                let _ = writeln!(msg);
                let _ = writeln!(msg, "The package \"{}\" was not found.", package);
                let _ = writeln!(msg);
                let _ = writeln!(msg, "Supported platforms:");
                for supported in registry::supported_keys() {
                    let _ = writeln!(msg, "  - {}", supported);
                }
                let _ = writeln!(msg);
                let _ = writeln!(msg, "To fix this, reinstall ansilust so the binary package");
                let _ = write!(msg, "for this machine is installed alongside the launcher.");
                msg
            }
            LaunchError::CorruptInstallation {
                package,
                path,
                reason,
            } => {
                let mut msg = String::new();
                let _ = writeln!(msg, "Error: ansilust binary not usable at {}", path.display());
                let _ = writeln!(msg);
                let _ = writeln!(msg, "The ansilust binary is missing or corrupted ({}).", reason);
                let _ = writeln!(msg);
                let _ = writeln!(msg, "To fix this, reinstall the \"{}\" package.", package);
                msg
            }
        }
    }
}

/// Resolve the host's platform key, honoring the override env var.
pub fn resolved_key<R: Runtime>(runtime: &R) -> String {
    if let Ok(forced) = runtime.env_var(PLATFORM_ENV) {
        debug!("Platform key forced via {}: {}", PLATFORM_ENV, forced);
        return forced;
    }
    let key: PlatformKey = resolve(host_os(), host_cpu(), &SystemLibcProbe);
    key.to_string()
}

/// Find, validate, and run the platform binary. Returns the child's
/// outcome; the caller turns that into this process's exit status.
#[tracing::instrument(skip(runtime, args))]
pub fn launch<R: Runtime>(runtime: &R, args: &[OsString]) -> Result<ExecOutcome, LaunchError> {
    let key = resolved_key(runtime);
    let package = registry::package_name_for_key(&key);
    debug!("Platform {} -> package {}", key, package);

    // An unknown key can never have a package; same error as a missing one.
    if registry::find_by_key(&key).is_none() {
        return Err(LaunchError::UnsupportedPlatform { key, package });
    }

    let package_dir = match find_installed(runtime, &package) {
        Some(dir) => dir,
        None => return Err(LaunchError::UnsupportedPlatform { key, package }),
    };
    debug!("Found package at {}", package_dir.display());

    let manifest_path = package_dir.join(MANIFEST_FILE);
    let manifest = Manifest::load(runtime, &manifest_path).map_err(|e| {
        LaunchError::CorruptInstallation {
            package: package.clone(),
            path: manifest_path,
            reason: format!("manifest unreadable: {:#}", e),
        }
    })?;
    if manifest.name != package {
        warn!(
            "Package at {} declares name {}, expected {}",
            package_dir.display(),
            manifest.name,
            package
        );
    }

    let stub_path = package_dir.join(LOADER_FILE);
    let stub = LoaderStub::load(runtime, &stub_path).map_err(|e| {
        LaunchError::CorruptInstallation {
            package: package.clone(),
            path: stub_path,
            reason: format!("loader stub unreadable: {:#}", e),
        }
    })?;

    let bin_path = stub.bin_path(&package_dir, host_os());
    if !runtime.is_file(&bin_path) {
        return Err(LaunchError::CorruptInstallation {
            package,
            path: bin_path,
            reason: "not a regular file".to_string(),
        });
    }

    repair_execute_bit(runtime, &package, &bin_path)?;

    Ok(run_and_wait(&bin_path, args))
}

/// Archives and installers sometimes strip execute bits; set them back
/// instead of failing. Not applicable on Windows.
fn repair_execute_bit<R: Runtime>(
    runtime: &R,
    package: &str,
    bin_path: &std::path::Path,
) -> Result<(), LaunchError> {
    if host_os() == "win32" {
        return Ok(());
    }

    let corrupt = |reason: String| LaunchError::CorruptInstallation {
        package: package.to_string(),
        path: bin_path.to_path_buf(),
        reason,
    };

    let mode = runtime
        .file_mode(bin_path)
        .map_err(|e| corrupt(format!("cannot read permissions: {:#}", e)))?;
    if mode & 0o111 == 0 {
        debug!("Repairing missing execute bits on {}", bin_path.display());
        runtime
            .set_permissions(bin_path, mode | 0o111)
            .map_err(|e| corrupt(format!("cannot restore execute permission: {:#}", e)))?;
    }
    Ok(())
}
