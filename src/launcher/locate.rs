//! Installed-package lookup.
//!
//! A small, fixed set of candidate locations is searched in order; a
//! candidate counts as installed only if it holds a manifest. Keeping the
//! "is it installed at all" check on the manifest, not the binary, is
//! what lets absence and corruption stay distinguishable upstream.

use log::debug;
use std::path::PathBuf;

use crate::package::MANIFEST_FILE;
use crate::runtime::Runtime;

use super::PACKAGE_DIR_ENV;

/// Candidate install locations for `package_name`, in search order.
fn candidates<R: Runtime>(runtime: &R, package_name: &str) -> Vec<PathBuf> {
    if let Ok(dir) = runtime.env_var(PACKAGE_DIR_ENV) {
        // The override names the package directory itself.
        return vec![PathBuf::from(dir)];
    }

    let mut dirs = Vec::new();
    if let Ok(exe) = runtime.current_exe() {
        if let Some(exe_dir) = exe.parent() {
            dirs.push(exe_dir.join(package_name));
            dirs.push(exe_dir.join("packages").join(package_name));
            if let Some(parent) = exe_dir.parent() {
                dirs.push(parent.join(package_name));
            }
        }
    }
    if let Ok(cwd) = runtime.current_dir() {
        dirs.push(cwd.join("packages").join(package_name));
    }
    dirs
}

/// Locate the installed package directory, if any candidate holds it.
#[tracing::instrument(skip(runtime))]
pub fn find_installed<R: Runtime>(runtime: &R, package_name: &str) -> Option<PathBuf> {
    for dir in candidates(runtime, package_name) {
        if runtime.is_file(&dir.join(MANIFEST_FILE)) {
            return Some(dir);
        }
        debug!("No {} in {}", MANIFEST_FILE, dir.display());
    }
    None
}
