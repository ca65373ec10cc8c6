//! Source layout detection and release-version resolution.

use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::registry::PackageDef;
use crate::runtime::Runtime;

/// CI layout root: one subdirectory per build target, pre-sorted by the
/// build matrix.
pub const CI_BINARIES_DIR: &str = "platform-binaries";

/// Local layout: the single host-platform build.
pub const LOCAL_BINARY: &str = "zig-out/bin/ansilust";

/// Output directory for assembled packages.
pub const PACKAGES_DIR: &str = "packages";

/// Fallback when neither an override nor a root manifest supplies one.
pub const DEFAULT_VERSION: &str = "0.0.1";

/// Where compiled binaries come from.
///
/// CI runs pre-sort binaries into per-target subdirectories; a developer
/// machine has only its own build. The same assembler serves both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLayout {
    /// `{root}/platform-binaries/{build_target}/{bin_name}` per target.
    Ci(PathBuf),
    /// One fixed path reused for every target. Only the host's own target
    /// ends up with a matching binary; the loop does not filter foreign
    /// targets out, mirroring how releases have always been cut locally.
    Local(PathBuf),
}

impl SourceLayout {
    /// Pick the layout by probing for the CI directory.
    pub fn detect<R: Runtime>(runtime: &R, root: &Path) -> Self {
        let ci_root = root.join(CI_BINARIES_DIR);
        if runtime.is_dir(&ci_root) {
            debug!("Using CI binaries layout at {}", ci_root.display());
            SourceLayout::Ci(ci_root)
        } else {
            let local = root.join(LOCAL_BINARY);
            debug!("Using local binary layout at {}", local.display());
            SourceLayout::Local(local)
        }
    }

    /// The expected source binary for one registry entry.
    pub fn binary_for(&self, def: &PackageDef) -> PathBuf {
        match self {
            SourceLayout::Ci(root) => root.join(def.build_target).join(def.bin_name()),
            SourceLayout::Local(path) => path.clone(),
        }
    }
}

/// Resolve the version to stamp into every manifest: explicit override,
/// else the root manifest's `version` field, else [`DEFAULT_VERSION`].
pub fn resolve_version<R: Runtime>(
    runtime: &R,
    root: &Path,
    version_override: Option<&str>,
) -> String {
    if let Some(version) = version_override {
        return version.to_string();
    }

    let manifest_path = root.join("package.json");
    match runtime.read_to_string(&manifest_path) {
        Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => value
                .get("version")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            Err(e) => {
                warn!("Could not parse {}: {}", manifest_path.display(), e);
                DEFAULT_VERSION.to_string()
            }
        },
        Err(_) => {
            warn!(
                "Could not read {}, using version {}",
                manifest_path.display(),
                DEFAULT_VERSION
            );
            DEFAULT_VERSION.to_string()
        }
    }
}
