//! The package assembler: turn compiled binaries into installable
//! platform packages.
//!
//! One pass over the registry, in registry order. A target whose binary
//! was not built this run is a skip, not a failure; a target whose
//! filesystem writes fail is recorded and the loop moves on, so one bad
//! target never blocks the other nine. Re-running fully overwrites each
//! target's generated files.

mod layout;

pub use layout::{
    CI_BINARIES_DIR, DEFAULT_VERSION, LOCAL_BINARY, PACKAGES_DIR, SourceLayout, resolve_version,
};

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::package::{BIN_DIR, LOADER_FILE, LoaderStub, MANIFEST_FILE, Manifest, render_readme};
use crate::platform::host_os;
use crate::registry::{PACKAGES, PackageDef};
use crate::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Project root: source binaries below it, `packages/` output under it.
    pub root: PathBuf,
    /// Explicit release version; wins over the root manifest.
    pub version_override: Option<String>,
}

/// Outcome of one assembly run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssembleSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AssembleSummary {
    /// Skips are expected; only write failures make a run unsuccessful.
    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}

/// Assemble every target whose source binary is present.
#[tracing::instrument(skip(runtime, opts))]
pub fn assemble<R: Runtime>(runtime: &R, opts: &AssembleOptions) -> Result<AssembleSummary> {
    let version = resolve_version(runtime, &opts.root, opts.version_override.as_deref());
    let layout = SourceLayout::detect(runtime, &opts.root);
    let packages_dir = opts.root.join(PACKAGES_DIR);

    println!("Assembling ansilust packages (v{})", version);

    let mut summary = AssembleSummary::default();
    for def in &PACKAGES {
        let source = layout.binary_for(def);
        if !runtime.is_file(&source) {
            println!(
                "  skip {} (no binary for {})",
                def.package_name, def.build_target
            );
            summary.skipped += 1;
            continue;
        }

        match assemble_one(runtime, def, &source, &packages_dir, &opts.root, &version) {
            Ok(()) => {
                println!("  ok   {}", def.package_name);
                summary.written += 1;
            }
            Err(e) => {
                eprintln!("  fail {}: {:#}", def.package_name, e);
                summary.failed += 1;
            }
        }
    }

    println!(
        "Complete: {} assembled, {} skipped, {} failed",
        summary.written, summary.skipped, summary.failed
    );
    info!("Assembly summary: {:?}", summary);
    Ok(summary)
}

/// Write one package directory: binary, manifest, loader stub, README,
/// LICENSE. Not atomic; a failed target may leave partial output, which
/// the next clean run overwrites in full.
fn assemble_one<R: Runtime>(
    runtime: &R,
    def: &PackageDef,
    source: &Path,
    packages_dir: &Path,
    root: &Path,
    version: &str,
) -> Result<()> {
    let package_dir = packages_dir.join(def.package_name);
    let bin_dir = package_dir.join(BIN_DIR);
    runtime
        .create_dir_all(&bin_dir)
        .with_context(|| format!("creating {}", bin_dir.display()))?;

    let dest = bin_dir.join(def.bin_name());
    runtime
        .copy(source, &dest)
        .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
    if host_os() != "win32" {
        runtime
            .set_permissions(&dest, 0o755)
            .with_context(|| format!("marking {} executable", dest.display()))?;
    }

    let manifest = Manifest::for_package(def, version);
    runtime
        .write(&package_dir.join(MANIFEST_FILE), manifest.render()?.as_bytes())
        .context("writing manifest")?;

    runtime
        .write(
            &package_dir.join(LOADER_FILE),
            LoaderStub::default().render()?.as_bytes(),
        )
        .context("writing loader stub")?;

    runtime
        .write(&package_dir.join("README.md"), render_readme(def).as_bytes())
        .context("writing README")?;

    let license = root.join("LICENSE");
    if runtime.exists(&license) {
        runtime
            .copy(&license, &package_dir.join("LICENSE"))
            .context("copying LICENSE")?;
    } else {
        debug!("No LICENSE at {}, skipping", license.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use tempfile::tempdir;

    fn ci_tree_with(targets: &[&str]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for (i, target) in targets.iter().enumerate() {
            let target_dir = dir.path().join(CI_BINARIES_DIR).join(target);
            std::fs::create_dir_all(&target_dir).unwrap();
            let name = if target.contains("windows") { "ansilust.exe" } else { "ansilust" };
            std::fs::write(target_dir.join(name), format!("binary-{}", i)).unwrap();
        }
        dir
    }

    fn opts(dir: &tempfile::TempDir) -> AssembleOptions {
        AssembleOptions {
            root: dir.path().to_path_buf(),
            version_override: Some("1.0.0".to_string()),
        }
    }

    #[test]
    fn test_ci_mode_skips_missing_targets_without_failing() {
        // Nine of ten targets built; i386 missing.
        let targets: Vec<&str> = PACKAGES
            .iter()
            .map(|d| d.build_target)
            .filter(|t| *t != "i386-linux-musl")
            .collect();
        let dir = ci_tree_with(&targets);

        let summary = assemble(&RealRuntime, &opts(&dir)).unwrap();
        assert_eq!(summary.written, 9);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert!(summary.ok());

        assert!(!dir.path().join(PACKAGES_DIR).join("ansilust-linux-i386-musl").exists());
        let built = dir.path().join(PACKAGES_DIR).join("ansilust-linux-x64-gnu");
        assert!(built.join("bin/ansilust").exists());
        assert!(built.join(MANIFEST_FILE).exists());
        assert!(built.join(LOADER_FILE).exists());
        assert!(built.join("README.md").exists());
    }

    #[test]
    fn test_binary_is_exact_copy_and_executable() {
        let dir = ci_tree_with(&["x86_64-linux-gnu"]);
        assemble(&RealRuntime, &opts(&dir)).unwrap();

        let dest = dir
            .path()
            .join(PACKAGES_DIR)
            .join("ansilust-linux-x64-gnu/bin/ansilust");
        assert_eq!(std::fs::read(&dest).unwrap(), b"binary-0");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_windows_package_gets_exe_name() {
        let dir = ci_tree_with(&["x86_64-windows"]);
        let summary = assemble(&RealRuntime, &opts(&dir)).unwrap();
        assert_eq!(summary.written, 1);
        assert!(
            dir.path()
                .join(PACKAGES_DIR)
                .join("ansilust-win32-x64/bin/ansilust.exe")
                .exists()
        );
    }

    #[test]
    fn test_reassembly_is_byte_identical() {
        let dir = ci_tree_with(&["x86_64-linux-gnu", "aarch64-linux-musl"]);
        let options = opts(&dir);

        assemble(&RealRuntime, &options).unwrap();
        let pkg = dir.path().join(PACKAGES_DIR).join("ansilust-linux-aarch64-musl");
        let manifest_a = std::fs::read(pkg.join(MANIFEST_FILE)).unwrap();
        let stub_a = std::fs::read(pkg.join(LOADER_FILE)).unwrap();
        let readme_a = std::fs::read(pkg.join("README.md")).unwrap();

        assemble(&RealRuntime, &options).unwrap();
        assert_eq!(std::fs::read(pkg.join(MANIFEST_FILE)).unwrap(), manifest_a);
        assert_eq!(std::fs::read(pkg.join(LOADER_FILE)).unwrap(), stub_a);
        assert_eq!(std::fs::read(pkg.join("README.md")).unwrap(), readme_a);
    }

    #[test]
    fn test_license_copied_when_present() {
        let dir = ci_tree_with(&["x86_64-macos"]);
        std::fs::write(dir.path().join("LICENSE"), "MIT\n").unwrap();

        assemble(&RealRuntime, &opts(&dir)).unwrap();
        let license = dir.path().join(PACKAGES_DIR).join("ansilust-darwin-x64/LICENSE");
        assert_eq!(std::fs::read_to_string(license).unwrap(), "MIT\n");
    }

    #[test]
    fn test_local_mode_attempts_every_target_against_one_binary() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join(LOCAL_BINARY);
        std::fs::create_dir_all(bin.parent().unwrap()).unwrap();
        std::fs::write(&bin, "host build").unwrap();

        // All ten entries reuse the single local path; none are filtered
        // to the host's own target.
        let summary = assemble(&RealRuntime, &opts(&dir)).unwrap();
        assert_eq!(summary.written, 10);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_one_write_failure_does_not_abort_the_rest() {
        let root = PathBuf::from("/work");
        let mut runtime = MockRuntime::new();

        runtime
            .expect_is_dir()
            .returning(|p| p.ends_with(CI_BINARIES_DIR));
        runtime.expect_is_file().returning(|_| true);
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime.expect_set_permissions().returning(|_, _| Ok(()));
        runtime.expect_write().returning(|_, _| Ok(()));
        runtime.expect_exists().returning(|_| false); // no LICENSE
        runtime.expect_copy().returning(|_, to| {
            if to.to_string_lossy().contains("ansilust-linux-arm-musl") {
                Err(anyhow::anyhow!("permission denied"))
            } else {
                Ok(42)
            }
        });

        let summary = assemble(
            &runtime,
            &AssembleOptions {
                root,
                version_override: Some("1.0.0".to_string()),
            },
        )
        .unwrap();

        assert_eq!(summary.written, 9);
        assert_eq!(summary.failed, 1);
        assert!(!summary.ok());
    }
}
