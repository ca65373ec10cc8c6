//! On-disk package format: the manifest and the loader stub.
//!
//! These two files are the contract between assembler output and launcher
//! input. Both are JSON; both are rendered deterministically so repeated
//! assembly runs against unchanged inputs produce byte-identical files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::registry::PackageDef;
use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";
pub const LOADER_FILE: &str = "loader.json";
pub const BIN_DIR: &str = "bin";

const REPOSITORY_URL: &str = "https://github.com/effect-native/ansilust.git";
const AUTHOR: &str = "Tom Aylott <oblivious@subtlegradient.com>";
const KEYWORDS: [&str; 7] = ["ansi", "art", "text-art", "ascii", "bbs", "ansilove", "ansilust"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Repository {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// A platform package's manifest. The `os`/`cpu`/`libc` arrays are install
/// constraints consumed by the host package manager; each holds exactly the
/// matching platform-key component.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub main: String,
    pub files: Vec<String>,
    pub repository: Repository,
    pub keywords: Vec<String>,
    pub author: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libc: Option<Vec<String>>,
}

impl Manifest {
    /// Build the manifest for a registry entry at a given release version.
    pub fn for_package(def: &PackageDef, version: &str) -> Self {
        Manifest {
            name: def.package_name.to_string(),
            version: version.to_string(),
            description: format!("ansilust binaries for {}", def.platform_key),
            main: LOADER_FILE.to_string(),
            files: vec![
                format!("{}/", BIN_DIR),
                LOADER_FILE.to_string(),
                "README.md".to_string(),
                "LICENSE".to_string(),
            ],
            repository: Repository {
                kind: "git".to_string(),
                url: REPOSITORY_URL.to_string(),
            },
            keywords: KEYWORDS.iter().map(|k| k.to_string()).collect(),
            author: AUTHOR.to_string(),
            license: "MIT".to_string(),
            os: Some(vec![def.os.to_string()]),
            cpu: Some(vec![def.cpu.to_string()]),
            libc: def.libc.map(|l| vec![l.to_string()]),
        }
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        Ok(manifest)
    }

    /// Pretty JSON with a trailing newline; field order follows the struct,
    /// so output is stable across runs.
    pub fn render(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// The loader stub. It records where the binary lives and both of its
/// possible names; the absolute path is computed when the package is
/// loaded, so the `.exe` choice is made by the install-time host, not the
/// build-time host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoaderStub {
    #[serde(rename = "binDir")]
    pub bin_dir: String,
    pub bin: String,
    #[serde(rename = "winBin")]
    pub win_bin: String,
}

impl Default for LoaderStub {
    fn default() -> Self {
        LoaderStub {
            bin_dir: BIN_DIR.to_string(),
            bin: "ansilust".to_string(),
            win_bin: "ansilust.exe".to_string(),
        }
    }
}

impl LoaderStub {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read loader stub {}", path.display()))?;
        let stub = serde_json::from_str(&content)
            .with_context(|| format!("Invalid loader stub {}", path.display()))?;
        Ok(stub)
    }

    pub fn render(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Absolute path of the bundled binary for a host OS.
    pub fn bin_path(&self, package_dir: &Path, host_os: &str) -> PathBuf {
        let name = if host_os == "win32" { &self.win_bin } else { &self.bin };
        package_dir.join(&self.bin_dir).join(name)
    }
}

/// Generated per-package README body.
pub fn render_readme(def: &PackageDef) -> String {
    format!(
        "# {name}\n\
         \n\
         Platform-specific binary for ansilust.\n\
         \n\
         This package contains the native ansilust binary for {key}.\n\
         \n\
         This is a private package meant to be installed as an optional\n\
         dependency of the main `ansilust` package; the launcher locates it\n\
         by name and runs `{bin_dir}/{bin}` from it.\n\
         \n\
         See the main ansilust package for CLI usage.\n\
         \n\
         ## License\n\
         \n\
         MIT\n",
        name = def.package_name,
        key = def.platform_key,
        bin_dir = BIN_DIR,
        bin = def.bin_name(),
    )
}
