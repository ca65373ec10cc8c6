//! The supported-platform matrix.
//!
//! A single compile-time table shared by the launcher (to validate the
//! resolved key and compute the package name) and the assembler (to
//! iterate targets and name output directories). A platform absent from
//! this table is unsupported, full stop; nothing ever guesses.

/// One supported target: the cross-compiler triple it is built as, the
/// package it ships in, and the install constraints the package declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageDef {
    /// Build-time triple, also the per-target subdirectory in the CI
    /// binaries layout (e.g. `arm-linux-gnueabihf`).
    pub build_target: &'static str,
    /// Published package name, always `ansilust-{platform_key}`.
    pub package_name: &'static str,
    /// Canonical runtime platform key (e.g. `linux-arm-gnu`).
    pub platform_key: &'static str,
    pub os: &'static str,
    pub cpu: &'static str,
    pub libc: Option<&'static str>,
}

impl PackageDef {
    /// Name of the executable inside the package's `bin/` directory.
    pub fn bin_name(&self) -> &'static str {
        if self.os == "win32" {
            "ansilust.exe"
        } else {
            "ansilust"
        }
    }
}

/// Every platform this system ships for, in assembly order.
pub const PACKAGES: [PackageDef; 10] = [
    PackageDef {
        build_target: "x86_64-macos",
        package_name: "ansilust-darwin-x64",
        platform_key: "darwin-x64",
        os: "darwin",
        cpu: "x64",
        libc: None,
    },
    PackageDef {
        build_target: "aarch64-macos",
        package_name: "ansilust-darwin-arm64",
        platform_key: "darwin-arm64",
        os: "darwin",
        cpu: "arm64",
        libc: None,
    },
    PackageDef {
        build_target: "x86_64-linux-gnu",
        package_name: "ansilust-linux-x64-gnu",
        platform_key: "linux-x64-gnu",
        os: "linux",
        cpu: "x64",
        libc: Some("gnu"),
    },
    PackageDef {
        build_target: "x86_64-linux-musl",
        package_name: "ansilust-linux-x64-musl",
        platform_key: "linux-x64-musl",
        os: "linux",
        cpu: "x64",
        libc: Some("musl"),
    },
    PackageDef {
        build_target: "aarch64-linux-gnu",
        package_name: "ansilust-linux-aarch64-gnu",
        platform_key: "linux-aarch64-gnu",
        os: "linux",
        cpu: "aarch64",
        libc: Some("gnu"),
    },
    PackageDef {
        build_target: "aarch64-linux-musl",
        package_name: "ansilust-linux-aarch64-musl",
        platform_key: "linux-aarch64-musl",
        os: "linux",
        cpu: "aarch64",
        libc: Some("musl"),
    },
    PackageDef {
        build_target: "arm-linux-gnueabihf",
        package_name: "ansilust-linux-arm-gnu",
        platform_key: "linux-arm-gnu",
        os: "linux",
        cpu: "arm",
        libc: Some("gnu"),
    },
    PackageDef {
        build_target: "arm-linux-musleabihf",
        package_name: "ansilust-linux-arm-musl",
        platform_key: "linux-arm-musl",
        os: "linux",
        cpu: "arm",
        libc: Some("musl"),
    },
    PackageDef {
        build_target: "i386-linux-musl",
        package_name: "ansilust-linux-i386-musl",
        platform_key: "linux-i386-musl",
        os: "linux",
        cpu: "i386",
        libc: Some("musl"),
    },
    PackageDef {
        build_target: "x86_64-windows",
        package_name: "ansilust-win32-x64",
        platform_key: "win32-x64",
        os: "win32",
        cpu: "x64",
        libc: None,
    },
];

/// Look up the registry entry for a platform key, if it is supported.
pub fn find_by_key(key: &str) -> Option<&'static PackageDef> {
    PACKAGES.iter().find(|p| p.platform_key == key)
}

/// All supported platform keys, in registry order.
pub fn supported_keys() -> impl Iterator<Item = &'static str> {
    PACKAGES.iter().map(|p| p.platform_key)
}

/// The package name for a platform key string.
pub fn package_name_for_key(key: &str) -> String {
    format!("ansilust-{}", key)
}
