use std::fmt;

use super::libc::{LibcFamily, LibcProbe};

/// Canonical platform identifier: `{os}-{cpu}` or `{os}-{cpu}-{libc}`.
///
/// The libc segment is present if and only if the OS is `linux`.
/// Unrecognized OS or CPU names pass through unmodified; an unknown
/// platform still produces a key, and it is the package lookup that
/// reports it as unsupported, not resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformKey {
    pub os: String,
    pub cpu: String,
    pub libc: Option<String>,
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.libc {
            Some(libc) => write!(f, "{}-{}-{}", self.os, self.cpu, libc),
            None => write!(f, "{}-{}", self.os, self.cpu),
        }
    }
}

/// Resolve an OS/CPU pair (node-style spellings) to a [`PlatformKey`].
///
/// The prober is only consulted for `linux`; anything it reports other
/// than musl, including failure, falls back to `gnu`.
pub fn resolve(os: &str, cpu: &str, prober: &dyn LibcProbe) -> PlatformKey {
    let cpu = match cpu {
        "x64" => "x64".to_string(),
        "ia32" => "i386".to_string(),
        "arm" => "arm".to_string(),
        // Darwin packages spell 64-bit ARM "arm64", Linux packages "aarch64".
        "arm64" => {
            if os == "darwin" {
                "arm64".to_string()
            } else {
                "aarch64".to_string()
            }
        }
        other => other.to_string(),
    };

    let libc = if os == "linux" {
        Some(match prober.family() {
            LibcFamily::Musl => "musl".to_string(),
            LibcFamily::Gnu | LibcFamily::Unknown => "gnu".to_string(),
        })
    } else {
        None
    };

    PlatformKey {
        os: os.to_string(),
        cpu,
        libc,
    }
}

/// The running host's OS, in the spelling package names use.
pub fn host_os() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "darwin"
    }
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "windows")]
    {
        "win32"
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::consts::OS
    }
}

/// The running host's CPU architecture, in node-style spelling.
pub fn host_cpu() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        "x64"
    }
    #[cfg(target_arch = "aarch64")]
    {
        "arm64"
    }
    #[cfg(target_arch = "x86")]
    {
        "ia32"
    }
    #[cfg(target_arch = "arm")]
    {
        "arm"
    }
    #[cfg(not(any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "x86",
        target_arch = "arm"
    )))]
    {
        std::env::consts::ARCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(LibcFamily);

    impl LibcProbe for FixedProbe {
        fn family(&self) -> LibcFamily {
            self.0
        }
    }

    #[test]
    fn test_arm64_spelling_is_os_dependent() {
        let probe = FixedProbe(LibcFamily::Gnu);

        let darwin = resolve("darwin", "arm64", &probe);
        assert_eq!(darwin.to_string(), "darwin-arm64");

        let linux = resolve("linux", "arm64", &probe);
        assert_eq!(linux.to_string(), "linux-aarch64-gnu");

        let win = resolve("win32", "arm64", &probe);
        assert_eq!(win.to_string(), "win32-aarch64");
    }

    #[test]
    fn test_cpu_rename_table() {
        let probe = FixedProbe(LibcFamily::Musl);
        assert_eq!(resolve("linux", "x64", &probe).cpu, "x64");
        assert_eq!(resolve("linux", "ia32", &probe).cpu, "i386");
        assert_eq!(resolve("linux", "arm", &probe).cpu, "arm");
    }

    #[test]
    fn test_non_linux_never_has_libc_segment() {
        // Even a probe insisting on musl must not leak into non-Linux keys.
        let probe = FixedProbe(LibcFamily::Musl);
        assert_eq!(resolve("darwin", "x64", &probe).libc, None);
        assert_eq!(resolve("win32", "x64", &probe).libc, None);
        assert_eq!(resolve("darwin", "x64", &probe).to_string(), "darwin-x64");
    }

    #[test]
    fn test_linux_libc_normalization() {
        assert_eq!(
            resolve("linux", "x64", &FixedProbe(LibcFamily::Musl)).to_string(),
            "linux-x64-musl"
        );
        assert_eq!(
            resolve("linux", "x64", &FixedProbe(LibcFamily::Gnu)).to_string(),
            "linux-x64-gnu"
        );
        // Probe failure is not a resolution failure.
        assert_eq!(
            resolve("linux", "x64", &FixedProbe(LibcFamily::Unknown)).to_string(),
            "linux-x64-gnu"
        );
    }

    #[test]
    fn test_unknown_values_pass_through() {
        let probe = FixedProbe(LibcFamily::Unknown);
        let key = resolve("sunos", "sparc64", &probe);
        assert_eq!(key.to_string(), "sunos-sparc64");
        assert_eq!(key.libc, None);
    }

    #[test]
    fn test_host_identity_is_nonempty() {
        assert!(!host_os().is_empty());
        assert!(!host_cpu().is_empty());

        #[cfg(target_os = "linux")]
        assert_eq!(host_os(), "linux");

        #[cfg(target_os = "macos")]
        assert_eq!(host_os(), "darwin");

        #[cfg(target_arch = "x86_64")]
        assert_eq!(host_cpu(), "x64");
    }
}
