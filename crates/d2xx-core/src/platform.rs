//! Host platform detection
//!
//! The bundled native libraries are built per (OS family, CPU architecture)
//! pair. This module maps the strings reported by the host onto one of a
//! fixed set of [`Platform`] identifiers.
//!
//! # Matching rules
//!
//! - The OS name is lower-cased and matched by substring against each
//!   entry's OS token (`"Mac OS X"` matches `"os x"`).
//! - The architecture is matched exactly, ignoring case, against the
//!   entry's [`Arch`] token.
//!
//! Every entry of the table is tried. Exactly one entry must match: no match
//! is [`LoaderError::UnsupportedPlatform`], several matches are
//! [`LoaderError::AmbiguousPlatform`]. Table order never decides the result.

use crate::error::{LoaderError, Result};
use std::fmt;

/// CPU architecture tag as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 32-bit x86 (alternate spelling)
    X86_32,
    /// 64-bit x86
    X86_64,
    /// 32-bit x86
    X86,
    /// 64-bit x86 as reported by some Linux hosts
    Amd64,
    /// 32-bit x86 as reported by some Unix hosts
    I386,
    /// Itanium
    Ia64,
}

impl Arch {
    /// All architecture tags
    pub const ALL: [Arch; 6] = [
        Arch::X86_32,
        Arch::X86_64,
        Arch::X86,
        Arch::Amd64,
        Arch::I386,
        Arch::Ia64,
    ];

    /// The raw architecture string this tag matches
    pub fn token(self) -> &'static str {
        match self {
            Arch::X86_32 => "x86_32",
            Arch::X86_64 => "x86_64",
            Arch::X86 => "x86",
            Arch::Amd64 => "amd64",
            Arch::I386 => "i386",
            Arch::Ia64 => "ia64",
        }
    }

    /// Check a host-reported architecture string against this tag
    pub fn matches(self, arch: &str) -> bool {
        arch.eq_ignore_ascii_case(self.token())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.token())
    }
}

/// Platform identifier selecting a prebuilt native library variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS on x86_64
    OsxX86_64,
    /// Windows on 32-bit x86
    WindowsX86,
    /// Linux on x86_64
    LinuxX86_64,
    /// Linux on Itanium
    LinuxIa64,
    /// Linux on 32-bit x86
    LinuxI386,
}

/// Built-in platform table
pub const PLATFORMS: [Platform; 5] = [
    Platform::OsxX86_64,
    Platform::WindowsX86,
    Platform::LinuxX86_64,
    Platform::LinuxIa64,
    Platform::LinuxI386,
];

impl Platform {
    /// Canonical identifier, e.g. `LINUX_X86_64`
    pub fn name(self) -> &'static str {
        match self {
            Platform::OsxX86_64 => "OSX_X86_64",
            Platform::WindowsX86 => "WINDOWS_X86",
            Platform::LinuxX86_64 => "LINUX_X86_64",
            Platform::LinuxIa64 => "LINUX_IA64",
            Platform::LinuxI386 => "LINUX_I386",
        }
    }

    /// Resource subdirectory for this platform (lower-cased identifier)
    pub fn dir_name(self) -> String {
        self.name().to_lowercase()
    }

    /// Lower-case OS token matched by substring against the OS name
    pub fn os_token(self) -> &'static str {
        match self {
            Platform::OsxX86_64 => "os x",
            Platform::WindowsX86 => "win",
            Platform::LinuxX86_64 | Platform::LinuxIa64 | Platform::LinuxI386 => "linux",
        }
    }

    /// Architecture tag matched exactly against the host architecture
    pub fn arch(self) -> Arch {
        match self {
            Platform::OsxX86_64 | Platform::LinuxX86_64 => Arch::X86_64,
            Platform::WindowsX86 | Platform::LinuxI386 => Arch::X86,
            Platform::LinuxIa64 => Arch::Ia64,
        }
    }

    /// Native library file extension (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            Platform::OsxX86_64 => "jnilib",
            Platform::WindowsX86 => "dll",
            _ => "so",
        }
    }

    /// Check whether this entry matches the given host environment
    pub fn matches(self, host: &HostEnvironment) -> bool {
        host.os_name.to_lowercase().contains(self.os_token())
            && self.arch().matches(&host.os_arch.to_lowercase())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Library file extension for a platform identifier
pub fn to_ext(platform: Platform) -> &'static str {
    platform.extension()
}

/// OS name and CPU architecture as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    /// OS name, e.g. "Linux", "Mac OS X", "Windows 10"
    pub os_name: String,
    /// CPU architecture, e.g. "x86_64"
    pub os_arch: String,
}

impl HostEnvironment {
    /// Create an environment from explicit strings
    pub fn new(os_name: impl Into<String>, os_arch: impl Into<String>) -> Self {
        Self {
            os_name: os_name.into(),
            os_arch: os_arch.into(),
        }
    }

    /// Read the environment of the running process
    pub fn detect() -> Self {
        let os_name = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Mac OS X",
            "windows" => "Windows",
            other => other,
        };
        Self::new(os_name, std::env::consts::ARCH)
    }
}

/// Resolve the platform of `host` against the built-in table
pub fn os_arch(host: &HostEnvironment) -> Result<Platform> {
    resolve_in(&PLATFORMS, host)
}

/// Resolve the platform of `host` against an arbitrary table
pub fn resolve_in(table: &[Platform], host: &HostEnvironment) -> Result<Platform> {
    let os = host.os_name.to_lowercase();
    let arch = host.os_arch.to_lowercase();

    let matches: Vec<Platform> = table.iter().copied().filter(|p| p.matches(host)).collect();

    match matches.as_slice() {
        [] => Err(LoaderError::UnsupportedPlatform { os, arch }),
        [platform] => {
            log::debug!("Resolved platform {} for {}:{}", platform, os, arch);
            Ok(*platform)
        }
        many => Err(LoaderError::AmbiguousPlatform {
            os,
            arch,
            candidates: join_names(many),
        }),
    }
}

/// Check that no host environment can match two entries of `table`
///
/// Two entries overlap when they share an architecture tag and one OS token
/// contains the other (any OS name containing the longer token also
/// contains the shorter one).
pub fn validate_table(table: &[Platform]) -> Result<()> {
    for (i, a) in table.iter().enumerate() {
        for b in &table[i + 1..] {
            let os_overlap = a.os_token().contains(b.os_token())
                || b.os_token().contains(a.os_token());
            if os_overlap && a.arch() == b.arch() {
                let longer = if a.os_token().len() >= b.os_token().len() {
                    a.os_token()
                } else {
                    b.os_token()
                };
                return Err(LoaderError::AmbiguousPlatform {
                    os: format!("*{}*", longer),
                    arch: a.arch().token().to_string(),
                    candidates: join_names(&[*a, *b]),
                });
            }
        }
    }
    Ok(())
}

fn join_names(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(os: &str, arch: &str) -> Result<Platform> {
        os_arch(&HostEnvironment::new(os, arch))
    }

    #[test]
    fn test_supported_pairs() {
        assert_eq!(resolve("linux", "x86_64").unwrap(), Platform::LinuxX86_64);
        assert_eq!(resolve("os x", "x86_64").unwrap(), Platform::OsxX86_64);
        assert_eq!(resolve("win", "x86").unwrap(), Platform::WindowsX86);
        assert_eq!(resolve("linux", "ia64").unwrap(), Platform::LinuxIa64);
        assert_eq!(resolve("linux", "x86").unwrap(), Platform::LinuxI386);
    }

    #[test]
    fn test_host_style_names() {
        assert_eq!(resolve("Mac OS X", "X86_64").unwrap(), Platform::OsxX86_64);
        assert_eq!(resolve("Windows 10", "x86").unwrap(), Platform::WindowsX86);
        assert_eq!(resolve("Linux", "x86_64").unwrap(), Platform::LinuxX86_64);
    }

    #[test]
    fn test_unsupported_pairs() {
        for (os, arch) in [
            ("freebsd", "x86_64"),
            ("linux", "aarch64"),
            ("windows", "x86_64"),
            ("linux", "amd64"),
            ("mac os x", "aarch64"),
        ] {
            match resolve(os, arch) {
                Err(LoaderError::UnsupportedPlatform { os: o, arch: a }) => {
                    assert_eq!(o, os);
                    assert_eq!(a, arch);
                }
                other => panic!("{}:{} resolved to {:?}", os, arch, other),
            }
        }
    }

    #[test]
    fn test_arch_is_exact_match() {
        // "x86" must not match an "x86_64" host by prefix
        assert_eq!(resolve("linux", "x86_64").unwrap(), Platform::LinuxX86_64);
        assert!(resolve("linux", "x86_6").is_err());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(to_ext(Platform::OsxX86_64), "jnilib");
        assert_eq!(to_ext(Platform::WindowsX86), "dll");
        for p in [Platform::LinuxX86_64, Platform::LinuxIa64, Platform::LinuxI386] {
            assert_eq!(to_ext(p), "so");
        }
    }

    #[test]
    fn test_dir_names() {
        assert_eq!(Platform::LinuxX86_64.dir_name(), "linux_x86_64");
        assert_eq!(Platform::OsxX86_64.dir_name(), "osx_x86_64");
        assert_eq!(Platform::WindowsX86.dir_name(), "windows_x86");
    }

    #[test]
    fn test_builtin_table_is_disjoint() {
        validate_table(&PLATFORMS).unwrap();
    }

    #[test]
    fn test_overlapping_table_rejected() {
        let table = [Platform::LinuxX86_64, Platform::LinuxX86_64];
        assert!(matches!(
            validate_table(&table),
            Err(LoaderError::AmbiguousPlatform { .. })
        ));

        let host = HostEnvironment::new("linux", "x86_64");
        match resolve_in(&table, &host) {
            Err(LoaderError::AmbiguousPlatform { candidates, .. }) => {
                assert_eq!(candidates, "LINUX_X86_64, LINUX_X86_64");
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_ignores_table_order() {
        let host = HostEnvironment::new("Linux", "x86");
        let mut table = PLATFORMS;
        table.reverse();
        assert_eq!(resolve_in(&table, &host).unwrap(), os_arch(&host).unwrap());
    }

    #[test]
    fn test_arch_tokens() {
        let tokens: Vec<&str> = Arch::ALL.iter().map(|a| a.token()).collect();
        assert_eq!(tokens, ["x86_32", "x86_64", "x86", "amd64", "i386", "ia64"]);
        assert!(Arch::Amd64.matches("AMD64"));
    }
}
