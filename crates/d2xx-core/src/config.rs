//! Loader configuration

use crate::error::{LoaderError, Result};
use crate::platform::HostEnvironment;
use crate::resource::SearchPath;
use std::path::PathBuf;

/// Base name of the FTDI interface library
pub const FTDI_LIBRARY_NAME: &str = "libFTDIInterface";

/// Prefix under which native libraries are bundled
pub const NATIVE_LIBRARY_PATH_PREFIX: &str = "native";

/// Configuration for [`NativeLibraryLoader`](crate::loader::NativeLibraryLoader)
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base library name, without extension
    pub library_name: String,
    /// Resource prefix (first path segment)
    pub resource_prefix: String,
    /// Directories searched for bundled resources (empty: defaults)
    pub resource_dirs: Vec<PathBuf>,
    /// OS name override (default: detected on every resolution)
    pub os_name: Option<String>,
    /// Architecture override (default: detected on every resolution)
    pub os_arch: Option<String>,
    /// Directory for extracted libraries (default: system temp dir)
    pub temp_dir: Option<PathBuf>,
    /// Fall back to the system library search path when extraction fails
    pub fallback: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            library_name: FTDI_LIBRARY_NAME.to_string(),
            resource_prefix: NATIVE_LIBRARY_PATH_PREFIX.to_string(),
            resource_dirs: Vec::new(),
            os_name: None,
            os_arch: None,
            temp_dir: None,
            fallback: true,
        }
    }
}

impl LoaderConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base library name
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    /// Set the resource prefix
    pub fn with_resource_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_prefix = prefix.into();
        self
    }

    /// Add a resource directory to the search path
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dirs.push(dir.into());
        self
    }

    /// Pin the host environment instead of detecting it
    pub fn with_host(mut self, host: HostEnvironment) -> Self {
        self.os_name = Some(host.os_name);
        self.os_arch = Some(host.os_arch);
        self
    }

    /// Set the directory for extracted libraries
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Enable or disable the system search path fallback
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Host environment, with overrides applied over a fresh detection
    pub fn host(&self) -> HostEnvironment {
        let detected = HostEnvironment::detect();
        HostEnvironment {
            os_name: self.os_name.clone().unwrap_or(detected.os_name),
            os_arch: self.os_arch.clone().unwrap_or(detected.os_arch),
        }
    }

    /// Resource search path built from `resource_dirs`
    pub fn search_path(&self) -> SearchPath {
        if self.resource_dirs.is_empty() {
            SearchPath::new(SearchPath::default_dirs())
        } else {
            SearchPath::new(self.resource_dirs.clone())
        }
    }
}

/// Parse loader options from (key, value) pairs
///
/// Supported keys:
///
/// - `name=<base>` - library base name (default: libFTDIInterface)
/// - `prefix=<dir>` - resource prefix (default: native)
/// - `dir=<path>` - resource directory, may be given several times
/// - `os=<name>` / `arch=<arch>` - override the detected host
/// - `tmpdir=<path>` - extraction directory
/// - `fallback=<yes|no>` - system search path fallback (default: yes)
pub fn parse_options(options: &[(&str, &str)]) -> Result<LoaderConfig> {
    let mut config = LoaderConfig::default();

    for (key, value) in options {
        match *key {
            "name" => {
                if value.is_empty() {
                    return Err(LoaderError::InvalidOption(
                        "Library name must not be empty".to_string(),
                    ));
                }
                config.library_name = value.to_string();
            }
            "prefix" => config.resource_prefix = value.trim_matches('/').to_string(),
            "dir" => config.resource_dirs.push(PathBuf::from(value)),
            "os" => config.os_name = Some(value.to_string()),
            "arch" => config.os_arch = Some(value.to_string()),
            "tmpdir" => config.temp_dir = Some(PathBuf::from(value)),
            "fallback" => config.fallback = parse_bool(value)?,
            _ => {
                log::warn!("d2xx: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "on" | "1" => Ok(true),
        "no" | "false" | "off" | "0" => Ok(false),
        _ => Err(LoaderError::InvalidOption(format!(
            "Invalid fallback value: {} (expected yes or no)",
            value
        ))),
    }
}

/// Split an option string of the form `key=value,key=value`
pub fn split_options(s: &str) -> Result<Vec<(&str, &str)>> {
    s.split(',')
        .filter(|opt| !opt.is_empty())
        .map(|opt| {
            opt.split_once('=').ok_or_else(|| {
                LoaderError::InvalidOption(format!(
                    "Invalid parameter format: '{}' (expected key=value)",
                    opt
                ))
            })
        })
        .collect()
}
