//! d2xx-core - FTDI D2XX native library support
//!
//! This crate locates, extracts and loads the native FTDI interface library
//! (`libFTDIInterface`) that ships bundled with an application, one build
//! per supported platform.
//!
//! # Resource Layout
//!
//! ```text
//! native/
//!   osx_x86_64/libFTDIInterface.jnilib
//!   windows_x86/libFTDIInterface.dll
//!   linux_x86_64/libFTDIInterface.so
//!   linux_ia64/libFTDIInterface.so
//!   linux_i386/libFTDIInterface.so
//! ```
//!
//! # Example
//!
//! ```no_run
//! // Load once for the whole process; later calls return the same handle
//! let library = d2xx_core::load_library()?;
//! println!("loaded from {:?}", library.source());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Custom resource locations and host overrides go through [`LoaderConfig`]:
//!
//! ```no_run
//! use d2xx_core::{LoaderConfig, NativeLibraryLoader, SystemLoader};
//!
//! let config = LoaderConfig::new()
//!     .with_resource_dir("/opt/myapp/lib")
//!     .with_fallback(false);
//! let loader = NativeLibraryLoader::new(config);
//! println!("{}", loader.resolve_library_path("libFTDIInterface")?);
//! let library = loader.load_library(&SystemLoader)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Fallback
//!
//! When the bundled resource is missing or cannot be extracted, the loader
//! logs a warning and asks the host loader for `libFTDIInterface.<ext>` on
//! the system library search path (`LD_LIBRARY_PATH`, `PATH`, ...).
//! Unsupported platforms are reported as errors and never fall back.

pub mod config;
pub mod error;
pub mod ft4222;
pub mod loader;
pub mod platform;
pub mod resource;

// Re-exports
pub use config::{parse_options, LoaderConfig, FTDI_LIBRARY_NAME};
pub use error::{LoaderError, Result};
pub use ft4222::ClockRate;
pub use loader::{
    is_loaded, load_library, load_library_with, DynamicLoader, LoadSource, NativeLibrary,
    NativeLibraryLoader, SystemLoader,
};
pub use platform::{Arch, HostEnvironment, Platform};
