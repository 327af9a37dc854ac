//! Native library extraction and loading
//!
//! Loading the FTDI interface library is a linear pipeline:
//!
//! 1. Resolve the host [`Platform`] (fails hard on unsupported hosts)
//! 2. Open the bundled resource `native/<platform>/<name>.<ext>`
//! 3. Copy it into a fresh temporary file
//! 4. Load that file with the [`DynamicLoader`]
//!
//! If steps 2 or 3 fail the loader logs a warning and asks the host loader
//! to find `<name>.<ext>` on the system library search path instead. A
//! failure of that fallback is returned as [`LoaderError::FallbackLoad`]
//! carrying the host loader's error unchanged.
//!
//! [`load_library`] wraps this in a process-wide, load-once handle.

use crate::config::LoaderConfig;
use crate::error::{BoxError, LoaderError, Result};
use crate::platform::{self, Platform};
use crate::resource::{copy, ResourceProvider};

use once_cell::sync::OnceCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Loads shared libraries into the running process
pub trait DynamicLoader {
    /// Handle to a loaded library
    type Library;

    /// Load a library from an absolute file path
    fn load_path(&self, path: &Path) -> std::result::Result<Self::Library, BoxError>;

    /// Load a library by file name through the host search path
    fn load_by_name(&self, name: &str) -> std::result::Result<Self::Library, BoxError>;
}

/// [`DynamicLoader`] backed by `dlopen`/`LoadLibrary` via libloading
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoader;

impl DynamicLoader for SystemLoader {
    type Library = libloading::Library;

    fn load_path(&self, path: &Path) -> std::result::Result<Self::Library, BoxError> {
        // SAFETY: the library's initialisers run here; the FTDI interface
        // library has no initialisers with preconditions on the caller.
        unsafe { libloading::Library::new(path) }.map_err(BoxError::from)
    }

    fn load_by_name(&self, name: &str) -> std::result::Result<Self::Library, BoxError> {
        // SAFETY: as above
        unsafe { libloading::Library::new(name) }.map_err(BoxError::from)
    }
}

/// Where a loaded library came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Extracted from a bundled resource to this path
    Extracted(PathBuf),
    /// Found by the host loader under this file name
    SystemSearch(String),
}

/// A bundled library copied to a temporary file
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct ExtractedLibrary {
    platform: Platform,
    path: TempPath,
}

impl ExtractedLibrary {
    /// Platform the library was selected for
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Absolute path of the extracted file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk and return its path
    pub fn keep(self) -> Result<PathBuf> {
        self.path
            .keep()
            .map_err(|e| LoaderError::io("Failed to keep extracted library", e.error))
    }
}

/// A library loaded into the process
pub struct NativeLibrary<L> {
    // Declared before `extracted` so the library is unloaded before its file
    // is removed.
    library: L,
    source: LoadSource,
    extracted: Option<ExtractedLibrary>,
}

impl<L> NativeLibrary<L> {
    /// The loaded library handle
    pub fn library(&self) -> &L {
        &self.library
    }

    /// Where the library was loaded from
    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    /// Whether the system search path fallback was used
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, LoadSource::SystemSearch(_))
    }

    /// Extracted file still owned by this handle, if any
    pub fn extracted_path(&self) -> Option<&Path> {
        self.extracted.as_ref().map(ExtractedLibrary::path)
    }
}

impl NativeLibrary<libloading::Library> {
    /// Check whether the library exports `name`
    pub fn has_symbol(&self, name: &str) -> bool {
        // SAFETY: the symbol is only checked for presence, never dereferenced
        unsafe { self.library.get::<*const ()>(name.as_bytes()).is_ok() }
    }

    /// Look up an exported symbol
    ///
    /// # Safety
    ///
    /// `T` must match the actual type of the symbol.
    pub unsafe fn get<T>(&self, name: &[u8]) -> Result<libloading::Symbol<'_, T>> {
        self.library.get(name).map_err(|source| LoaderError::Symbol {
            name: String::from_utf8_lossy(name).into_owned(),
            source,
        })
    }
}

impl<L> std::fmt::Debug for NativeLibrary<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("source", &self.source)
            .field("extracted", &self.extracted)
            .finish_non_exhaustive()
    }
}

/// File name of `library` on `platform`, e.g. `libFoo.so`
pub fn native_library_name(library: &str, platform: Platform) -> String {
    format!("{}.{}", library, platform.extension())
}

/// Resource path of `library` on `platform`, e.g. `native/linux_x86_64/libFoo.so`
pub fn library_resource_path(prefix: &str, library: &str, platform: Platform) -> String {
    format!(
        "{}/{}/{}",
        prefix,
        platform.dir_name(),
        native_library_name(library, platform)
    )
}

/// Resolves, extracts and loads the bundled native library
pub struct NativeLibraryLoader<'a> {
    config: LoaderConfig,
    resources: Box<dyn ResourceProvider + 'a>,
}

impl<'a> NativeLibraryLoader<'a> {
    /// Create a loader reading resources from the configured directories
    pub fn new(config: LoaderConfig) -> Self {
        let resources = Box::new(config.search_path());
        Self::with_resources(config, resources)
    }

    /// Create a loader reading resources from `resources`
    pub fn with_resources(config: LoaderConfig, resources: Box<dyn ResourceProvider + 'a>) -> Self {
        Self { config, resources }
    }

    /// Loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Resolve the host platform, reading the environment afresh
    pub fn os_arch(&self) -> Result<Platform> {
        platform::os_arch(&self.config.host())
    }

    /// Platform-specific file name of `library`
    pub fn resolve_native_library_name(&self, library: &str) -> Result<String> {
        Ok(native_library_name(library, self.os_arch()?))
    }

    /// Bundled resource path of `library`
    pub fn resolve_library_path(&self, library: &str) -> Result<String> {
        Ok(library_resource_path(
            &self.config.resource_prefix,
            library,
            self.os_arch()?,
        ))
    }

    /// Copy the bundled `library` to a new temporary file
    pub fn extract_library(&self, library: &str) -> Result<ExtractedLibrary> {
        let platform = self.os_arch()?;
        let resource = library_resource_path(&self.config.resource_prefix, library, platform);

        let mut stream = self
            .resources
            .open(&resource)
            .map_err(|e| LoaderError::io(format!("Failed to open resource {}", resource), e))?
            .ok_or_else(|| LoaderError::ResourceNotFound(resource.clone()))?;

        let prefix = format!("{}-", library);
        let suffix = format!(".{}", platform.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix);
        let created = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file =
            created.map_err(|e| LoaderError::io("Failed to create temporary file", e))?;

        // On error `file` is dropped here, removing the partial copy
        let written = copy(&mut stream, &mut file)
            .and_then(|n| file.flush().map(|_| n))
            .map_err(|e| {
                LoaderError::io(
                    format!("Failed to extract {} to {}", resource, file.path().display()),
                    e,
                )
            })?;

        let path = file.into_temp_path();
        log::debug!(
            "Extracted {} ({} bytes) to {}",
            resource,
            written,
            path.display()
        );

        Ok(ExtractedLibrary { platform, path })
    }

    /// Load the configured library, falling back to the system search path
    pub fn load_library<D>(&self, loader: &D) -> Result<NativeLibrary<D::Library>>
    where
        D: DynamicLoader + ?Sized,
    {
        let name = &self.config.library_name;

        match self.extract_library(name) {
            Ok(extracted) => {
                let path = extracted.path().to_path_buf();
                let library = loader.load_path(&path).map_err(|source| LoaderError::Load {
                    path: path.display().to_string(),
                    source,
                })?;
                log::debug!("Successfully loaded library {}", name);

                Ok(NativeLibrary {
                    library,
                    source: LoadSource::Extracted(path),
                    extracted: release_extracted(extracted),
                })
            }
            Err(e) if e.is_recoverable() && self.config.fallback => {
                log::warn!(
                    "Could not find library {} as resource ({}), \
                     trying fallback lookup through the system library search path",
                    name,
                    e
                );
                let file_name = self.resolve_native_library_name(name)?;
                let library = loader
                    .load_by_name(&file_name)
                    .map_err(|source| LoaderError::FallbackLoad {
                        name: file_name.clone(),
                        source,
                    })?;
                log::debug!("Successfully loaded library {} from system search path", file_name);

                Ok(NativeLibrary {
                    library,
                    source: LoadSource::SystemSearch(file_name),
                    extracted: None,
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Unix keeps a loaded image mapped after unlink, so the file can go now.
/// Elsewhere the file must outlive the loaded library.
#[cfg(unix)]
fn release_extracted(extracted: ExtractedLibrary) -> Option<ExtractedLibrary> {
    let path = extracted.path().display().to_string();
    if let Err(e) = extracted.path.close() {
        log::debug!("Failed to remove extracted library {}: {}", path, e);
    }
    None
}

#[cfg(not(unix))]
fn release_extracted(extracted: ExtractedLibrary) -> Option<ExtractedLibrary> {
    Some(extracted)
}

static FTDI_LIBRARY: OnceCell<NativeLibrary<libloading::Library>> = OnceCell::new();

/// Load the FTDI interface library into the process with default settings
///
/// Only the first successful call loads anything; later calls return the
/// same handle.
pub fn load_library() -> Result<&'static NativeLibrary<libloading::Library>> {
    load_library_with(&LoaderConfig::default())
}

/// Load the FTDI interface library into the process with `config`
///
/// `config` is ignored once the library has been loaded.
pub fn load_library_with(
    config: &LoaderConfig,
) -> Result<&'static NativeLibrary<libloading::Library>> {
    load_once(&FTDI_LIBRARY, || {
        NativeLibraryLoader::new(config.clone()).load_library(&SystemLoader)
    })
}

/// Return the library held by `cell`, running `init` only if it is empty
fn load_once<L, F>(cell: &OnceCell<NativeLibrary<L>>, init: F) -> Result<&NativeLibrary<L>>
where
    F: FnOnce() -> Result<NativeLibrary<L>>,
{
    if let Some(library) = cell.get() {
        log::debug!("Native library already loaded from {:?}", library.source());
        return Ok(library);
    }
    cell.get_or_try_init(init)
}

/// Whether [`load_library`] has completed successfully
pub fn is_loaded() -> bool {
    FTDI_LIBRARY.get().is_some()
}
