//! Bundled resource lookup
//!
//! Native libraries ship as resources laid out as
//! `native/<platform>/<name>.<ext>`. A [`ResourceProvider`] turns such a
//! logical path into a byte stream, either from directories on disk
//! ([`SearchPath`]) or from data compiled into the binary
//! ([`EmbeddedResources`]).

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Buffer size used by [`copy`]
pub const COPY_BUFFER_SIZE: usize = 16 * 1024;

/// Source of bundled resources
pub trait ResourceProvider {
    /// Open the resource at the `/`-separated logical `path`
    ///
    /// Returns `Ok(None)` if the resource does not exist.
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>>;
}

/// Ordered list of directories searched for resources
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Create a search path from a list of directories
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The directory holding the running executable
    ///
    /// The current directory is never searched unless added explicitly.
    pub fn default_dirs() -> Vec<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .into_iter()
            .collect()
    }

    /// Directories searched, in order
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find the first existing file for a logical resource path
    pub fn locate(&self, path: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| join_resource_path(dir, path))
            .find(|candidate| candidate.is_file())
    }
}

impl ResourceProvider for SearchPath {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        match self.locate(path) {
            Some(file) => {
                log::debug!("Found resource {} at {}", path, file.display());
                Ok(Some(Box::new(File::open(file)?)))
            }
            None => Ok(None),
        }
    }
}

fn join_resource_path(dir: &Path, path: &str) -> PathBuf {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(dir.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Resources compiled into the binary
///
/// ```
/// use d2xx_core::resource::{EmbeddedResources, ResourceProvider};
///
/// static NATIVE: &[(&str, &[u8])] = &[("native/linux_x86_64/libFTDIInterface.so", b"\x7fELF")];
///
/// let resources = EmbeddedResources::new(NATIVE);
/// assert!(resources.open("native/linux_x86_64/libFTDIInterface.so").unwrap().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedResources {
    /// Create a provider from a static `(path, bytes)` table
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }
}

impl ResourceProvider for EmbeddedResources {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(self
            .entries
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, data)| Box::new(*data) as Box<dyn Read>))
    }
}

/// Stream all bytes from `source` into `destination`
///
/// Reads in [`COPY_BUFFER_SIZE`] chunks until end of stream and returns the
/// number of bytes copied. Interrupted reads are retried; any other error is
/// returned as-is.
pub fn copy<R, W>(source: &mut R, destination: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let count = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        destination.write_all(&buf[..count])?;
        total += count as u64;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_copy_small_and_large() {
        for len in [0, 1, 100, COPY_BUFFER_SIZE - 1, COPY_BUFFER_SIZE, 3 * COPY_BUFFER_SIZE + 17] {
            let data = pattern(len);
            let mut out = Vec::new();
            let copied = copy(&mut data.as_slice(), &mut out).unwrap();
            assert_eq!(copied, len as u64);
            assert_eq!(out, data);
        }
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            } else {
                self.served = true;
                buf[0] = 0xAA;
                Ok(1)
            }
        }
    }

    #[test]
    fn test_copy_propagates_read_error() {
        let mut out = Vec::new();
        let err = copy(&mut FailingReader { served: false }, &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(out, [0xAA]);
    }

    #[test]
    fn test_copy_propagates_write_error() {
        let data = pattern(10);
        let mut out = [0u8; 4];
        let err = copy(&mut data.as_slice(), &mut out.as_mut_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_search_path_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for (dir, content) in [(&first, b"one"), (&second, b"two")] {
            let sub = dir.path().join("native").join("linux_x86_64");
            std::fs::create_dir_all(&sub).unwrap();
            std::fs::write(sub.join("libFoo.so"), content).unwrap();
        }

        let search = SearchPath::new(vec![first.path().into(), second.path().into()]);
        let mut stream = search.open("native/linux_x86_64/libFoo.so").unwrap().unwrap();
        let mut content = Vec::new();
        stream.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"one");

        assert!(search.open("native/linux_x86_64/libBar.so").unwrap().is_none());
    }

    #[test]
    fn test_default_dirs_exclude_current_dir() {
        let dirs = SearchPath::default_dirs();
        let exe_dir = std::env::current_exe()
            .unwrap()
            .parent()
            .unwrap()
            .to_path_buf();
        assert_eq!(dirs, [exe_dir.clone()]);

        let cwd = std::env::current_dir().unwrap();
        if cwd != exe_dir {
            assert!(!dirs.contains(&cwd));
        }
    }

    #[test]
    fn test_search_path_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("native/libFoo.so")).unwrap();
        let search = SearchPath::new(vec![dir.path().into()]);
        assert!(search.locate("native/libFoo.so").is_none());
    }

    #[test]
    fn test_embedded_resources() {
        static ENTRIES: &[(&str, &[u8])] = &[("native/windows_x86/libFoo.dll", b"MZ")];
        let resources = EmbeddedResources::new(ENTRIES);

        let mut content = Vec::new();
        resources
            .open("native/windows_x86/libFoo.dll")
            .unwrap()
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"MZ");
        assert!(resources.open("native/windows_x86/libBar.dll").unwrap().is_none());
    }
}
