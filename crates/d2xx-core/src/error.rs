//! Error types for native library resolution and loading

use thiserror::Error;

/// Boxed error produced by a dynamic loader backend
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving or loading the native library
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No platform entry matches the host OS/architecture
    #[error("Failed to find matching platform for {os}:{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// More than one platform entry matches the host OS/architecture
    #[error("Ambiguous platform for {os}:{arch} (candidates: {candidates})")]
    AmbiguousPlatform {
        os: String,
        arch: String,
        candidates: String,
    },

    /// The bundled library resource does not exist
    #[error("Native library resource not found: {0}")]
    ResourceNotFound(String),

    /// Filesystem or resource stream failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The extracted library could not be loaded
    #[error("Failed to load native library {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: BoxError,
    },

    /// The host loader could not find the library by name
    #[error("Failed to load native library {name} from the system search path: {source}")]
    FallbackLoad {
        name: String,
        #[source]
        source: BoxError,
    },

    /// An exported symbol could not be resolved
    #[error("Symbol {name} not found: {source}")]
    Symbol {
        name: String,
        #[source]
        source: libloading::Error,
    },

    /// Invalid configuration option
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl LoaderError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        LoaderError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error is recovered by the system search path fallback
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoaderError::ResourceNotFound(_) | LoaderError::Io { .. }
        )
    }
}

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;
