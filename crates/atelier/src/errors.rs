//! Error types for Atelier.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Errors returned from main are rendered through Debug, while thiserror
                    // writes the message through Display. Redirect so both read the same.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// A problem with a single content file, recorded while loading the store.
///
/// Loading never aborts on these; the offending file is skipped and the error
/// kept so `atelier check` can report it.
#[derive(Error)]
pub enum ContentError {
    #[error("Failed to read content file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid frontmatter in content file: {path}")]
    InvalidFrontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to scan content directory: {pattern}")]
    ScanFailed {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ContentError {
    /// The file the error points at, when it concerns a single file.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ContentError::ReadFailed { path, .. } => Some(path),
            ContentError::InvalidFrontmatter { path, .. } => Some(path),
            ContentError::ScanFailed { .. } => None,
        }
    }
}

#[derive(Error, PartialEq, Eq)]
#[error("Unknown locale: {locale}")]
pub struct UnknownLocale {
    pub locale: String,
}

#[derive(Error)]
pub enum MailError {
    #[error("Failed to dispatch contact message")]
    Dispatch {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl_debug_for_error!(ContentError, UnknownLocale, MailError);
