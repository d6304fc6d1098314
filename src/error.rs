//! Loader error types.
//!
//! Symbol resolution failures are never errors: they are reported as absent
//! addresses and failure counts. These errors cover setup only.

use thiserror::Error;

/// Errors raised while setting up a resolver or parsing version selectors.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("Unknown OpenGL version: {0}")]
    UnknownVersion(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("GL library unavailable: {name}: {reason}")]
    LibraryUnavailable { name: String, reason: String },

    #[error("Platform symbol unavailable: {0}")]
    SymbolUnavailable(String),
}

impl LoaderError {
    /// Returns true if the error comes from the platform GL stack rather
    /// than from caller input.
    pub fn is_platform(&self) -> bool {
        matches!(
            self,
            Self::LibraryUnavailable { .. } | Self::SymbolUnavailable(_)
        )
    }
}
