//! Error types for catalogue resolution, storage, and configuration.
//!
//! Only [`LexisError::Configuration`] ever leaves
//! [`Translator::translate`](crate::Translator::translate). Storage failures
//! are reported as [`CatalogueError`] values so callers can log them and carry
//! on with the best string they have.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the public API.
#[derive(Debug, Error)]
pub enum LexisError {
    /// No catalogue source could be resolved for the category.
    #[error("unable to locate a catalogue source for category `{category}`")]
    Configuration {
        /// Category that could not be resolved.
        category: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    ConfigFile {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The supported language list could not be loaded.
    #[error("language list at {path} is unusable: {reason}")]
    Languages {
        /// Path to the language list document.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A per-language lookup table could not be loaded.
    #[error("lookup table at {path} is unusable: {reason}")]
    Table {
        /// Path to the table document.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A catalogue operation failed.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

/// Failures raised by the catalogue file store.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Reading, creating, or writing a catalogue failed.
    #[error("catalogue I/O failed for {path}")]
    Io {
        /// Catalogue file or directory involved.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalogue file does not hold a message mapping.
    #[error("catalogue {path} does not parse: {reason}")]
    Parse {
        /// Catalogue file that failed to parse.
        path: Utf8PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The catalogue could not be serialised.
    #[error("catalogue {path} could not be encoded: {reason}")]
    Encode {
        /// Catalogue file being written.
        path: Utf8PathBuf,
        /// Serialiser message.
        reason: String,
    },
}

impl CatalogueError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`LexisError`].
pub type Result<T> = std::result::Result<T, LexisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_the_category() {
        let err = LexisError::Configuration {
            category: "billing/invoices".to_owned(),
        };
        assert!(err.to_string().contains("billing/invoices"));
    }

    #[test]
    fn io_error_preserves_source() {
        let err = CatalogueError::io("/tmp/x.json", std::io::Error::other("disk full"));
        assert!(err.to_string().contains("/tmp/x.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn catalogue_errors_convert_transparently() {
        let err = LexisError::from(CatalogueError::Parse {
            path: Utf8PathBuf::from("fa/app.json"),
            reason: "expected value".to_owned(),
        });
        let msg = err.to_string();
        assert!(msg.contains("fa/app.json"));
        assert!(msg.contains("expected value"));
    }
}
