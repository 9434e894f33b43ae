//! Error types for the lexis CLI.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The library rejected the request.
    #[error(transparent)]
    Lexis(#[from] lexis::LexisError),

    /// A `-p` argument was not `name=value`.
    #[error("invalid parameter `{raw}`; expected name=value")]
    InvalidParameter {
        /// Argument as given.
        raw: String,
    },

    /// No catalogue exists for the requested category and language.
    #[error("no `{category}` catalogue for `{language}` at {path}")]
    MissingCatalogue {
        /// Requested category.
        category: String,
        /// Requested language.
        language: String,
        /// Where the catalogue was expected.
        path: Utf8PathBuf,
    },

    /// The lookup table has no entry for the requested language.
    #[error("no entry for `{language}` in {table}")]
    MissingTableEntry {
        /// Table document that was read.
        table: Utf8PathBuf,
        /// Requested language.
        language: String,
    },

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
