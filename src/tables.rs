//! Per-language lookup tables.
//!
//! Layout and date conventions ship as JSON documents keyed by language
//! code. Each [`LookupTable`] reads its own document at most once; two tables
//! never share their loaded contents.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::LexisConfig;
use crate::error::{LexisError, Result};

/// A JSON document mapping language codes to arbitrary values.
#[derive(Debug)]
pub struct LookupTable {
    path: Utf8PathBuf,
    entries: OnceCell<IndexMap<String, Value>>,
}

impl LookupTable {
    /// Table backed by the document at `path`, read on first lookup.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceCell::new(),
        }
    }

    /// Layout table named by the configuration.
    #[must_use]
    pub fn layouts(config: &LexisConfig) -> Self {
        Self::new(config.system_root.join(&config.layouts_file))
    }

    /// Date table named by the configuration.
    #[must_use]
    pub fn dates(config: &LexisConfig) -> Self {
        Self::new(config.system_root.join(&config.dates_file))
    }

    /// Document path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Value stored for `language`, or `None` when the table has no entry.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::Table`] when the document cannot be read or is
    /// not a JSON object. A failed read is retried on the next call.
    pub fn for_language(&self, language: &str) -> Result<Option<&Value>> {
        Ok(self.entries()?.get(language))
    }

    /// Language codes present in the table, in document order.
    ///
    /// # Errors
    ///
    /// See [`LookupTable::for_language`].
    pub fn languages(&self) -> Result<impl Iterator<Item = &str>> {
        Ok(self.entries()?.keys().map(String::as_str))
    }

    fn entries(&self) -> Result<&IndexMap<String, Value>> {
        self.entries.get_or_try_init(|| {
            let text = fs::read_to_string(&self.path).map_err(|error| self.failure(&error))?;
            serde_json::from_str(&text).map_err(|error| self.failure(&error))
        })
    }

    fn failure(&self, error: &dyn std::error::Error) -> LexisError {
        LexisError::Table {
            path: self.path.clone(),
            reason: error.to_string(),
        }
    }
}
