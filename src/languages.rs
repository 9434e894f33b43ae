//! Supported language list.
//!
//! The list is a JSON object mapping language codes to display labels, read
//! once per registry and immutable afterwards. Its order is the order in
//! which catalogues are created and keys are registered.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::{LexisError, Result};

/// Ordered language code → display label mapping.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LanguageList {
    entries: IndexMap<String, String>,
}

impl LanguageList {
    /// Parse a JSON language document.
    ///
    /// ```
    /// use lexis::LanguageList;
    ///
    /// let list = LanguageList::from_json(r#"{"fa": "فارسی", "en-US": "English"}"#).unwrap();
    /// assert_eq!(list.codes().collect::<Vec<_>>(), ["fa", "en-US"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the parser error when `text` is not an object of strings.
    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and parse the language document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::Languages`] when the file is unreadable or is
    /// not an object of strings.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|error| LexisError::Languages {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Self::from_json(&text).map_err(|error| LexisError::Languages {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
    }

    /// Language codes in list order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// (code, label) pairs in list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, label)| (code.as_str(), label.as_str()))
    }

    /// Display label for `code`.
    #[must_use]
    pub fn label(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Whether `code` is supported.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Number of languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LanguageList
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(code, label)| (code.into(), label.into()))
                .collect(),
        }
    }
}

/// Lazily loaded, process-lifetime language list.
#[derive(Debug)]
pub struct LanguageRegistry {
    path: Option<Utf8PathBuf>,
    list: OnceCell<LanguageList>,
}

impl LanguageRegistry {
    /// Registry reading `path` on first use.
    #[must_use]
    pub fn from_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            list: OnceCell::new(),
        }
    }

    /// Registry serving a fixed list.
    #[must_use]
    pub const fn fixed(list: LanguageList) -> Self {
        Self {
            path: None,
            list: OnceCell::with_value(list),
        }
    }

    /// The supported languages, loading them on first call.
    ///
    /// A failed load is not remembered, so a later call retries.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::Languages`] when the document cannot be loaded.
    pub fn languages(&self) -> Result<&LanguageList> {
        self.list.get_or_try_init(|| {
            self.path
                .as_deref()
                .map_or_else(|| Ok(LanguageList::default()), LanguageList::load)
        })
    }
}
