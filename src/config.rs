//! Configuration loader for catalogue roots and sources.
//!
//! Settings live in `lexis.toml`. Every key is optional: omitted values fall
//! back to the layout the self-healing protocol expects (`translates/` and
//! `modules/` below the system root, a JSON language list under
//! `lib/i18n/`). Category sources are kept in file order because wildcard
//! patterns are matched in the order they are declared.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{LexisError, Result};
use crate::selection::normalise_language;
use crate::source::SourceConfig;

/// Default language messages are written in.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en-US";

/// Category pattern registered unless configuration claims it.
pub const APP_CATEGORY: &str = "app";

/// Workspace configuration for catalogue resolution.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LexisConfig {
    /// Root every relative path resolves against.
    pub system_root: Utf8PathBuf,
    /// Directory (below the root) whose subdirectories are modules.
    pub modules_dir: String,
    /// Directory name holding catalogues, globally and inside modules.
    pub translates_dir: String,
    /// Catalogue file extension.
    pub extension: String,
    /// JSON document mapping language codes to display labels.
    pub languages_file: Utf8PathBuf,
    /// JSON layout table keyed by language.
    pub layouts_file: Utf8PathBuf,
    /// JSON date table keyed by language.
    pub dates_file: Utf8PathBuf,
    /// Language messages are written in unless a source says otherwise.
    pub source_language: String,
    /// Preferred target language.
    ///
    /// Whitespace-only values are treated as absent, so templated files such
    /// as `language = ""` fall back cleanly.
    pub language: Option<String>,
    /// Create catalogues for categories no source claims.
    pub auto_create: bool,
    /// Category pattern → source, in declaration order.
    pub sources: IndexMap<String, SourceConfig>,
}

impl Default for LexisConfig {
    fn default() -> Self {
        Self {
            system_root: Utf8PathBuf::from("."),
            modules_dir: String::from("modules"),
            translates_dir: String::from("translates"),
            extension: String::from("json"),
            languages_file: Utf8PathBuf::from("lib/i18n/languages.json"),
            layouts_file: Utf8PathBuf::from("lib/i18n/layouts.json"),
            dates_file: Utf8PathBuf::from("lib/i18n/date.json"),
            source_language: String::from(DEFAULT_SOURCE_LANGUAGE),
            language: None,
            auto_create: true,
            sources: IndexMap::new(),
        }
    }
}

impl LexisConfig {
    /// Configuration rooted at `system_root` with every other value defaulted.
    #[must_use]
    pub fn rooted_at(system_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            system_root: system_root.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::ConfigFile`] naming `origin` when the text does
    /// not parse or contains unknown keys.
    pub fn from_toml(text: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(text).map_err(|error| LexisError::ConfigFile {
            path: origin.to_path_buf(),
            reason: error.to_string(),
        })
    }

    /// Read and parse `path`.
    ///
    /// A relative `system_root` is taken relative to the directory holding
    /// the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::ConfigFile`] when the file is unreadable or
    /// invalid.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|error| LexisError::ConfigFile {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let mut config = Self::from_toml(&text, path)?;
        let relative = config.system_root.is_relative();
        if let Some(parent) = path.parent().filter(|_| relative) {
            config.system_root = parent.join(&config.system_root);
        }
        Ok(config)
    }

    /// Configured target language, if a non-blank value is present.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        normalise_language(self.language.as_deref())
    }

    /// Sources with the default `app` catalogue added when unclaimed.
    ///
    /// The default reads files from `messages/` below the system root in the
    /// configured source language. Declaring either `app` or `app*` disables
    /// it.
    #[must_use]
    pub fn sources_with_defaults(&self) -> IndexMap<String, SourceConfig> {
        let mut sources = self.sources.clone();
        let wildcard = format!("{APP_CATEGORY}*");
        if !sources.contains_key(APP_CATEGORY) && !sources.contains_key(&wildcard) {
            sources.insert(
                APP_CATEGORY.to_owned(),
                SourceConfig::file(&self.source_language, "messages"),
            );
        }
        sources
    }
}
