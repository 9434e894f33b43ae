//! Catalogue sources and the configuration they are built from.
//!
//! A [`SourceConfig`] is the declarative form stored in the category table;
//! [`CatalogueSource::from_config`] turns it into the live object that
//! answers lookups. The backend is chosen by the `kind` discriminator rather
//! than by naming a type at runtime.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;

use crate::catalogue::CatalogueFileStore;

const TARGET: &str = "lexis::source";

/// Declarative catalogue source keyed by a category pattern.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Language the messages are written in.
    pub source_language: String,
    /// Translate even when the requested language is the source language.
    #[serde(default)]
    pub force_translation: bool,
    /// Where the translations live.
    #[serde(flatten)]
    pub backend: SourceBackend,
}

/// Storage backing a catalogue source.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceBackend {
    /// Catalogue files below `base_path` (relative paths resolve against the
    /// system root).
    File {
        /// Directory holding one subdirectory per language.
        base_path: Utf8PathBuf,
    },
    /// Translations declared directly in configuration, keyed by language.
    Inline {
        /// language → (message → translation).
        #[serde(default)]
        messages: IndexMap<String, IndexMap<String, String>>,
    },
}

impl SourceConfig {
    /// File-backed source.
    #[must_use]
    pub fn file(source_language: &str, base_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source_language: source_language.to_owned(),
            force_translation: false,
            backend: SourceBackend::File {
                base_path: base_path.into(),
            },
        }
    }

    /// Inline source with no messages yet.
    #[must_use]
    pub fn inline(source_language: &str) -> Self {
        Self {
            source_language: source_language.to_owned(),
            force_translation: false,
            backend: SourceBackend::Inline {
                messages: IndexMap::new(),
            },
        }
    }

    /// Add an inline translation; ignored for file-backed sources.
    #[must_use]
    pub fn with_message(mut self, language: &str, message: &str, translation: &str) -> Self {
        if let SourceBackend::Inline { messages } = &mut self.backend {
            messages
                .entry(language.to_owned())
                .or_default()
                .insert(message.to_owned(), translation.to_owned());
        }
        self
    }

    /// Mark the source as forced.
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force_translation = true;
        self
    }
}

/// Live source answering lookups for the categories mapped to it.
#[derive(Debug)]
pub struct CatalogueSource {
    source_language: String,
    force_translation: bool,
    follows_request: bool,
    backend: LiveBackend,
}

#[derive(Debug)]
enum LiveBackend {
    File {
        base: Utf8PathBuf,
        store: Arc<CatalogueFileStore>,
    },
    Inline {
        messages: IndexMap<String, IndexMap<String, String>>,
    },
}

impl CatalogueSource {
    /// Instantiate the source described by `config`.
    ///
    /// File bases are resolved against the store's system root once, here.
    #[must_use]
    pub fn from_config(config: &SourceConfig, store: &Arc<CatalogueFileStore>) -> Self {
        let backend = match &config.backend {
            SourceBackend::File { base_path } => LiveBackend::File {
                base: store.paths().resolve_base(base_path),
                store: Arc::clone(store),
            },
            SourceBackend::Inline { messages } => LiveBackend::Inline {
                messages: messages.clone(),
            },
        };

        Self {
            source_language: config.source_language.clone(),
            force_translation: config.force_translation,
            follows_request: false,
            backend,
        }
    }

    /// Forced file source reading catalogues directly below `base`.
    ///
    /// Unlike configured sources, `base` is taken as given and is not
    /// resolved against the system root again. Untranslated messages from a
    /// forced file source are written in whatever language was requested,
    /// so [`CatalogueSource::miss_language`] follows the request.
    #[must_use]
    pub fn forced_file(
        source_language: &str,
        base: Utf8PathBuf,
        store: &Arc<CatalogueFileStore>,
    ) -> Self {
        Self {
            source_language: source_language.to_owned(),
            force_translation: true,
            follows_request: true,
            backend: LiveBackend::File {
                base,
                store: Arc::clone(store),
            },
        }
    }

    /// Language messages are written in.
    #[must_use]
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Language whose rules format an untranslated message requested in
    /// `requested`.
    #[must_use]
    pub fn miss_language<'a>(&'a self, requested: &'a str) -> &'a str {
        if self.follows_request {
            requested
        } else {
            &self.source_language
        }
    }

    /// Whether lookups run even for the source language.
    #[must_use]
    pub const fn force_translation(&self) -> bool {
        self.force_translation
    }

    /// Base directory for file-backed sources.
    #[must_use]
    pub fn base_path(&self) -> Option<&Utf8Path> {
        match &self.backend {
            LiveBackend::File { base, .. } => Some(base),
            LiveBackend::Inline { .. } => None,
        }
    }

    /// Stored translation of `message`, or `None` when there is none.
    ///
    /// An empty stored translation is returned as `Some("")`. Unforced
    /// sources report `None` for their own source language. Unreadable
    /// catalogues are logged and reported as `None`.
    #[must_use]
    pub fn lookup(&self, category: &str, message: &str, language: &str) -> Option<String> {
        if !self.force_translation && language == self.source_language {
            return None;
        }

        match &self.backend {
            LiveBackend::File { base, store } => store
                .load(language, category, base)
                .unwrap_or_else(|error| {
                    warn!(
                        target: TARGET,
                        "treating `{message}` as untranslated for `{category}` in `{language}`: {error}",
                    );
                    None
                })
                .and_then(|found| found.get(message).map(str::to_owned)),
            LiveBackend::Inline { messages } => messages
                .get(language)
                .and_then(|catalogue| catalogue.get(message))
                .cloned(),
        }
    }
}
