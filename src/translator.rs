//! The translate/format pipeline.
//!
//! [`Translator::translate`] resolves the category's source, looks the
//! message up, registers it everywhere on a miss, and formats whichever
//! string it ended up with. Nothing but an unresolvable category is
//! reported to the caller; storage and formatting problems are logged and
//! the best available string is returned.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::catalogue::CatalogueFileStore;
use crate::config::{DEFAULT_SOURCE_LANGUAGE, LexisConfig};
use crate::error::Result;
use crate::format::{IcuFormatter, MessageFormatter, Params};
use crate::languages::LanguageRegistry;
use crate::paths::CataloguePaths;
use crate::registrar::{KeyRegistrar, RegistrationReport};
use crate::resolver::CategoryResolver;
use crate::selection::{LanguageSelection, resolve_language_from_env};

const TARGET: &str = "lexis::translator";

/// `{name,` introduces an argument the formatter must interpret.
static FORMATTER_ARGUMENT: Lazy<Regex> = Lazy::new(|| compile(r"\{\s*[\w.]+\s*,"));

/// `{name}` placeholders for plain substitution.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| compile(r"\{([^{}]*)\}"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|error| panic!("invalid pattern `{pattern}`: {error}"))
}

/// Translates messages, healing missing catalogues and keys as it goes.
pub struct Translator {
    resolver: CategoryResolver,
    registrar: KeyRegistrar,
    languages: Arc<LanguageRegistry>,
    formatter: Box<dyn MessageFormatter>,
    preferred_language: Option<String>,
    source_language: String,
}

impl fmt::Debug for Translator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Translator")
            .field("resolver", &self.resolver)
            .field("preferred_language", &self.preferred_language)
            .field("source_language", &self.source_language)
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Translator over `resolver`, registering missing keys for every
    /// language in `languages`.
    #[must_use]
    pub fn new(resolver: CategoryResolver, languages: Arc<LanguageRegistry>) -> Self {
        let registrar = KeyRegistrar::new(Arc::clone(resolver.store()), Arc::clone(&languages));
        Self {
            resolver,
            registrar,
            languages,
            formatter: Box::new(IcuFormatter),
            preferred_language: None,
            source_language: DEFAULT_SOURCE_LANGUAGE.to_owned(),
        }
    }

    /// Translator wired from configuration: store, language list, sources
    /// (with the default `app` source), auto-creation, and languages.
    #[must_use]
    pub fn from_config(config: &LexisConfig) -> Self {
        let paths = CataloguePaths::from_config(config);
        let languages = Arc::new(LanguageRegistry::from_file(
            paths.resolve_file(&config.languages_file),
        ));
        let store = Arc::new(CatalogueFileStore::new(paths));
        let resolver = CategoryResolver::new(store, Arc::clone(&languages), config.sources_with_defaults())
            .with_auto_create(config.auto_create);

        let mut translator = Self::new(resolver, languages);
        translator.preferred_language = config.language().map(str::to_owned);
        translator.source_language.clone_from(&config.source_language);
        translator
    }

    /// Replace the formatter used for `{name, type, …}` templates.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Category resolver.
    #[must_use]
    pub const fn resolver(&self) -> &CategoryResolver {
        &self.resolver
    }

    /// Catalogue store shared by the resolver and the registrar.
    #[must_use]
    pub const fn store(&self) -> &Arc<CatalogueFileStore> {
        self.resolver.store()
    }

    /// Supported languages.
    #[must_use]
    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    /// Add `message` to `category`'s catalogue in every supported language.
    #[must_use]
    pub fn register(&self, category: &str, message: &str) -> RegistrationReport {
        self.registrar.register(category, message)
    }

    /// Translate `message` of `category` into `language` and format it.
    ///
    /// A message missing from the catalogue is registered for every
    /// supported language and returned untranslated, formatted with the
    /// source's language rules. Sources synthesised for catalogue files
    /// found on disk, or auto-created ones, format with `language` instead.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::Configuration`](crate::LexisError::Configuration)
    /// when no source can be resolved for `category`.
    pub fn translate(
        &self,
        category: &str,
        message: &str,
        params: &Params,
        language: &str,
    ) -> Result<String> {
        let source = self.resolver.resolve(category, language)?;

        if let Some(translation) = source.lookup(category, message, language) {
            return Ok(self.format(&translation, params, language));
        }

        let report = self.registrar.register(category, message);
        let added: Vec<&str> = report.added().collect();
        if !added.is_empty() {
            debug!(
                target: TARGET,
                "registered missing `{message}` in `{category}` for {}",
                added.join(", "),
            );
        }
        Ok(self.format(message, params, source.miss_language(language)))
    }

    /// [`Translator::translate`] into the default target language.
    ///
    /// # Errors
    ///
    /// See [`Translator::translate`].
    pub fn translate_default(
        &self,
        category: &str,
        message: &str,
        params: &Params,
    ) -> Result<String> {
        let selection = self.default_language();
        self.translate(category, message, params, selection.language())
    }

    /// The default target language and where it came from.
    #[must_use]
    pub fn default_language(&self) -> LanguageSelection {
        resolve_language_from_env(
            None,
            self.preferred_language.as_deref(),
            self.languages.languages().ok(),
            &self.source_language,
        )
    }

    /// Format `message` with `params` for `language`.
    ///
    /// Templates with typed arguments go to the formatter; if it rejects
    /// them the message is returned unchanged. Other templates get a single
    /// pass of `{name}` substitution.
    #[must_use]
    pub fn format(&self, message: &str, params: &Params, language: &str) -> String {
        if params.is_empty() {
            return message.to_owned();
        }

        if FORMATTER_ARGUMENT.is_match(message) {
            return self
                .formatter
                .format(message, params, language)
                .unwrap_or_else(|error| {
                    warn!(
                        target: TARGET,
                        "formatting failed for `{language}`: {error}; returning raw message `{message}`",
                    );
                    message.to_owned()
                });
        }

        substitute(message, params)
    }
}

fn substitute(message: &str, params: &Params) -> String {
    PLACEHOLDER
        .replace_all(message, |captures: &Captures<'_>| {
            let whole = captures.get(0).map_or("", |found| found.as_str());
            captures
                .get(1)
                .and_then(|name| params.get(name.as_str()))
                .map_or_else(|| whole.to_owned(), ToString::to_string)
        })
        .into_owned()
}
