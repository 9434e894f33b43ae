//! Registration of missing message keys.
//!
//! A lookup miss registers the message, mapped to itself, in the category's
//! catalogue for every supported language so translators find it waiting to
//! be filled in. Each language is an independent ensure/load/persist cycle;
//! nothing spans files, and a failure for one language never stops the
//! others.

use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use log::{debug, warn};

use crate::catalogue::{CatalogueFileStore, EnsureOutcome};
use crate::error::{CatalogueError, LexisError};
use crate::languages::LanguageRegistry;

const TARGET: &str = "lexis::registrar";

/// What registration did for one language.
#[derive(Debug)]
pub enum KeyOutcome {
    /// The message was already a key.
    Present,
    /// The message was added and the catalogue rewritten.
    Added,
    /// No catalogue file exists, even after trying to create one.
    Missing,
    /// The catalogue could not be read; nothing was written.
    Skipped(CatalogueError),
    /// The updated catalogue could not be written.
    Failed(CatalogueError),
}

/// Per-language record of one registration.
#[derive(Debug)]
pub struct LanguageOutcome {
    /// Language code.
    pub language: String,
    /// Whether the placeholder catalogue had to be created, or why that
    /// failed.
    pub ensured: Result<EnsureOutcome, CatalogueError>,
    /// What happened to the key.
    pub key: KeyOutcome,
}

/// Structured result of [`KeyRegistrar::register`].
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Language list failure, when no language could be processed.
    pub languages_error: Option<LexisError>,
    /// One entry per supported language, in list order.
    pub outcomes: Vec<LanguageOutcome>,
}

impl RegistrationReport {
    /// Languages whose catalogue gained the key.
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.key, KeyOutcome::Added))
            .map(|outcome| outcome.language.as_str())
    }

    /// Whether every language ended with the key present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.languages_error.is_none()
            && self
                .outcomes
                .iter()
                .all(|outcome| matches!(outcome.key, KeyOutcome::Present | KeyOutcome::Added))
    }
}

impl fmt::Display for KeyOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => formatter.write_str("already present"),
            Self::Added => formatter.write_str("added"),
            Self::Missing => formatter.write_str("no catalogue file"),
            Self::Skipped(error) => write!(formatter, "skipped: {error}"),
            Self::Failed(error) => write!(formatter, "failed: {error}"),
        }
    }
}

/// Adds missing keys to every language's catalogue for a category.
///
/// Catalogues are always located through the system-root layout (module
/// directory when one exists, else the global tree), independent of the
/// source that served the lookup.
#[derive(Debug)]
pub struct KeyRegistrar {
    store: Arc<CatalogueFileStore>,
    languages: Arc<LanguageRegistry>,
}

impl KeyRegistrar {
    /// Registrar writing through `store` for every language in `languages`.
    #[must_use]
    pub const fn new(store: Arc<CatalogueFileStore>, languages: Arc<LanguageRegistry>) -> Self {
        Self { store, languages }
    }

    /// Ensure `message` is a key of `category`'s catalogue in every
    /// supported language.
    ///
    /// Missing keys are added as `message → message` and the whole in-memory
    /// catalogue is written back. The write is not a merge: entries another
    /// process added since this process loaded the file are lost, and come
    /// back the next time they miss.
    #[must_use]
    pub fn register(&self, category: &str, message: &str) -> RegistrationReport {
        let languages = match self.languages.languages() {
            Ok(list) => list,
            Err(error) => {
                warn!(target: TARGET, "cannot register `{message}` for `{category}`: {error}");
                return RegistrationReport {
                    languages_error: Some(error),
                    outcomes: Vec::new(),
                };
            }
        };

        let base = self.store.paths().base_for(category);
        let outcomes = languages
            .codes()
            .map(|language| {
                let ensured = self.store.ensure_file(language, category, &base);
                if let Err(error) = &ensured {
                    warn!(target: TARGET, "could not create `{category}` catalogue for `{language}`: {error}");
                }
                let key = self.register_one(language, category, message, &base);
                LanguageOutcome {
                    language: language.to_owned(),
                    ensured,
                    key,
                }
            })
            .collect();

        RegistrationReport {
            languages_error: None,
            outcomes,
        }
    }

    fn register_one(
        &self,
        language: &str,
        category: &str,
        message: &str,
        base: &Utf8Path,
    ) -> KeyOutcome {
        let catalogue = match self.store.load(language, category, base) {
            Ok(Some(catalogue)) => catalogue,
            Ok(None) => return KeyOutcome::Missing,
            Err(error) => {
                warn!(target: TARGET, "leaving `{category}` catalogue for `{language}` untouched: {error}");
                return KeyOutcome::Skipped(error);
            }
        };

        if catalogue.contains(message) {
            return KeyOutcome::Present;
        }

        let mut updated = (*catalogue).clone();
        updated.insert(message, message);
        match self.store.persist(language, category, base, &updated) {
            Ok(()) => {
                debug!(target: TARGET, "registered `{message}` in `{category}` for `{language}`");
                KeyOutcome::Added
            }
            Err(error) => {
                warn!(target: TARGET, "could not register `{message}` in `{category}` for `{language}`: {error}");
                KeyOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;
    use crate::languages::LanguageList;
    use crate::paths::CataloguePaths;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct RegistrarFixture {
        _dir: TempDir,
        root: Utf8PathBuf,
        store: Arc<CatalogueFileStore>,
        registrar: KeyRegistrar,
    }

    #[fixture]
    fn fixture() -> RegistrarFixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
        let store = Arc::new(CatalogueFileStore::new(CataloguePaths::new(root.clone())));
        let languages = Arc::new(LanguageRegistry::fixed(LanguageList::from_iter([
            ("en", "English"),
            ("fa", "فارسی"),
        ])));
        RegistrarFixture {
            _dir: dir,
            root,
            registrar: KeyRegistrar::new(Arc::clone(&store), languages),
            store,
        }
    }

    fn read(path: &Utf8PathBuf) -> Catalogue {
        crate::catalogue::decode(&fs::read_to_string(path).expect("read")).expect("decode")
    }

    #[rstest]
    fn registers_identity_entries_for_every_language(fixture: RegistrarFixture) {
        let report = fixture.registrar.register("billing", "Invoice");

        assert!(report.is_complete());
        assert_eq!(report.added().collect::<Vec<_>>(), ["en", "fa"]);
        for language in ["en", "fa"] {
            let path = fixture.root.join("translates").join(language).join("billing.json");
            let expected = Catalogue::from_iter([("start", "start"), ("Invoice", "Invoice")]);
            assert_eq!(read(&path), expected);
        }
    }

    #[rstest]
    fn second_registration_changes_nothing(fixture: RegistrarFixture) {
        assert!(fixture.registrar.register("billing", "Invoice").is_complete());
        let path = fixture.root.join("translates").join("fa").join("billing.json");
        let first = fs::read_to_string(&path).expect("read");

        let report = fixture.registrar.register("billing", "Invoice");

        assert!(report.added().next().is_none());
        assert_eq!(fs::read_to_string(&path).expect("read"), first);
    }

    #[rstest]
    fn module_categories_register_inside_the_module(fixture: RegistrarFixture) {
        fs::create_dir_all(fixture.root.join("modules").join("shop")).expect("module");

        assert!(fixture.registrar.register("shop", "Cart").is_complete());

        let path = fixture
            .root
            .join("modules/shop/translates/en/shop.json");
        assert_eq!(read(&path).get("Cart"), Some("Cart"));
    }

    #[rstest]
    fn existing_translations_survive_registration(fixture: RegistrarFixture) {
        let base = fixture.store.paths().global_base();
        fixture
            .store
            .persist("fa", "billing", &base, &Catalogue::from_iter([("Invoice", "فاکتور")]))
            .expect("seed");

        assert!(fixture.registrar.register("billing", "Total").is_complete());

        let path = base.join("fa").join("billing.json");
        let catalogue = read(&path);
        assert_eq!(catalogue.get("Invoice"), Some("فاکتور"));
        assert_eq!(catalogue.get("Total"), Some("Total"));
    }

    #[rstest]
    fn unparseable_catalogues_are_not_overwritten(fixture: RegistrarFixture) {
        let path = fixture.root.join("translates").join("en").join("billing.json");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "{ half edited").expect("seed");

        let report = fixture.registrar.register("billing", "Invoice");

        assert!(!report.is_complete());
        assert_eq!(fs::read_to_string(&path).expect("read"), "{ half edited");
        assert_eq!(report.added().collect::<Vec<_>>(), ["fa"]);
    }

    #[rstest]
    fn missing_language_list_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
        let store = Arc::new(CatalogueFileStore::new(CataloguePaths::new(root.clone())));
        let languages = Arc::new(LanguageRegistry::from_file(root.join("missing.json")));
        let registrar = KeyRegistrar::new(store, languages);

        let report = registrar.register("billing", "Invoice");

        assert!(report.languages_error.is_some());
        assert!(report.outcomes.is_empty());
        assert!(!root.join("translates").exists());
    }
}
