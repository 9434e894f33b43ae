//! Category → catalogue source resolution.
//!
//! The table maps category patterns to sources. A pattern is an exact
//! category, a prefix ending in `*`, or the universal `*`. Entries start out
//! as [`SourceConfig`]s and are replaced by their live
//! [`CatalogueSource`] the first time they match, so every later lookup for
//! the same category gets the same object back.
//!
//! Resolution runs at most twice. The first pass may auto-create the
//! category's catalogues and register a source for it; the second pass then
//! finds that source or gives up with [`LexisError::Configuration`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use log::{debug, warn};

use crate::catalogue::{CatalogueFileStore, EnsureOutcome};
use crate::error::{CatalogueError, LexisError, Result};
use crate::languages::LanguageRegistry;
use crate::paths::normalise_path;
use crate::source::{CatalogueSource, SourceConfig};

const TARGET: &str = "lexis::resolver";

/// Pattern matching every category.
pub const UNIVERSAL_PATTERN: &str = "*";

const MAX_ATTEMPTS: usize = 2;

/// A table entry: declared but unused, or live.
#[derive(Debug)]
enum SourceSlot {
    Pending(SourceConfig),
    Ready(Arc<CatalogueSource>),
}

/// How a category was matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// An entry keyed by the category itself.
    Exact,
    /// A `prefix*` pattern.
    Prefix,
    /// The `*` pattern.
    Universal,
}

/// What auto-creation did for a category.
#[derive(Debug)]
pub struct AutoCreateReport {
    /// Category whose catalogues were created.
    pub category: String,
    /// Base directory the catalogues were created under.
    pub base: Utf8PathBuf,
    /// Languages whose placeholder file was written by this call.
    pub created: Vec<String>,
    /// Languages whose placeholder file could not be written.
    pub failures: Vec<(String, CatalogueError)>,
    /// Language list failure; only the requested language was attempted.
    pub languages_error: Option<LexisError>,
}

impl AutoCreateReport {
    /// Whether every attempted file exists afterwards.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.languages_error.is_none()
    }
}

/// Resolves categories to live catalogue sources.
#[derive(Debug)]
pub struct CategoryResolver {
    store: Arc<CatalogueFileStore>,
    languages: Arc<LanguageRegistry>,
    auto_create: bool,
    table: Mutex<IndexMap<String, SourceSlot>>,
    live_files: Mutex<HashMap<(String, String), Utf8PathBuf>>,
}

impl CategoryResolver {
    /// Resolver over `sources`, in declaration order, with auto-creation
    /// enabled.
    #[must_use]
    pub fn new(
        store: Arc<CatalogueFileStore>,
        languages: Arc<LanguageRegistry>,
        sources: IndexMap<String, SourceConfig>,
    ) -> Self {
        let table = sources
            .into_iter()
            .map(|(pattern, config)| (pattern, SourceSlot::Pending(config)))
            .collect();
        Self {
            store,
            languages,
            auto_create: true,
            table: Mutex::new(table),
            live_files: Mutex::new(HashMap::new()),
        }
    }

    /// Enable or disable auto-creation for unmatched categories.
    #[must_use]
    pub const fn with_auto_create(mut self, enabled: bool) -> Self {
        self.auto_create = enabled;
        self
    }

    /// Store the resolver's file sources read through.
    #[must_use]
    pub const fn store(&self) -> &Arc<CatalogueFileStore> {
        &self.store
    }

    /// Declare (or replace) the source for `pattern`.
    pub fn add_source(&self, pattern: impl Into<String>, config: SourceConfig) {
        self.lock_table()
            .insert(pattern.into(), SourceSlot::Pending(config));
    }

    /// Patterns currently in the table, in table order.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.lock_table().keys().cloned().collect()
    }

    /// Source serving `category` for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`LexisError::Configuration`] when nothing matches and
    /// auto-creation is disabled or did not produce a usable source.
    pub fn resolve(&self, category: &str, language: &str) -> Result<Arc<CatalogueSource>> {
        for attempt in 0..MAX_ATTEMPTS {
            self.apply_live_file(category, language);

            if let Some((source, kind)) = self.match_table(category) {
                debug!(target: TARGET, "`{category}` resolved by {kind:?} match");
                return Ok(source);
            }

            if attempt > 0 || !self.auto_create {
                break;
            }

            let report = self.create_category(category, language);
            if !report.is_complete() {
                warn!(
                    target: TARGET,
                    "auto-creating `{category}` under {} was incomplete: {} failure(s)",
                    report.base,
                    report.failures.len(),
                );
            }
        }

        Err(LexisError::Configuration {
            category: category.to_owned(),
        })
    }

    /// Create placeholder catalogues for `category` in every supported
    /// language and register a forced file source for it.
    ///
    /// Creation is best-effort: failures are logged and collected in the
    /// report, and the source is registered regardless.
    #[must_use]
    pub fn create_category(&self, category: &str, language: &str) -> AutoCreateReport {
        let base = self.store.paths().base_for(category);
        let (languages, languages_error) = match self.languages.languages() {
            Ok(list) => (list.codes().map(str::to_owned).collect(), None),
            Err(error) => {
                warn!(target: TARGET, "auto-creating `{category}` for `{language}` only: {error}");
                (vec![language.to_owned()], Some(error))
            }
        };

        let mut report = AutoCreateReport {
            category: category.to_owned(),
            base: base.clone(),
            created: Vec::new(),
            failures: Vec::new(),
            languages_error,
        };

        for code in languages {
            match self.store.ensure_file(&code, category, &base) {
                Ok(EnsureOutcome::Created) => report.created.push(code),
                Ok(EnsureOutcome::AlreadyPresent) => {}
                Err(error) => {
                    warn!(target: TARGET, "could not create `{category}` catalogue for `{code}`: {error}");
                    report.failures.push((code, error));
                }
            }
        }

        debug!(
            target: TARGET,
            "auto-created `{category}` under {base} for {} language(s)",
            report.created.len(),
        );
        self.insert_forced(category, language, base);
        report
    }

    /// Register a forced file source when a catalogue file for the exact
    /// category already exists on disk.
    fn apply_live_file(&self, category: &str, language: &str) {
        let Some(base) = self.live_base(category, language) else {
            return;
        };

        let already_live = matches!(
            self.lock_table().get(category),
            Some(SourceSlot::Ready(existing))
                if existing.force_translation()
                    && existing.base_path().map(normalise_path) == Some(normalise_path(&base))
        );
        if already_live {
            return;
        }

        debug!(target: TARGET, "`{category}` has a catalogue for `{language}` under {base}");
        self.insert_forced(category, language, base);
    }

    fn live_base(&self, category: &str, language: &str) -> Option<Utf8PathBuf> {
        let key = (language.to_owned(), category.to_owned());
        if let Some(base) = self.lock_live_files().get(&key) {
            return Some(base.clone());
        }

        let paths = self.store.paths();
        let candidates = [paths.module_base(category), paths.global_base()];
        let base = candidates
            .into_iter()
            .find(|base| self.exists(base, language, category))?;

        self.lock_live_files().insert(key, base.clone());
        Some(base)
    }

    fn exists(&self, base: &Utf8Path, language: &str, category: &str) -> bool {
        !category.is_empty() && self.store.file_path(language, category, base).is_file()
    }

    fn insert_forced(&self, category: &str, language: &str, base: Utf8PathBuf) {
        let source = CatalogueSource::forced_file(language, base, &self.store);
        self.lock_table()
            .insert(category.to_owned(), SourceSlot::Ready(Arc::new(source)));
    }

    fn match_table(&self, category: &str) -> Option<(Arc<CatalogueSource>, MatchKind)> {
        let mut table = self.lock_table();

        if let Some(source) = self.instantiate(&mut table, category) {
            return Some((source, MatchKind::Exact));
        }

        let (pattern, kind) = match table
            .keys()
            .find(|pattern| is_prefix_match(pattern, category))
        {
            Some(pattern) => (pattern.clone(), MatchKind::Prefix),
            None if table.contains_key(UNIVERSAL_PATTERN) => {
                (UNIVERSAL_PATTERN.to_owned(), MatchKind::Universal)
            }
            None => return None,
        };

        let source = self.instantiate(&mut table, &pattern)?;
        table.insert(category.to_owned(), SourceSlot::Ready(Arc::clone(&source)));
        Some((source, kind))
    }

    fn instantiate(
        &self,
        table: &mut IndexMap<String, SourceSlot>,
        pattern: &str,
    ) -> Option<Arc<CatalogueSource>> {
        let slot = table.get_mut(pattern)?;
        let source = match slot {
            SourceSlot::Ready(source) => Arc::clone(source),
            SourceSlot::Pending(config) => {
                let source = Arc::new(CatalogueSource::from_config(config, &self.store));
                *slot = SourceSlot::Ready(Arc::clone(&source));
                source
            }
        };
        Some(source)
    }

    fn lock_table(&self) -> MutexGuard<'_, IndexMap<String, SourceSlot>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_live_files(&self) -> MutexGuard<'_, HashMap<(String, String), Utf8PathBuf>> {
        self.live_files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether `pattern` is a `prefix*` pattern whose prefix starts `category`.
fn is_prefix_match(pattern: &str, category: &str) -> bool {
    matches!(pattern.find('*'), Some(position) if position > 0)
        && category.starts_with(pattern.trim_end_matches('*'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Catalogue, decode};
    use crate::languages::LanguageList;
    use crate::paths::CataloguePaths;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        root: Utf8PathBuf,
        store: Arc<CatalogueFileStore>,
        languages: Arc<LanguageRegistry>,
    }

    impl Workspace {
        fn resolver(&self, sources: &[(&str, SourceConfig)]) -> CategoryResolver {
            let table = sources
                .iter()
                .map(|(pattern, config)| ((*pattern).to_owned(), config.clone()))
                .collect();
            CategoryResolver::new(Arc::clone(&self.store), Arc::clone(&self.languages), table)
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
        Workspace {
            store: Arc::new(CatalogueFileStore::new(CataloguePaths::new(root.clone()))),
            languages: Arc::new(LanguageRegistry::fixed(LanguageList::from_iter([
                ("en", "English"),
                ("es", "Español"),
            ]))),
            _dir: dir,
            root,
        }
    }

    #[rstest]
    #[case("app*", true)]
    #[case("ap*", true)]
    #[case("app/*", true)]
    #[case("billing*", false)]
    #[case("*", false)]
    #[case("app", false)]
    fn prefix_patterns(#[case] pattern: &str, #[case] expected: bool) {
        assert_eq!(is_prefix_match(pattern, "app/foo"), expected);
    }

    #[rstest]
    fn prefix_wildcards_beat_the_universal_fallback(workspace: Workspace) {
        let resolver = workspace.resolver(&[
            ("*", SourceConfig::inline("fr")),
            ("app*", SourceConfig::inline("de")),
        ]);

        let source = resolver.resolve("app/foo", "es").expect("resolve");

        assert_eq!(source.source_language(), "de");
        assert!(resolver.patterns().contains(&"app/foo".to_owned()));
    }

    #[rstest]
    fn exact_entries_beat_wildcards(workspace: Workspace) {
        let resolver = workspace.resolver(&[
            ("app*", SourceConfig::inline("de")),
            ("app", SourceConfig::inline("it")),
        ]);

        let source = resolver.resolve("app", "es").expect("resolve");

        assert_eq!(source.source_language(), "it");
    }

    #[rstest]
    fn sources_added_later_take_part_in_matching(workspace: Workspace) {
        let resolver = workspace.resolver(&[]).with_auto_create(false);
        resolver.add_source("report*", SourceConfig::inline("pt"));

        let source = resolver.resolve("reports/daily", "es").expect("resolve");

        assert_eq!(source.source_language(), "pt");
    }

    #[rstest]
    fn universal_fallback_is_memoised_for_the_category(workspace: Workspace) {
        let resolver = workspace.resolver(&[("*", SourceConfig::inline("fr"))]);

        let first = resolver.resolve("reports", "es").expect("resolve");
        let second = resolver.resolve("reports", "es").expect("resolve again");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.patterns(), ["*", "reports"]);
    }

    #[rstest]
    fn existing_catalogue_files_win_over_configuration(workspace: Workspace) {
        let base = workspace.store.paths().global_base();
        workspace
            .store
            .persist("es", "billing", &base, &Catalogue::from_iter([("Invoice", "Factura")]))
            .expect("seed");
        let resolver = workspace.resolver(&[("billing", SourceConfig::inline("en"))]);

        let first = resolver.resolve("billing", "es").expect("resolve");
        let second = resolver.resolve("billing", "es").expect("resolve again");

        assert!(first.force_translation());
        assert_eq!(first.base_path(), Some(base.as_path()));
        assert_eq!(first.lookup("billing", "Invoice", "es"), Some("Factura".to_owned()));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[rstest]
    fn catalogues_written_mid_run_replace_the_memoised_fallback(workspace: Workspace) {
        let resolver = workspace.resolver(&[("*", SourceConfig::inline("fr"))]);
        let fallback = resolver.resolve("reports", "es").expect("resolve");
        assert_eq!(resolver.patterns(), ["*", "reports"]);

        let path = workspace.root.join("translates/es/reports.json");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "{\"Summary\": \"Resumen\"}").expect("external write");
        let live = resolver.resolve("reports", "es").expect("resolve again");

        let global_base = workspace.store.paths().global_base();
        assert!(!Arc::ptr_eq(&fallback, &live));
        assert!(live.force_translation());
        assert_eq!(live.base_path(), Some(global_base.as_path()));
        assert_eq!(live.lookup("reports", "Summary", "es"), Some("Resumen".to_owned()));
        let table = resolver.lock_table();
        let Some(SourceSlot::Ready(universal)) = table.get(UNIVERSAL_PATTERN) else {
            panic!("the universal entry should be live");
        };
        assert!(Arc::ptr_eq(universal, &fallback));
        assert_eq!(universal.source_language(), "fr");
        assert!(universal.base_path().is_none());
    }

    #[rstest]
    fn module_catalogues_are_preferred(workspace: Workspace) {
        let module_base = workspace.store.paths().module_base("shop");
        for base in [module_base.clone(), workspace.store.paths().global_base()] {
            workspace
                .store
                .persist("es", "shop", &base, &Catalogue::sentinel())
                .expect("seed");
        }
        let resolver = workspace.resolver(&[]);

        let source = resolver.resolve("shop", "es").expect("resolve");

        assert_eq!(source.base_path(), Some(module_base.as_path()));
    }

    #[rstest]
    fn unmatched_categories_are_auto_created(workspace: Workspace) {
        let resolver = workspace.resolver(&[]);

        let source = resolver.resolve("billing", "es").expect("resolve");

        assert!(source.force_translation());
        assert_eq!(source.source_language(), "es");
        for language in ["en", "es"] {
            let path = workspace.root.join("translates").join(language).join("billing.json");
            let text = fs::read_to_string(&path).expect("placeholder");
            assert_eq!(decode(&text).expect("decode"), Catalogue::sentinel());
        }
    }

    #[rstest]
    fn auto_creation_reports_what_it_wrote(workspace: Workspace) {
        let resolver = workspace.resolver(&[]);
        let base = workspace.store.paths().global_base();
        workspace
            .store
            .ensure_file("en", "billing", &base)
            .expect("seed");

        let report = resolver.create_category("billing", "es");

        assert!(report.is_complete());
        assert_eq!(report.created, ["es"]);
        assert_eq!(report.base, base);
    }

    #[rstest]
    fn disabled_auto_creation_is_a_configuration_error(workspace: Workspace) {
        let resolver = workspace.resolver(&[]).with_auto_create(false);

        let outcome = resolver.resolve("billing", "es");

        assert!(matches!(
            outcome,
            Err(LexisError::Configuration { ref category }) if category == "billing"
        ));
        assert!(!workspace.root.join("translates").exists());
    }
}
