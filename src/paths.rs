//! Catalogue path layout under a system root.
//!
//! Categories backed by a module directory keep their catalogues inside the
//! module (`<root>/modules/<category>/translates/`); every other category
//! shares the global `<root>/translates/` tree. Within a base directory each
//! language owns a subdirectory holding one file per category.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::config::LexisConfig;

/// Computes catalogue locations for a system root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CataloguePaths {
    root: Utf8PathBuf,
    modules_dir: String,
    translates_dir: String,
    extension: String,
}

impl CataloguePaths {
    /// Layout rooted at `root` using the default directory names.
    ///
    /// ```
    /// use lexis::CataloguePaths;
    ///
    /// let paths = CataloguePaths::new("/srv/app");
    /// assert_eq!(paths.global_base().as_str(), "/srv/app/translates");
    /// ```
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self::with_layout(root, "modules", "translates", "json")
    }

    /// Layout with explicit directory names and file extension.
    #[must_use]
    pub fn with_layout(
        root: impl Into<Utf8PathBuf>,
        modules_dir: &str,
        translates_dir: &str,
        extension: &str,
    ) -> Self {
        Self {
            root: root.into(),
            modules_dir: modules_dir.to_owned(),
            translates_dir: translates_dir.to_owned(),
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    /// Layout described by a loaded configuration.
    #[must_use]
    pub fn from_config(config: &LexisConfig) -> Self {
        Self::with_layout(
            config.system_root.clone(),
            &config.modules_dir,
            &config.translates_dir,
            &config.extension,
        )
    }

    /// System root every relative path resolves against.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Catalogue file extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Directory that would hold the module named after `category`.
    #[must_use]
    pub fn module_dir(&self, category: &str) -> Utf8PathBuf {
        self.root.join(&self.modules_dir).join(category)
    }

    /// Whether `category` names an existing module directory.
    #[must_use]
    pub fn is_module(&self, category: &str) -> bool {
        !category.is_empty() && self.module_dir(category).is_dir()
    }

    /// Shared catalogue base for categories without a module.
    #[must_use]
    pub fn global_base(&self) -> Utf8PathBuf {
        self.root.join(&self.translates_dir)
    }

    /// Catalogue base inside the module named after `category`, whether or
    /// not the module exists.
    #[must_use]
    pub fn module_base(&self, category: &str) -> Utf8PathBuf {
        self.module_dir(category).join(&self.translates_dir)
    }

    /// Catalogue base for `category`, module-scoped when the module exists.
    #[must_use]
    pub fn base_for(&self, category: &str) -> Utf8PathBuf {
        if self.is_module(category) {
            self.module_base(category)
        } else {
            self.global_base()
        }
    }

    /// Catalogue file for `language` and `category` below `base`.
    #[must_use]
    pub fn file_in(&self, base: &Utf8Path, language: &str, category: &str) -> Utf8PathBuf {
        base.join(language)
            .join(format!("{category}.{}", self.extension))
    }

    /// Resolve a configured base path against the system root.
    #[must_use]
    pub fn resolve_base(&self, base: &Utf8Path) -> Utf8PathBuf {
        if base.is_absolute() {
            base.to_path_buf()
        } else {
            self.root.join(base)
        }
    }

    /// Resolve a configured document path (language list, tables).
    #[must_use]
    pub fn resolve_file(&self, file: &Utf8Path) -> Utf8PathBuf {
        self.resolve_base(file)
    }
}

/// Lexically normalise `path` so equivalent spellings share a cache entry.
///
/// `.` segments are dropped and `..` removes the preceding normal segment.
/// The filesystem is not consulted, so the path need not exist.
///
/// ```
/// use camino::Utf8Path;
/// use lexis::paths::normalise_path;
///
/// let path = normalise_path(Utf8Path::new("/srv/./app/../app/translates/fa"));
/// assert_eq!(path.as_str(), "/srv/app/translates/fa");
/// ```
#[must_use]
pub fn normalise_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalised = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let ends_in_normal = matches!(
                    normalised.components().next_back(),
                    Some(Utf8Component::Normal(_))
                );
                if ends_in_normal {
                    normalised.pop();
                } else {
                    normalised.push("..");
                }
            }
            other => normalised.push(other.as_str()),
        }
    }
    normalised
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn global_categories_share_the_translates_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
        let paths = CataloguePaths::new(root.clone());

        assert!(!paths.is_module("billing"));
        assert_eq!(paths.base_for("billing"), root.join("translates"));
    }

    #[rstest]
    fn module_categories_keep_catalogues_inside_the_module() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
        std::fs::create_dir_all(root.join("modules").join("shop")).expect("module dir");
        let paths = CataloguePaths::new(root.clone());

        assert!(paths.is_module("shop"));
        assert_eq!(
            paths.base_for("shop"),
            root.join("modules").join("shop").join("translates")
        );
    }

    #[rstest]
    fn empty_category_is_never_a_module() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
        std::fs::create_dir_all(root.join("modules")).expect("modules dir");

        assert!(!CataloguePaths::new(root).is_module(""));
    }

    #[rstest]
    #[case("json", "fa/app.json")]
    #[case(".json", "fa/app.json")]
    #[case("cat", "fa/app.cat")]
    fn file_names_use_the_configured_extension(#[case] extension: &str, #[case] expected: &str) {
        let paths = CataloguePaths::with_layout("", "modules", "translates", extension);
        assert_eq!(
            paths.file_in(Utf8Path::new(""), "fa", "app").as_str(),
            expected
        );
    }

    #[rstest]
    fn hierarchical_categories_nest_below_the_language() {
        let paths = CataloguePaths::new("/srv");
        let file = paths.file_in(&paths.global_base(), "de", "shop/cart");
        assert_eq!(file.as_str(), "/srv/translates/de/shop/cart.json");
    }

    #[rstest]
    #[case("/a/b/../c", "/a/c")]
    #[case("/a/./b", "/a/b")]
    #[case("a/../../b", "../b")]
    #[case("/a/b/", "/a/b")]
    fn normalises_lexically(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalise_path(Utf8Path::new(input)).as_str(), expected);
    }

    #[rstest]
    fn relative_bases_resolve_against_the_root() {
        let paths = CataloguePaths::new("/srv");
        assert_eq!(
            paths.resolve_base(Utf8Path::new("messages")).as_str(),
            "/srv/messages"
        );
        assert_eq!(
            paths.resolve_base(Utf8Path::new("/opt/messages")).as_str(),
            "/opt/messages"
        );
    }
}
