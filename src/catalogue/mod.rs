//! Message catalogues and their on-disk store.
//!
//! A [`Catalogue`] maps source messages to translations for one language and
//! one category. [`CatalogueFileStore`] reads and writes the backing files
//! and remembers every catalogue it has loaded.

mod codec;
mod store;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use codec::{decode, encode};
pub use store::{CatalogueFileStore, EnsureOutcome};

/// Key and value of the placeholder entry in a freshly created catalogue.
pub const SENTINEL: &str = "start";

/// Ordered message → translation mapping for one (language, category) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue {
    entries: IndexMap<String, String>,
}

impl Catalogue {
    /// Empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue holding only the sentinel entry.
    ///
    /// ```
    /// use lexis::catalogue::{Catalogue, SENTINEL};
    ///
    /// let catalogue = Catalogue::sentinel();
    /// assert_eq!(catalogue.get(SENTINEL), Some(SENTINEL));
    /// assert_eq!(catalogue.len(), 1);
    /// ```
    #[must_use]
    pub fn sentinel() -> Self {
        Self::from_iter([(SENTINEL, SENTINEL)])
    }

    /// Translation stored for `message`, if any.
    #[must_use]
    pub fn get(&self, message: &str) -> Option<&str> {
        self.entries.get(message).map(String::as_str)
    }

    /// Whether `message` is a key of this catalogue.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.entries.contains_key(message)
    }

    /// Store `translation` for `message`, keeping the original position of
    /// an existing key.
    pub fn insert(&mut self, message: impl Into<String>, translation: impl Into<String>) {
        self.entries.insert(message.into(), translation.into());
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(message, translation)| (message.as_str(), translation.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Catalogue
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(message, translation)| (message.into(), translation.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position_for_existing_keys() {
        let mut catalogue = Catalogue::from_iter([("a", "1"), ("b", "2")]);
        catalogue.insert("a", "3");

        let keys: Vec<&str> = catalogue.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(catalogue.get("a"), Some("3"));
    }

    #[test]
    fn empty_translations_are_still_entries() {
        let catalogue = Catalogue::from_iter([("Draft", "")]);
        assert!(catalogue.contains("Draft"));
        assert_eq!(catalogue.get("Draft"), Some(""));
    }
}
