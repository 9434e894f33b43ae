//! Target-language selection.
//!
//! The translator takes the target language per call; this module decides
//! the default one for callers without their own notion of "current
//! language". Candidates are considered in priority order and the first one
//! naming a supported language wins.

use std::env;
use std::fmt;

use log::{debug, warn};

use crate::languages::LanguageList;

/// Environment variable consulted for the target language.
pub const LANGUAGE_ENV: &str = "LEXIS_LANGUAGE";

const TARGET: &str = "lexis::selection";

/// Source for a resolved language.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LanguageSource {
    /// Language supplied explicitly by the caller.
    ExplicitArgument,
    /// Language sourced from the `LEXIS_LANGUAGE` environment variable.
    EnvironmentVariable,
    /// Language taken from `lexis.toml`.
    Configuration,
    /// The configured source language.
    Fallback,
}

impl fmt::Display for LanguageSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitArgument => formatter.write_str("explicit language override"),
            Self::EnvironmentVariable => formatter.write_str(LANGUAGE_ENV),
            Self::Configuration => formatter.write_str("configuration language"),
            Self::Fallback => formatter.write_str("source language"),
        }
    }
}

/// Outcome of language resolution including its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LanguageSelection {
    language: String,
    source: LanguageSource,
}

impl LanguageSelection {
    /// Returns the resolved language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns where the language came from.
    #[must_use]
    pub const fn source(&self) -> LanguageSource {
        self.source
    }

    /// Whether no candidate was usable.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.source == LanguageSource::Fallback
    }

    /// Consumes the selection, yielding the language code.
    #[must_use]
    pub fn into_language(self) -> String {
        self.language
    }
}

/// Resolve the target language from explicit, environment, and
/// configuration candidates.
///
/// Candidates are considered in this order:
///
/// 1. The explicit language supplied by the caller.
/// 2. The `LEXIS_LANGUAGE` environment variable.
/// 3. The `language` configuration key.
/// 4. `fallback` (the source language) when no candidate is usable.
///
/// When `supported` is given, candidates missing from it are skipped with a
/// warning.
///
/// ```
/// use lexis::selection::{LanguageSource, resolve_language};
///
/// let selection = resolve_language(None, None, Some("fa"), None, "en-US");
/// assert_eq!(selection.language(), "fa");
/// assert_eq!(selection.source(), LanguageSource::Configuration);
/// ```
#[must_use]
pub fn resolve_language(
    explicit: Option<&str>,
    environment: Option<&str>,
    configuration: Option<&str>,
    supported: Option<&LanguageList>,
    fallback: &str,
) -> LanguageSelection {
    let candidates = [
        (LanguageSource::ExplicitArgument, explicit),
        (LanguageSource::EnvironmentVariable, environment),
        (LanguageSource::Configuration, configuration),
    ];

    let selection = candidates
        .into_iter()
        .find_map(|(source, raw)| try_candidate(source, raw, supported))
        .unwrap_or_else(|| LanguageSelection {
            language: fallback.to_owned(),
            source: LanguageSource::Fallback,
        });

    debug!(
        target: TARGET,
        "resolved {} to `{}`",
        selection.source(),
        selection.language(),
    );
    selection
}

/// [`resolve_language`] reading the environment candidate from
/// `LEXIS_LANGUAGE`.
#[must_use]
pub fn resolve_language_from_env(
    explicit: Option<&str>,
    configuration: Option<&str>,
    supported: Option<&LanguageList>,
    fallback: &str,
) -> LanguageSelection {
    let environment = env::var_os(LANGUAGE_ENV).and_then(|value| value.into_string().ok());
    resolve_language(
        explicit,
        environment.as_deref(),
        configuration,
        supported,
        fallback,
    )
}

fn try_candidate(
    source: LanguageSource,
    raw: Option<&str>,
    supported: Option<&LanguageList>,
) -> Option<LanguageSelection> {
    let candidate = normalise_language(raw)?;

    if supported.is_none_or(|list| list.contains(candidate)) {
        return Some(LanguageSelection {
            language: candidate.to_owned(),
            source,
        });
    }

    warn!(
        target: TARGET,
        "skipping unsupported {source} `{candidate}`",
    );
    None
}

/// Trim whitespace and discard empty language candidates.
#[must_use]
pub fn normalise_language(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
