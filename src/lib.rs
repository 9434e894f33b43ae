//! Self-healing message catalogues.
//!
//! Messages are grouped into categories; each (language, category) pair has
//! a JSON catalogue mapping source messages to translations. A
//! [`Translator`] resolves the category to a catalogue source, looks the
//! message up, and, when the category or the message is unknown, creates the
//! missing catalogues and registers the message (mapped to itself) for every
//! supported language so it shows up for translators to fill in.
//!
//! ```no_run
//! use lexis::{LexisConfig, Translator, format::params};
//!
//! let config = LexisConfig::rooted_at("/srv/app");
//! let translator = Translator::from_config(&config);
//! let greeting = translator.translate("app", "Hello {name}", &params([("name", "Ana")]), "es")?;
//! # Ok::<(), lexis::LexisError>(())
//! ```

pub mod catalogue;
pub mod config;
pub mod error;
pub mod format;
pub mod languages;
pub mod paths;
pub mod registrar;
pub mod resolver;
pub mod selection;
pub mod source;
pub mod tables;
pub mod translator;

pub use catalogue::{Catalogue, CatalogueFileStore, EnsureOutcome};
pub use config::LexisConfig;
pub use error::{CatalogueError, LexisError, Result};
pub use format::{FormatError, IcuFormatter, MessageFormatter, ParamValue, Params};
pub use languages::{LanguageList, LanguageRegistry};
pub use paths::CataloguePaths;
pub use registrar::{KeyOutcome, KeyRegistrar, LanguageOutcome, RegistrationReport};
pub use resolver::{AutoCreateReport, CategoryResolver};
pub use source::{CatalogueSource, SourceBackend, SourceConfig};
pub use tables::LookupTable;
pub use translator::Translator;
