//! Message formatting.
//!
//! [`MessageFormatter`] is the seam the translator calls for templates using
//! argument types (`{count, plural, …}`); [`IcuFormatter`] is the bundled
//! implementation. Parameters are passed as an ordered [`Params`] map of
//! [`ParamValue`]s.

mod icu;
mod plural;

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

pub use icu::IcuFormatter;
pub use plural::{PluralCategory, plural_category};

/// Named message parameters, in insertion order.
pub type Params = IndexMap<String, ParamValue>;

/// Build [`Params`] from name/value pairs.
///
/// ```
/// use lexis::format::{ParamValue, params};
///
/// let params = params([("name", ParamValue::from("Ana")), ("count", 3.into())]);
/// assert_eq!(params["count"].to_string(), "3");
/// ```
pub fn params<K, V, I>(pairs: I) -> Params
where
    K: Into<String>,
    V: Into<ParamValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// A single message parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Text inserted as-is; selects `select` branches by exact match.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Decimal number.
    Float(f64),
}

impl ParamValue {
    /// Numeric value for plural selection and number formatting.
    ///
    /// Text parses as a number when it spells one.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers beyond 2^53 only need to select a plural branch"
    )]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Reasons a template cannot be formatted.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// A `{` was never closed, or a `}` had no opening brace.
    #[error("unbalanced braces at offset {offset}")]
    UnbalancedBraces {
        /// Character offset where the imbalance was detected.
        offset: usize,
    },
    /// The template is structurally invalid.
    #[error("malformed template at offset {offset}: {reason}")]
    Malformed {
        /// Character offset of the problem.
        offset: usize,
        /// What was expected.
        reason: String,
    },
    /// The argument type is not supported.
    #[error("argument `{argument}` uses unsupported type `{kind}`")]
    UnknownType {
        /// Argument name.
        argument: String,
        /// Type keyword found in the template.
        kind: String,
    },
    /// A `plural`, `selectordinal`, or `select` lacks its `other` branch.
    #[error("argument `{argument}` has no `other` branch")]
    MissingOther {
        /// Argument name.
        argument: String,
    },
    /// A selecting argument was not supplied.
    #[error("argument `{argument}` is required but missing")]
    MissingArgument {
        /// Argument name.
        argument: String,
    },
    /// A numeric argument received a non-numeric value.
    #[error("argument `{argument}` is not a number")]
    NotANumber {
        /// Argument name.
        argument: String,
    },
}

/// Formats a template with parameters for a language.
pub trait MessageFormatter: Send + Sync {
    /// Render `template` with `params` using `language`'s rules.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] when the template cannot be rendered.
    fn format(&self, template: &str, params: &Params, language: &str)
    -> Result<String, FormatError>;
}

impl<F> MessageFormatter for F
where
    F: Fn(&str, &Params, &str) -> Result<String, FormatError> + Send + Sync,
{
    fn format(
        &self,
        template: &str,
        params: &Params,
        language: &str,
    ) -> Result<String, FormatError> {
        self(template, params, language)
    }
}
