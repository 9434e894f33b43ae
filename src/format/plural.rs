//! Plural category rules.
//!
//! A compact subset of the CLDR rules, keyed by primary language subtag.
//! Languages not listed use the English rule (`1 → one`, else `other`).

use std::fmt;

/// CLDR plural category keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluralCategory {
    /// `zero`
    Zero,
    /// `one`
    One,
    /// `two`
    Two,
    /// `few`
    Few,
    /// `many`
    Many,
    /// `other`
    Other,
}

impl PluralCategory {
    /// Keyword used in templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Plural category of `n` in `language`; `ordinal` selects ordinal rules.
///
/// ```
/// use lexis::format::{PluralCategory, plural_category};
///
/// assert_eq!(plural_category("ru", 22.0, false), PluralCategory::Few);
/// assert_eq!(plural_category("en-GB", 23.0, true), PluralCategory::Few);
/// ```
#[must_use]
pub fn plural_category(language: &str, n: f64, ordinal: bool) -> PluralCategory {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let integer = whole_magnitude(n);

    if ordinal {
        return ordinal_category(&primary, integer);
    }

    match primary.as_str() {
        "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "lo" | "my" | "km" => {
            PluralCategory::Other
        }
        "fr" | "pt" => {
            if n.abs() < 2.0 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        "fa" | "hi" | "bn" | "am" | "zu" => {
            if n.abs() < 1.0 || integer == Some(1) {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        "ru" | "uk" | "be" => east_slavic(integer),
        "pl" => polish(integer),
        "cs" | "sk" => match integer {
            Some(1) => PluralCategory::One,
            Some(2..=4) => PluralCategory::Few,
            Some(_) => PluralCategory::Other,
            None => PluralCategory::Many,
        },
        "ar" => arabic(integer),
        _ => match integer {
            Some(1) => PluralCategory::One,
            _ => PluralCategory::Other,
        },
    }
}

/// `|n|` when `n` is a whole number that fits in a `u64`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is whole, non-negative, and range-checked first"
)]
fn whole_magnitude(n: f64) -> Option<u64> {
    let magnitude = n.abs();
    let whole = magnitude.is_finite() && magnitude.fract() == 0.0 && magnitude <= MAX_EXACT;
    whole.then(|| magnitude as u64)
}

/// Largest magnitude below which every whole `f64` converts exactly.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

#[expect(clippy::integer_division_remainder_used, reason = "CLDR plural operands are remainders")]
fn ordinal_category(primary: &str, integer: Option<u64>) -> PluralCategory {
    let Some(value) = integer else {
        return PluralCategory::Other;
    };
    if primary != "en" {
        return PluralCategory::Other;
    }
    match (value % 10, value % 100) {
        (1, rest) if rest != 11 => PluralCategory::One,
        (2, rest) if rest != 12 => PluralCategory::Two,
        (3, rest) if rest != 13 => PluralCategory::Few,
        _ => PluralCategory::Other,
    }
}

#[expect(clippy::integer_division_remainder_used, reason = "CLDR plural operands are remainders")]
fn east_slavic(integer: Option<u64>) -> PluralCategory {
    let Some(value) = integer else {
        return PluralCategory::Other;
    };
    match (value % 10, value % 100) {
        (1, rest) if rest != 11 => PluralCategory::One,
        (2..=4, rest) if !(12..=14).contains(&rest) => PluralCategory::Few,
        _ => PluralCategory::Many,
    }
}

#[expect(clippy::integer_division_remainder_used, reason = "CLDR plural operands are remainders")]
fn polish(integer: Option<u64>) -> PluralCategory {
    match integer {
        Some(1) => PluralCategory::One,
        Some(value) => match (value % 10, value % 100) {
            (2..=4, rest) if !(12..=14).contains(&rest) => PluralCategory::Few,
            _ => PluralCategory::Many,
        },
        None => PluralCategory::Other,
    }
}

#[expect(clippy::integer_division_remainder_used, reason = "CLDR plural operands are remainders")]
const fn arabic(integer: Option<u64>) -> PluralCategory {
    match integer {
        Some(0) => PluralCategory::Zero,
        Some(1) => PluralCategory::One,
        Some(2) => PluralCategory::Two,
        Some(value) => match value % 100 {
            3..=10 => PluralCategory::Few,
            11..=99 => PluralCategory::Many,
            _ => PluralCategory::Other,
        },
        None => PluralCategory::Other,
    }
}
