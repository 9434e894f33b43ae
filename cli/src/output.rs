//! Output formatting for CLI commands.

use lexis::catalogue::Catalogue;
use lexis::{KeyOutcome, LanguageList, RegistrationReport};
use serde_json::Value;

/// One line per language describing what registration did.
///
/// # Examples
///
/// ```
/// use lexis::RegistrationReport;
/// use lexis_cli::output::format_registration;
///
/// let output = format_registration(&RegistrationReport::default());
/// assert!(output.is_empty());
/// ```
#[must_use]
pub fn format_registration(report: &RegistrationReport) -> String {
    let mut output = String::new();
    for outcome in &report.outcomes {
        let created = match &outcome.ensured {
            Ok(lexis::EnsureOutcome::Created) => " (catalogue created)",
            _ => "",
        };
        output.push_str(&format!("{}: {}{created}\n", outcome.language, outcome.key));
    }
    output
}

/// Whether any language failed to record the key.
#[must_use]
pub fn has_failures(report: &RegistrationReport) -> bool {
    report
        .outcomes
        .iter()
        .any(|outcome| !matches!(outcome.key, KeyOutcome::Present | KeyOutcome::Added))
}

/// `code<TAB>label` lines in list order.
#[must_use]
pub fn format_languages(list: &LanguageList) -> String {
    let mut output = String::new();
    for (code, label) in list.iter() {
        output.push_str(&format!("{code}\t{label}\n"));
    }
    output
}

/// `message => translation` lines in catalogue order.
#[must_use]
pub fn format_catalogue(catalogue: &Catalogue) -> String {
    let mut output = String::new();
    for (message, translation) in catalogue.iter() {
        output.push_str(&format!("{message} => {translation}\n"));
    }
    output
}

/// One language code per line.
#[must_use]
pub fn format_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> String {
    let mut output = String::new();
    for code in codes {
        output.push_str(code);
        output.push('\n');
    }
    output
}

/// Pretty-printed JSON for a lookup table entry.
///
/// ```
/// use lexis_cli::output::format_table_entry;
///
/// let entry = serde_json::json!({"direction": "rtl"});
/// assert_eq!(format_table_entry(&entry), "{\n  \"direction\": \"rtl\"\n}\n");
/// ```
#[must_use]
pub fn format_table_entry(entry: &Value) -> String {
    format!("{entry:#}\n")
}
