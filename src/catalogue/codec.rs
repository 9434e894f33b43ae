//! JSON encoding for catalogue files.
//!
//! Files are pretty-printed objects of string pairs so translators can edit
//! them by hand. Non-ASCII text is written as-is rather than escaped.

use super::Catalogue;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Serialise `catalogue` as pretty JSON with a trailing newline.
///
/// ```
/// use lexis::catalogue::{Catalogue, encode};
///
/// let text = encode(&Catalogue::from_iter([("Hello", "سلام")])).unwrap();
/// assert!(text.contains("سلام"));
/// assert!(text.ends_with('\n'));
/// ```
///
/// # Errors
///
/// Returns the serialiser error; string maps always serialise in practice.
pub fn encode(catalogue: &Catalogue) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(catalogue)?;
    text.push('\n');
    Ok(text)
}

/// Parse a catalogue document, tolerating a leading byte-order mark.
///
/// # Errors
///
/// Returns the parser error when `text` is not an object of strings.
pub fn decode(text: &str) -> Result<Catalogue, serde_json::Error> {
    serde_json::from_str(text.trim_start_matches(BYTE_ORDER_MARK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn encodes_one_entry_per_line() {
        let text = encode(&Catalogue::sentinel()).expect("encode");
        assert_eq!(text, "{\n  \"start\": \"start\"\n}\n");
    }

    #[rstest]
    fn decode_preserves_file_order() {
        let catalogue = decode("{\"b\": \"2\", \"a\": \"1\"}").expect("decode");
        let keys: Vec<&str> = catalogue.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[rstest]
    fn decode_accepts_hand_edited_files() {
        let text = "\u{feff}{\n    \"Hello\" : \"Hallo\",\n\n  \"Bye\":\"Tschüss\"\n}\n";
        let catalogue = decode(text).expect("decode");
        assert_eq!(catalogue.get("Bye"), Some("Tschüss"));
    }

    #[rstest]
    #[case("[]")]
    #[case("{\"count\": 3}")]
    #[case("{\"open\": ")]
    fn decode_rejects_non_mappings(#[case] text: &str) {
        assert!(decode(text).is_err());
    }
}
