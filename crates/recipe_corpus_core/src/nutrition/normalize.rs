//! Name normalization shared by index keys and title lookups.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]+").expect("valid disallowed-chars regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Normalizes a display name into a lookup key.
///
/// Lower-cases, drops every char outside `[a-z0-9]` and whitespace, then
/// collapses whitespace runs to one space and trims the ends.
pub fn normalize_name(value: &str) -> String {
    let lowered = value.to_lowercase();
    let stripped = DISALLOWED_CHARS_RE.replace_all(&lowered, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_name;

    #[test]
    fn normalization_is_deterministic_across_case_spacing_and_punctuation() {
        assert_eq!(normalize_name("Caramel Apples"), "caramel apples");
        assert_eq!(normalize_name("  CARAMEL   apples!!"), "caramel apples");
    }

    #[test]
    fn punctuation_is_removed_without_inserting_spaces() {
        assert_eq!(normalize_name("Mom's Apple-Pie"), "moms applepie");
        assert_eq!(normalize_name("S'mores\t\n Bars (No-Bake)"), "smores bars nobake");
    }

    #[test]
    fn digits_survive_and_non_ascii_letters_are_dropped() {
        assert_eq!(normalize_name("7-Layer Bars"), "7layer bars");
        assert_eq!(normalize_name("Crème Brûlée"), "crme brle");
    }

    #[test]
    fn blank_or_symbol_only_input_normalizes_to_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("  !!! ??? "), "");
    }
}
