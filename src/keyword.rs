//! Keyword normalization.
//!
//! Keywords in metadata records are free text typed by whoever archived the
//! document: `"Steuer-Bescheid"`, `" steuer bescheid"`, `"Süßwasser"`. They
//! double as bucket keys and as part of output file names
//! (`keyword_<keyword>.html`), so every keyword is folded into one canonical
//! spelling before it is stored.
//!
//! ## Normalization Steps
//!
//! Applied in this exact order:
//!
//! 1. Trim surrounding whitespace
//! 2. Lowercase
//! 3. Spaces → `_`
//! 4. Hyphens → `_`
//! 5. `ä` → `ae`, `ö` → `oe`, `ü` → `ue`, `ß` → `ss`
//!
//! Umlaut replacement runs after lowercasing, so `Ä` becomes `ae` too. No
//! other characters are transliterated.

/// Normalize a single keyword.
///
/// - `" Süßwasser-Kunde "` → `"suesswasser_kunde"`
/// - `"Tax Return"` → `"tax_return"`
/// - `"already_normal"` → `"already_normal"`
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('-', "_")
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss")
}

/// Normalize a record's keyword list.
///
/// Order follows the record. Keywords that normalize to the same spelling
/// are kept once (first occurrence wins). A blank keyword becomes `""` and
/// is kept.
pub fn normalize_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::with_capacity(raw.len());
    for keyword in raw {
        let normalized = normalize_keyword(keyword.as_ref());
        if !keywords.contains(&normalized) {
            keywords.push(normalized);
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umlauts_and_separators() {
        assert_eq!(normalize_keyword(" Süßwasser-Kunde "), "suesswasser_kunde");
    }

    #[test]
    fn uppercase_umlauts_folded_first() {
        assert_eq!(normalize_keyword("ÄRZTE"), "aerzte");
        assert_eq!(normalize_keyword("Öl"), "oel");
        assert_eq!(normalize_keyword("Übersicht"), "uebersicht");
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(normalize_keyword("Tax Return"), "tax_return");
    }

    #[test]
    fn inner_whitespace_other_than_space_kept() {
        assert_eq!(normalize_keyword("a\tb"), "a\tb");
    }

    #[test]
    fn no_general_transliteration() {
        assert_eq!(normalize_keyword("Café"), "café");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            " Süßwasser-Kunde ",
            "Tax Return",
            "ÄRZTE-Kammer",
            "invoice",
            "Straße 12",
        ] {
            let once = normalize_keyword(raw);
            assert_eq!(normalize_keyword(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn list_keeps_record_order() {
        let keywords = normalize_keywords(&["Tax", "Invoice", "Bank"]);
        assert_eq!(keywords, vec!["tax", "invoice", "bank"]);
    }

    #[test]
    fn list_drops_duplicates_after_normalization() {
        let keywords = normalize_keywords(&["Invoice", "invoice ", "Tax"]);
        assert_eq!(keywords, vec!["invoice", "tax"]);
    }

    #[test]
    fn list_keeps_blank_keyword_once() {
        let keywords = normalize_keywords(&["  ", "", "tax"]);
        assert_eq!(keywords, vec!["", "tax"]);
    }

    #[test]
    fn empty_list() {
        let keywords = normalize_keywords::<&str>(&[]);
        assert!(keywords.is_empty());
    }
}
