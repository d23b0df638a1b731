//! Filesystem-safe page and namespace names.
//!
//! DokuWiki page IDs are lowercase ASCII. Titles in the source are German,
//! so umlauts and `ß` are transliterated (`ü` → `ue`) before any generic
//! Unicode folding, which would otherwise reduce `ü` to a bare `u`.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Separator that replaces whitespace runs.
pub const SEPARATOR: char = '_';

/// Returned when a title sanitizes to nothing.
pub const PLACEHOLDER: &str = "untitled";

fn transliterate(c: char) -> Option<&'static str> {
    Some(match c {
        'Ä' => "Ae",
        'ä' => "ae",
        'Ö' => "Oe",
        'ö' => "oe",
        'Ü' => "Ue",
        'ü' => "ue",
        'ß' => "ss",
        'ẞ' => "SS",
        _ => return None,
    })
}

/// Turn a title into a lowercase page/namespace name.
///
/// Umlauts are transliterated, remaining diacritics folded to their base
/// letter, whitespace runs become a single `_`, and anything outside
/// `[a-z0-9_.-]` is dropped. Never returns an empty string.
///
/// # Examples
///
/// ```
/// use docwiki::wiki::slugify;
///
/// assert_eq!(slugify("Einführung"), "einfuehrung");
/// assert_eq!(slugify("ISMS.1 Sicherheitsmanagement"), "isms.1_sicherheitsmanagement");
/// assert_eq!(slugify("Café  Crème"), "cafe_creme");
/// assert_eq!(slugify("???"), "untitled");
/// ```
pub fn slugify(title: &str) -> String {
    // Compose first so decomposed umlauts (`u` + U+0308) are caught too.
    let mut expanded = String::with_capacity(title.len());
    for c in title.nfc() {
        match transliterate(c) {
            Some(replacement) => expanded.push_str(replacement),
            None => expanded.push(c),
        }
    }

    let mut slug = String::with_capacity(expanded.len());
    let mut pending_separator = false;
    for c in expanded.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() || c == SEPARATOR {
            pending_separator = true;
            continue;
        }
        let c = c.to_ascii_lowercase();
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-') {
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push(SEPARATOR);
        }
        pending_separator = false;
        slug.push(c);
    }

    // Leading dots would make hidden files (or `..`).
    let slug = slug.trim_start_matches(['.', SEPARATOR]);
    if slug.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        slug.to_string()
    }
}

/// Append a positional suffix to disambiguate duplicate names.
///
/// `occurrence` is 1-based; the first occurrence keeps the bare name.
pub fn disambiguate(base: &str, occurrence: usize) -> String {
    if occurrence <= 1 {
        base.to_string()
    } else {
        format!("{base}{SEPARATOR}{occurrence}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_umlauts() {
        assert_eq!(slugify("Übersicht"), "uebersicht");
        assert_eq!(slugify("Größe"), "groesse");
        assert_eq!(slugify("ÄRGER"), "aerger");
    }

    #[test]
    fn test_slugify_decomposed_umlauts() {
        assert_eq!(slugify("U\u{308}bersicht"), "uebersicht");
        assert_eq!(slugify("Gro\u{308}\u{df}e"), slugify("Größe"));
    }

    #[test]
    fn test_slugify_generic_diacritics() {
        assert_eq!(slugify("Résumé"), "resume");
        assert_eq!(slugify("Łódź"), "odz");
    }

    #[test]
    fn test_slugify_whitespace_runs() {
        assert_eq!(slugify("  Risk \t Management  "), "risk_management");
        assert_eq!(slugify("a & b"), "a_b");
    }

    #[test]
    fn test_slugify_keeps_dots_and_dashes() {
        assert_eq!(slugify("APP.1.1 Office-Produkte"), "app.1.1_office-produkte");
    }

    #[test]
    fn test_slugify_never_empty() {
        assert_eq!(slugify(""), PLACEHOLDER);
        assert_eq!(slugify("   "), PLACEHOLDER);
        assert_eq!(slugify("§§"), PLACEHOLDER);
        assert_eq!(slugify(".."), PLACEHOLDER);
    }

    #[test]
    fn test_slugify_no_hidden_names() {
        assert_eq!(slugify(".htaccess"), "htaccess");
    }

    #[test]
    fn test_disambiguate() {
        assert_eq!(disambiguate("start", 1), "start");
        assert_eq!(disambiguate("start", 2), "start_2");
    }

    proptest! {
        #[test]
        fn prop_slug_whitelist(title in "[a-zA-Z0-9 äöüÄÖÜßéèáàç.,;:!?()/-]{0,40}") {
            let slug = slugify(&title);
            prop_assert!(!slug.is_empty());
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || matches!(c, '_' | '.' | '-')));
        }

        #[test]
        fn prop_slug_is_stable(title in "\\PC{0,30}") {
            let slug = slugify(&title);
            prop_assert_eq!(slugify(&slug), slug.clone());
        }
    }
}
