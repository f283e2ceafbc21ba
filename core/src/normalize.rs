use unicode_normalization::UnicodeNormalization;

use crate::error::SearchError;

/// The result of normalizing a raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub is_japanese: bool,
}

/// NFKC-normalizes `query`, trims surrounding whitespace, and classifies it
/// as Japanese (kana or CJK ideographs present) or not.
///
/// Fails with `SearchError::EmptyQuery` if nothing is left after trimming.
pub fn normalize(query: &str) -> Result<Normalized, SearchError> {
    let text: String = query.nfkc().collect::<String>().trim().to_string();
    if text.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    let is_japanese = contains_japanese(&text);
    Ok(Normalized { text, is_japanese })
}

fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

fn is_japanese_char(c: char) -> bool {
    let cp = c as u32;
    (0x3040..=0x30FF).contains(&cp) || (0x3400..=0x4DBF).contains(&cp) || (0x4E00..=0x9FFF).contains(&cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_after_trim_fails() {
        assert!(matches!(normalize("   "), Err(SearchError::EmptyQuery)));
        assert!(matches!(normalize(""), Err(SearchError::EmptyQuery)));
    }

    #[test]
    fn classifies_kana_as_japanese() {
        let n = normalize("ざっと").unwrap();
        assert!(n.is_japanese);
        assert_eq!(n.text, "ざっと");
    }

    #[test]
    fn classifies_kanji_as_japanese() {
        let n = normalize("家族").unwrap();
        assert!(n.is_japanese);
    }

    #[test]
    fn classifies_latin_text_as_non_japanese() {
        let n = normalize("  atom  ").unwrap();
        assert!(!n.is_japanese);
        assert_eq!(n.text, "atom");
    }

    #[test]
    fn normalize_is_idempotent() {
        for q in ["ざっと", "atom", "　家族　", "ＡＢＣ", "café"] {
            let once = normalize(q).unwrap();
            let twice = normalize(&once.text).unwrap();
            assert_eq!(once.text, twice.text);
            assert_eq!(once.is_japanese, twice.is_japanese);
        }
    }

    #[test]
    fn nfkc_folds_fullwidth_forms() {
        // Fullwidth Latin 'Ａ' (U+FF21) folds to ASCII 'A' under NFKC.
        let n = normalize("Ａ").unwrap();
        assert_eq!(n.text, "A");
        assert!(!n.is_japanese);
    }
}
