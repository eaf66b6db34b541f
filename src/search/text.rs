/// Display cap for docstrings in search hits.
pub const DOCSTRING_MAX: usize = 200;
/// Display cap for variable values in search hits.
pub const VALUE_MAX: usize = 100;

/// Cap `text` at `max` characters, marking the cut with `...`.
///
/// Absent or empty text stays absent.
#[must_use]
pub fn truncate(text: Option<&str>, max: usize) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    match text.char_indices().nth(max) {
        None => Some(text.to_string()),
        Some((cut, _)) => Some(format!("{}...", &text[..cut])),
    }
}

/// Case-insensitive substring pattern for `LIKE ... ESCAPE '\'`.
///
/// LIKE wildcards in the term match literally.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_ascii_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        let doc = "a".repeat(250);
        let out = truncate(Some(&doc), DOCSTRING_MAX).unwrap();
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..200], &doc[..200]);
    }

    #[test]
    fn short_text_is_unchanged() {
        let doc = "b".repeat(150);
        assert_eq!(truncate(Some(&doc), DOCSTRING_MAX).as_deref(), Some(doc.as_str()));
    }

    #[test]
    fn text_at_limit_is_unchanged() {
        let value = "c".repeat(VALUE_MAX);
        assert_eq!(truncate(Some(&value), VALUE_MAX).unwrap().len(), VALUE_MAX);
    }

    #[test]
    fn empty_and_absent_are_absent() {
        assert!(truncate(None, 10).is_none());
        assert!(truncate(Some(""), 10).is_none());
    }

    #[test]
    fn truncation_counts_characters() {
        let out = truncate(Some("ééééé"), 3).unwrap();
        assert_eq!(out, "ééé...");
    }

    #[test]
    fn like_pattern_lowers_and_escapes() {
        assert_eq!(like_pattern("Foo"), "%foo%");
        assert_eq!(like_pattern("__init__"), "%\\_\\_init\\_\\_%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
    }

    #[test]
    fn like_pattern_folds_ascii_only() {
        // SQLite's LOWER() leaves non-ASCII letters alone
        assert_eq!(like_pattern("ÉLAN"), "%Élan%");
    }
}
