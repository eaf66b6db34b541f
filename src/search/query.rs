use std::sync::LazyLock;

use regex::Regex;

static STRUCTURED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+):(.+)$").expect("structured query regex must compile"));

/// Category a structured `kind:term` query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Module,
    Class,
    Function,
    Variable,
    Import,
    Docstring,
}

impl QueryKind {
    /// Recognized prefixes (case-sensitive).
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "module" => Some(Self::Module),
            "class" => Some(Self::Class),
            "function" | "method" => Some(Self::Function),
            "var" | "variable" => Some(Self::Variable),
            "import" => Some(Self::Import),
            "doc" | "docstring" => Some(Self::Docstring),
            _ => None,
        }
    }
}

/// A parsed search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Match names and docstrings across every category.
    FreeText(String),
    Structured { kind: QueryKind, term: String },
}

impl SearchQuery {
    /// Dispatch a raw query string.
    ///
    /// Queries with a `:` are tried as `kind:term`. A query that does not fit
    /// that shape is searched as free text verbatim; an unknown kind is
    /// searched as free text on the trimmed term alone.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        if !query.contains(':') {
            return Self::FreeText(query.to_string());
        }
        let Some(caps) = STRUCTURED.captures(query) else {
            return Self::FreeText(query.to_string());
        };
        let term = caps[2].trim().to_string();
        match QueryKind::from_prefix(&caps[1]) {
            Some(kind) => Self::Structured { kind, term },
            None => Self::FreeText(term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_query_is_free_text() {
        assert_eq!(
            SearchQuery::parse("Widget"),
            SearchQuery::FreeText("Widget".into())
        );
    }

    #[test]
    fn known_kinds_are_structured() {
        assert_eq!(
            SearchQuery::parse("class: Foo "),
            SearchQuery::Structured {
                kind: QueryKind::Class,
                term: "Foo".into()
            }
        );
        assert_eq!(
            SearchQuery::parse("method:run"),
            SearchQuery::Structured {
                kind: QueryKind::Function,
                term: "run".into()
            }
        );
        assert_eq!(
            SearchQuery::parse("docstring:parse"),
            SearchQuery::Structured {
                kind: QueryKind::Docstring,
                term: "parse".into()
            }
        );
    }

    #[test]
    fn unknown_kind_falls_back_to_term() {
        assert_eq!(
            SearchQuery::parse("bogus: Foo"),
            SearchQuery::FreeText("Foo".into())
        );
    }

    #[test]
    fn malformed_prefix_falls_back_to_whole_query() {
        assert_eq!(
            SearchQuery::parse("a b:c"),
            SearchQuery::FreeText("a b:c".into())
        );
        assert_eq!(
            SearchQuery::parse("class:"),
            SearchQuery::FreeText("class:".into())
        );
    }

    #[test]
    fn kind_prefix_is_case_sensitive() {
        assert_eq!(
            SearchQuery::parse("Class:Foo"),
            SearchQuery::FreeText("Foo".into())
        );
    }
}
