//! Search operations shared between CLI and MCP.
//!
//! Dispatches free-text and `kind:term` queries over the catalog and
//! shapes hits for display.

use serde::Serialize;

use crate::db::queries::MatchField;
use crate::db::Database;
use crate::error::Result;
use crate::models::hits::{ClassHit, FunctionHit, ModuleHit, SearchResults, VariableHit};
use crate::search::{like_pattern, truncate, QueryKind, SearchQuery, DOCSTRING_MAX, VALUE_MAX};

/// Search the catalog.
///
/// Each category is capped at `limit` independently. Docstrings are cut to
/// 200 characters and variable values to 100.
pub fn search_code(
    db: &Database,
    query: &str,
    project_id: Option<i64>,
    limit: usize,
) -> Result<SearchResults> {
    let parsed = SearchQuery::parse(query);
    tracing::debug!(query, ?parsed, ?project_id, limit, "search");

    db.read_transaction(|db| match parsed {
        SearchQuery::FreeText(term) => free_text(db, &term, project_id, limit),
        SearchQuery::Structured { kind, term } => structured(db, kind, &term, project_id, limit),
    })
}

fn free_text(
    db: &Database,
    term: &str,
    project_id: Option<i64>,
    limit: usize,
) -> Result<SearchResults> {
    let pattern = like_pattern(term);
    let field = MatchField::NameOrDocstring;
    Ok(SearchResults {
        modules: shape_modules(db.search_modules(&pattern, field, project_id, limit)?),
        classes: shape_classes(db.search_classes(&pattern, field, project_id, limit)?),
        functions: shape_functions(db.search_functions(&pattern, field, project_id, limit)?),
        variables: shape_variables(db.search_variables(&pattern, project_id, limit)?),
    })
}

fn structured(
    db: &Database,
    kind: QueryKind,
    term: &str,
    project_id: Option<i64>,
    limit: usize,
) -> Result<SearchResults> {
    let pattern = like_pattern(term);
    let mut results = SearchResults::default();
    match kind {
        QueryKind::Module => {
            results.modules =
                shape_modules(db.search_modules(&pattern, MatchField::Name, project_id, limit)?);
        }
        QueryKind::Class => {
            results.classes =
                shape_classes(db.search_classes(&pattern, MatchField::Name, project_id, limit)?);
        }
        QueryKind::Function => {
            results.functions = shape_functions(db.search_functions(
                &pattern,
                MatchField::Name,
                project_id,
                limit,
            )?);
        }
        QueryKind::Variable => {
            results.variables = shape_variables(db.search_variables(&pattern, project_id, limit)?);
        }
        QueryKind::Import => {
            results.modules = db
                .search_imports(&pattern, project_id, limit)?
                .into_iter()
                .map(|(import, module_name, path)| ModuleHit {
                    id: import.module_id,
                    name: import.statement(),
                    path,
                    docstring: Some(format!("Import in {module_name}")),
                })
                .collect();
        }
        QueryKind::Docstring => {
            let field = MatchField::Docstring;
            results.modules = shape_modules(db.search_modules(&pattern, field, project_id, limit)?);
            results.classes = shape_classes(db.search_classes(&pattern, field, project_id, limit)?);
            results.functions =
                shape_functions(db.search_functions(&pattern, field, project_id, limit)?);
        }
    }
    Ok(results)
}

fn shape_modules(hits: Vec<ModuleHit>) -> Vec<ModuleHit> {
    hits.into_iter()
        .map(|mut h| {
            h.docstring = truncate(h.docstring.as_deref(), DOCSTRING_MAX);
            h
        })
        .collect()
}

fn shape_classes(hits: Vec<ClassHit>) -> Vec<ClassHit> {
    hits.into_iter()
        .map(|mut h| {
            h.docstring = truncate(h.docstring.as_deref(), DOCSTRING_MAX);
            h
        })
        .collect()
}

fn shape_functions(hits: Vec<FunctionHit>) -> Vec<FunctionHit> {
    hits.into_iter()
        .map(|mut h| {
            h.docstring = truncate(h.docstring.as_deref(), DOCSTRING_MAX);
            h
        })
        .collect()
}

fn shape_variables(hits: Vec<VariableHit>) -> Vec<VariableHit> {
    hits.into_iter()
        .map(|mut h| {
            h.value = truncate(h.value.as_deref(), VALUE_MAX);
            h
        })
        .collect()
}

// ─── Display formatting ───

/// One search hit flattened for display (MCP `search_code`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedHit {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
}

/// Flatten grouped results in category order: modules, classes,
/// functions, variables.
#[must_use]
pub fn format_hits(results: &SearchResults) -> Vec<FormattedHit> {
    let mut out = Vec::with_capacity(results.len());

    for m in &results.modules {
        out.push(FormattedHit {
            kind: "module",
            name: m.name.clone(),
            path: m.path.clone(),
            location: None,
            description: m
                .docstring
                .clone()
                .unwrap_or_else(|| format!("Module {}", m.name)),
        });
    }

    for c in &results.classes {
        out.push(FormattedHit {
            kind: "class",
            name: c.name.clone(),
            path: c.path.clone(),
            location: Some(Location { line: c.lineno }),
            description: c
                .docstring
                .clone()
                .unwrap_or_else(|| format!("Class {} in {}", c.name, c.module_name)),
        });
    }

    for f in &results.functions {
        let (kind, label, name) = match &f.class_name {
            Some(class) => ("method", "Method", format!("{class}.{}", f.name)),
            None => ("function", "Function", f.name.clone()),
        };
        out.push(FormattedHit {
            kind,
            description: f
                .docstring
                .clone()
                .unwrap_or_else(|| format!("{label} {name} in {}", f.module_name)),
            name,
            path: f.path.clone(),
            location: Some(Location { line: f.lineno }),
        });
    }

    for v in &results.variables {
        out.push(FormattedHit {
            kind: "variable",
            name: v.name.clone(),
            path: v.path.clone(),
            location: Some(Location { line: v.lineno }),
            description: match &v.value {
                Some(value) => format!("Variable {} = {value}", v.name),
                None => format!("Variable {}", v.name),
            },
        });
    }

    out
}
