//! Single-file view: current source text plus the indexed elements in it.

use serde::Serialize;

use crate::db::Database;
use crate::error::Result;

/// An indexed file with its elements ordered by line.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub path: String,
    /// Current file text, or an `Error reading file: ...` placeholder.
    pub content: String,
    pub elements: Vec<FileElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileElement {
    /// `function`, `class`, `method` or `variable`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Methods are named `Class.method`.
    pub name: String,
    pub lineno: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lineno: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Look up an indexed file by exact path. `Ok(None)` when it is not indexed.
///
/// The source is re-read from disk; a read failure degrades to placeholder
/// content and still returns the element list.
pub fn get_file_content(db: &Database, path: &str) -> Result<Option<FileView>> {
    db.read_transaction(|db| {
        let Some(module) = db.get_module_by_path(path)? else {
            return Ok(None);
        };

        let content = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path, error = %e, "cannot read indexed file");
                format!("Error reading file: {e}")
            }
        };

        let mut elements = Vec::new();
        for func in db.get_top_level_functions(module.id)? {
            elements.push(FileElement {
                kind: "function",
                name: func.name,
                lineno: func.lineno,
                end_lineno: Some(func.end_lineno),
                docstring: func.docstring,
                value: None,
            });
        }
        for class in db.get_classes_for_module(module.id)? {
            let methods = db.get_methods(class.id)?;
            elements.push(FileElement {
                kind: "class",
                name: class.name.clone(),
                lineno: class.lineno,
                end_lineno: Some(class.end_lineno),
                docstring: class.docstring,
                value: None,
            });
            for method in methods {
                elements.push(FileElement {
                    kind: "method",
                    name: format!("{}.{}", class.name, method.name),
                    lineno: method.lineno,
                    end_lineno: Some(method.end_lineno),
                    docstring: method.docstring,
                    value: None,
                });
            }
        }
        for var in db.get_variables_for_module(module.id)? {
            elements.push(FileElement {
                kind: "variable",
                name: var.name,
                lineno: var.lineno,
                end_lineno: None,
                docstring: None,
                value: var.value,
            });
        }

        // stable: equal lines keep the order above
        elements.sort_by_key(|e| e.lineno);

        Ok(Some(FileView {
            path: path.to_string(),
            content,
            elements,
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::index_project;
    use crate::models::description::{
        ClassDescription, FunctionDescription, ModuleDescription, VariableDescription,
    };
    use tempfile::TempDir;

    fn func(name: &str, lineno: u32) -> FunctionDescription {
        FunctionDescription {
            name: name.into(),
            lineno,
            end_lineno: lineno + 1,
            ..Default::default()
        }
    }

    fn layout(path: &str) -> ModuleDescription {
        ModuleDescription {
            path: path.into(),
            functions: vec![func("main", 10)],
            classes: vec![ClassDescription {
                name: "Widget".into(),
                docstring: Some("A widget.".into()),
                lineno: 5,
                end_lineno: 8,
                methods: vec![func("render", 7)],
                ..Default::default()
            }],
            variables: vec![VariableDescription {
                name: "VERSION".into(),
                lineno: 1,
                value: Some("'1.0'".into()),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn elements_are_ordered_by_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("widgets.py");
        std::fs::write(&path, "VERSION = '1.0'\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let db = Database::open_in_memory().unwrap();
        index_project(&db, "t", "/t", &[layout(&path)]).unwrap();

        let view = get_file_content(&db, &path).unwrap().unwrap();
        assert_eq!(view.content, "VERSION = '1.0'\n");
        let order: Vec<(&str, &str, u32)> = view
            .elements
            .iter()
            .map(|e| (e.kind, e.name.as_str(), e.lineno))
            .collect();
        assert_eq!(
            order,
            vec![
                ("variable", "VERSION", 1),
                ("class", "Widget", 5),
                ("method", "Widget.render", 7),
                ("function", "main", 10),
            ]
        );
        assert!(view.elements[0].end_lineno.is_none());
        assert_eq!(view.elements[0].value.as_deref(), Some("'1.0'"));
        assert_eq!(view.elements[1].docstring.as_deref(), Some("A widget."));
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let db = Database::open_in_memory().unwrap();
        let module = ModuleDescription {
            path: "/t/tie.py".into(),
            functions: vec![func("f", 3)],
            variables: vec![VariableDescription {
                name: "v".into(),
                lineno: 3,
                value: None,
            }],
            ..Default::default()
        };
        index_project(&db, "t", "/t", &[module]).unwrap();
        let view = get_file_content(&db, "/t/tie.py").unwrap().unwrap();
        let kinds: Vec<&str> = view.elements.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["function", "variable"]);
    }

    #[test]
    fn unindexed_path_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(get_file_content(&db, "/nowhere.py").unwrap().is_none());
    }

    #[test]
    fn unreadable_file_degrades_to_placeholder() {
        let db = Database::open_in_memory().unwrap();
        index_project(&db, "t", "/t", &[layout("/t/gone/widgets.py")]).unwrap();
        let view = get_file_content(&db, "/t/gone/widgets.py").unwrap().unwrap();
        assert!(view.content.starts_with("Error reading file: "));
        assert_eq!(view.elements.len(), 4);
    }

    #[test]
    fn variables_serialize_without_end_line() {
        let element = FileElement {
            kind: "variable",
            name: "X".into(),
            lineno: 1,
            end_lineno: None,
            docstring: None,
            value: Some("1".into()),
        };
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"type":"variable","name":"X","lineno":1,"value":"1"}"#);
    }
}
