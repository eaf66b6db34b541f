use serde::Serialize;

/// An indexed source tree.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRecord {
    pub id: i64,
    pub name: String,
    /// Absolute root path; unique across the catalog.
    pub root_path: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One indexed source file.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRecord {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub path: String,
    pub docstring: Option<String>,
    pub last_indexed: String,
}

/// A module-level function (`class_id` is `None`) or a method.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionRecord {
    pub id: i64,
    pub module_id: i64,
    pub class_id: Option<i64>,
    pub name: String,
    pub docstring: Option<String>,
    pub lineno: u32,
    pub end_lineno: u32,
    pub args: Vec<String>,
    pub decorators: Vec<String>,
    pub return_annotation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassRecord {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub docstring: Option<String>,
    pub lineno: u32,
    pub end_lineno: u32,
    pub base_classes: Vec<String>,
    pub decorators: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRecord {
    pub id: i64,
    pub module_id: i64,
    pub module_name: String,
    pub alias: Option<String>,
    pub is_from_import: bool,
    pub parent_module: Option<String>,
}

impl ImportRecord {
    /// Render as the import statement it came from.
    #[must_use]
    pub fn statement(&self) -> String {
        let mut out = if self.is_from_import {
            format!(
                "from {} import {}",
                self.parent_module.as_deref().unwrap_or_default(),
                self.module_name
            )
        } else {
            format!("import {}", self.module_name)
        };
        if let Some(alias) = &self.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableRecord {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub lineno: u32,
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(name: &str, alias: Option<&str>, parent: Option<&str>) -> ImportRecord {
        ImportRecord {
            id: 1,
            module_id: 1,
            module_name: name.into(),
            alias: alias.map(String::from),
            is_from_import: parent.is_some(),
            parent_module: parent.map(String::from),
        }
    }

    #[test]
    fn plain_import_statement() {
        assert_eq!(import("os", None, None).statement(), "import os");
        assert_eq!(
            import("numpy", Some("np"), None).statement(),
            "import numpy as np"
        );
    }

    #[test]
    fn from_import_statement() {
        assert_eq!(
            import("Path", None, Some("pathlib")).statement(),
            "from pathlib import Path"
        );
        assert_eq!(
            import("defaultdict", Some("dd"), Some("collections")).statement(),
            "from collections import defaultdict as dd"
        );
    }
}
