//! Parsed-module descriptions handed to the indexer.
//!
//! These are produced by the analyzer (or any other caller) and consumed by
//! [`crate::indexer::index_project`]. Every optional field defaults, so a
//! description with only a `path` is valid input.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleDescription {
    /// Absolute file path; identity of the module within its project.
    pub path: String,
    pub docstring: Option<String>,
    pub imports: Vec<ImportDescription>,
    /// Top-level functions only. Methods live on their class.
    pub functions: Vec<FunctionDescription>,
    pub classes: Vec<ClassDescription>,
    /// Top-level name bindings. Last write per name wins.
    pub variables: Vec<VariableDescription>,
}

/// One imported name. `from x import a, b` produces two of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportDescription {
    pub name: String,
    pub alias: Option<String>,
    pub is_from_import: bool,
    pub parent_module: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionDescription {
    pub name: String,
    pub docstring: Option<String>,
    pub lineno: u32,
    pub end_lineno: u32,
    pub args: Vec<String>,
    pub decorators: Vec<String>,
    pub return_annotation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassDescription {
    pub name: String,
    pub docstring: Option<String>,
    pub lineno: u32,
    pub end_lineno: u32,
    pub base_classes: Vec<String>,
    pub decorators: Vec<String>,
    pub methods: Vec<FunctionDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableDescription {
    pub name: String,
    pub lineno: u32,
    pub value: Option<String>,
}

impl ModuleDescription {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Module name derived from the file stem (`/src/pkg/util.py` -> `util`).
    #[must_use]
    pub fn module_name(&self) -> String {
        Path::new(&self.path)
            .file_stem()
            .map_or_else(|| self.path.clone(), |s| s.to_string_lossy().into_owned())
    }

    /// Record a binding, replacing an earlier one with the same name in place.
    pub fn set_variable(&mut self, name: &str, lineno: u32, value: Option<String>) {
        if let Some(existing) = self.variables.iter_mut().find(|v| v.name == name) {
            existing.lineno = lineno;
            existing.value = value;
        } else {
            self.variables.push(VariableDescription {
                name: name.to_string(),
                lineno,
                value,
            });
        }
    }

    /// Variables with duplicate names collapsed: the last binding wins and
    /// keeps the position of the first.
    #[must_use]
    pub fn unique_variables(&self) -> Vec<&VariableDescription> {
        let mut out: Vec<&VariableDescription> = Vec::with_capacity(self.variables.len());
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for var in &self.variables {
            if let Some(&idx) = seen.get(var.name.as_str()) {
                out[idx] = var;
            } else {
                seen.insert(var.name.as_str(), out.len());
                out.push(var);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_is_file_stem() {
        let m = ModuleDescription::new("/srv/app/pkg/util.py");
        assert_eq!(m.module_name(), "util");
    }

    #[test]
    fn set_variable_replaces_in_place() {
        let mut m = ModuleDescription::new("/a.py");
        m.set_variable("A", 1, Some("1".into()));
        m.set_variable("B", 2, Some("2".into()));
        m.set_variable("A", 3, Some("int".into()));
        assert_eq!(m.variables.len(), 2);
        assert_eq!(m.variables[0].name, "A");
        assert_eq!(m.variables[0].lineno, 3);
        assert_eq!(m.variables[0].value.as_deref(), Some("int"));
    }

    #[test]
    fn unique_variables_last_write_wins() {
        let mut m = ModuleDescription::new("/a.py");
        m.variables = vec![
            VariableDescription {
                name: "X".into(),
                lineno: 1,
                value: Some("1".into()),
            },
            VariableDescription {
                name: "Y".into(),
                lineno: 2,
                value: None,
            },
            VariableDescription {
                name: "X".into(),
                lineno: 5,
                value: Some("2".into()),
            },
        ];
        let vars = m.unique_variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "X");
        assert_eq!(vars[0].lineno, 5);
        assert_eq!(vars[1].name, "Y");
    }

    #[test]
    fn deserializes_partial_description() {
        let m: ModuleDescription = serde_json::from_str(r#"{"path": "/x/empty.py"}"#).unwrap();
        assert_eq!(m.path, "/x/empty.py");
        assert!(m.docstring.is_none());
        assert!(m.imports.is_empty());
        assert!(m.classes.is_empty());
    }
}
