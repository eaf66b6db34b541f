use serde::Serialize;

/// Search results grouped by category.
///
/// All four categories are always present, even when empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub modules: Vec<ModuleHit>,
    pub classes: Vec<ClassHit>,
    pub functions: Vec<FunctionHit>,
    pub variables: Vec<VariableHit>,
}

impl SearchResults {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
            && self.classes.is_empty()
            && self.functions.is_empty()
            && self.variables.is_empty()
    }

    /// Total hits across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len() + self.classes.len() + self.functions.len() + self.variables.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHit {
    pub id: i64,
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassHit {
    pub id: i64,
    pub name: String,
    pub module_name: String,
    pub path: String,
    pub lineno: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionHit {
    pub id: i64,
    pub name: String,
    pub module_name: String,
    /// Owning class for methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub path: String,
    pub lineno: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableHit {
    pub id: i64,
    pub name: String,
    pub module_name: String,
    pub path: String,
    pub lineno: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_serialize_all_categories() {
        let json = serde_json::to_string(&SearchResults::default()).unwrap();
        assert_eq!(
            json,
            r#"{"modules":[],"classes":[],"functions":[],"variables":[]}"#
        );
    }

    #[test]
    fn absent_class_name_is_omitted() {
        let hit = FunctionHit {
            id: 1,
            name: "run".into(),
            module_name: "app".into(),
            class_name: None,
            path: "/p/app.py".into(),
            lineno: 3,
            docstring: None,
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(!json.contains("class_name"));
        assert!(!json.contains("docstring"));
    }
}
