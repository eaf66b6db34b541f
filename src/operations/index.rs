//! Index output shared between CLI and MCP.

use serde::Serialize;

use crate::indexer::IndexResult;

/// Serializable summary of an index run.
///
/// Ensures CLI and MCP output the same fields.
#[derive(Debug, Clone, Serialize)]
pub struct IndexOutput {
    pub project_id: Option<i64>,
    pub project_name: String,
    pub root_path: String,
    pub files_scanned: usize,
    /// Number of modules written to the catalog.
    pub file_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub message: String,
}

impl From<IndexResult> for IndexOutput {
    fn from(result: IndexResult) -> Self {
        Self {
            project_id: result.project_id,
            project_name: result.project_name,
            root_path: result.root_path,
            files_scanned: result.files_scanned,
            file_count: result.files_indexed,
            errors: result.errors,
            message: result.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_output_from_result() {
        let result = IndexResult {
            project_id: Some(3),
            project_name: "demo".into(),
            root_path: "/srv/demo".into(),
            files_scanned: 10,
            files_indexed: 9,
            errors: vec!["/srv/demo/bad.py: io error".into()],
            message: "Indexed 9 of 10 Python files".into(),
        };
        let output: IndexOutput = result.into();
        assert_eq!(output.project_id, Some(3));
        assert_eq!(output.file_count, 9);
        assert_eq!(output.errors.len(), 1);
    }

    #[test]
    fn empty_errors_are_omitted() {
        let output: IndexOutput = IndexResult {
            message: "No Python files found".into(),
            ..Default::default()
        }
        .into();
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("errors").is_none());
        assert!(json["project_id"].is_null());
        assert_eq!(json["file_count"], 0);
    }
}
