//! MCP tool parameter types.
//!
//! Each struct corresponds to the input parameters for one MCP tool.
//! All parameter structs derive `Deserialize` and `JsonSchema` as required by rmcp.

use rmcp::schemars;
use serde::Deserialize;

// ── Index ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IndexDirectoryParams {
    #[schemars(description = "Path to the directory to index")]
    pub directory: String,
    #[schemars(description = "Project name (default: directory name)")]
    pub project_name: Option<String>,
}

// ── Search ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchCodeParams {
    #[schemars(
        description = "Free-text query, or `kind:term` with kind one of module, class, function, method, var, variable, import, doc, docstring"
    )]
    pub query: String,
    #[schemars(description = "Restrict results to this project ID")]
    pub project_id: Option<i64>,
    #[schemars(description = "Maximum results per category (default: 20)")]
    pub limit: Option<usize>,
}

// ── File content ────────────────────────────────────────────────

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FileContentParams {
    #[schemars(description = "Absolute path of an indexed file")]
    pub path: String,
}

// ── Projects ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProjectParams {
    #[schemars(description = "Project ID")]
    pub project_id: i64,
}
