//! MCP server implementation using rmcp.
//!
//! Exposes indexing, search, file view and the project registry as MCP
//! tools over stdio. Each tool calls the same operations as the CLI.

use std::path::PathBuf;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ServerHandler, ServiceExt};
use serde::Serialize;
use serde_json::json;

use crate::cli::output::format_error;
use crate::config::Config;
use crate::db::Database;
use crate::error::PyIndexError;
use crate::indexer::{self, IndexRequest};
use crate::operations;

use super::tools::{FileContentParams, IndexDirectoryParams, ProjectParams, SearchCodeParams};

/// The pyindex MCP server.
///
/// Holds the resolved config. The database is opened for each tool call so
/// every call gets its own connection and transaction.
#[derive(Clone)]
pub struct PyIndexServer {
    config: Config,
    tool_router: ToolRouter<Self>,
}

// ── Helper functions ────────────────────────────────────────────

impl PyIndexServer {
    fn open_db(&self) -> Result<Database, String> {
        Database::open(&self.config.db_path).map_err(|e| format_error(&e))
    }

    fn to_json<T: Serialize>(val: &T) -> String {
        serde_json::to_string(val).unwrap_or_else(|e| format_error(&e))
    }

    /// Tool list, for inspection and tests.
    #[must_use]
    pub fn get_tool_router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }
}

// ── Tool implementations ────────────────────────────────────────

#[tool_router]
impl PyIndexServer {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    // ─── Indexing ───────────────────────────────────────────────

    #[tool(
        description = "Index all Python files in a directory. Re-indexing replaces each file's previous entries. Returns project_id, file_count and per-file errors."
    )]
    pub async fn index_directory(
        &self,
        Parameters(params): Parameters<IndexDirectoryParams>,
    ) -> String {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return e,
        };
        let request = IndexRequest {
            directory: PathBuf::from(&params.directory),
            name: params.project_name,
        };
        match indexer::run_index(&db, &request, &self.config.settings.indexing) {
            Ok(result) => {
                let output: operations::IndexOutput = result.into();
                Self::to_json(&output)
            }
            Err(PyIndexError::DirectoryNotFound { .. }) => {
                format_error(&format!("Directory not found: {}", params.directory))
            }
            Err(e) => format_error(&format!("Error indexing directory: {e}")),
        }
    }

    // ─── Search ─────────────────────────────────────────────────

    #[tool(
        description = "Search indexed Python code. Free text matches module/class/function names and docstrings and variable names. Use `class:Name`, `function:name`, `method:name`, `module:name`, `var:name`, `import:module` or `doc:text` to narrow the search."
    )]
    pub async fn search_code(&self, Parameters(params): Parameters<SearchCodeParams>) -> String {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return e,
        };
        let limit = params
            .limit
            .unwrap_or(self.config.settings.search.default_limit);

        match operations::search_code(&db, &params.query, params.project_id, limit) {
            Ok(results) => Self::to_json(&json!({
                "query": params.query,
                "results": operations::format_hits(&results),
            })),
            Err(e) => format_error(&format!("Error searching code: {e}")),
        }
    }

    // ─── File view ──────────────────────────────────────────────

    #[tool(
        description = "Get the current content of an indexed Python file together with its functions, classes, methods and variables ordered by line."
    )]
    pub async fn get_file_content(
        &self,
        Parameters(params): Parameters<FileContentParams>,
    ) -> String {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return e,
        };
        match operations::get_file_content(&db, &params.path) {
            Ok(Some(view)) => Self::to_json(&view),
            Ok(None) => format_error(&format!("File not found or not indexed: {}", params.path)),
            Err(e) => format_error(&format!("Error getting file content: {e}")),
        }
    }

    // ─── Projects ───────────────────────────────────────────────

    #[tool(description = "List all indexed projects with their file counts.")]
    pub async fn list_projects(&self) -> String {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return e,
        };
        match operations::get_projects(&db) {
            Ok(projects) => Self::to_json(&json!({ "projects": projects })),
            Err(e) => format_error(&format!("Error getting projects: {e}")),
        }
    }

    #[tool(description = "Get one indexed project by ID.")]
    pub async fn get_project(&self, Parameters(params): Parameters<ProjectParams>) -> String {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return e,
        };
        match operations::get_project(&db, params.project_id) {
            Ok(Some(project)) => Self::to_json(&project),
            Ok(None) => format_error(&PyIndexError::ProjectNotFound {
                id: params.project_id,
            }),
            Err(e) => format_error(&format!("Error getting project: {e}")),
        }
    }
}

// ── ServerHandler trait implementation ──────────────────────────

#[tool_handler]
impl ServerHandler for PyIndexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "pyindex: structured catalog of Python code. \
                 Call index_directory once per source tree, then search_code to find modules, \
                 classes, functions, methods and variables. Narrow searches with kind prefixes \
                 (class:, function:, method:, module:, var:, import:, doc:). \
                 Use get_file_content with a path from a search hit to read the file and its elements. \
                 list_projects and get_project show what has been indexed."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ── Server startup ──────────────────────────────────────────────

/// Start the MCP server on stdio transport.
pub async fn start_mcp_server(config: Config) -> crate::error::Result<()> {
    tracing::info!(db = %config.db_path.display(), "starting pyindex MCP server");

    let server = PyIndexServer::new(config);

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| PyIndexError::Other(format!("MCP server error: {e}")))?;

    tracing::info!("MCP server running on stdio");

    service
        .waiting()
        .await
        .map_err(|e| PyIndexError::Other(format!("MCP server error: {e}")))?;

    Ok(())
}
