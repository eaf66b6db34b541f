//! Shared operations used by both CLI and MCP server.
//!
//! Keeps the query and formatting logic in one place so `main.rs` and
//! `mcp/server.rs` return the same shapes.

pub mod file_view;
pub mod index;
pub mod projects;
pub mod search;

pub use file_view::{get_file_content, FileElement, FileView};
pub use index::IndexOutput;
pub use projects::{get_project, get_projects, ProjectSummary};
pub use search::{format_hits, search_code, FormattedHit, Location};
