//! MCP server tests.
//!
//! Tests the MCP server's public interface and calls each tool directly.
//! For the same operations through the CLI, see e2e_tests.rs.

use std::fs;
use std::path::PathBuf;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::ServerHandler;
use serde_json::Value;
use tempfile::TempDir;

use pyindex::config::Config;
use pyindex::mcp::server::PyIndexServer;
use pyindex::mcp::tools::{
    FileContentParams, IndexDirectoryParams, ProjectParams, SearchCodeParams,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Test Setup Helpers
// ═══════════════════════════════════════════════════════════════════════════════

struct Fixture {
    _tmp: TempDir,
    project: PathBuf,
    server: PyIndexServer,
}

/// Temp project with one Python file and a server on a fresh catalog.
fn setup() -> Fixture {
    let tmp = TempDir::new().expect("create tempdir");
    let project = tmp.path().join("shop");
    fs::create_dir_all(&project).expect("create project dir");
    fs::write(
        project.join("cart.py"),
        r#""""Shopping cart."""

TAX_RATE = 0.2


class Cart:
    """Holds line items."""

    def add(self, item, qty=1):
        pass


def checkout(cart):
    """Charge the customer."""
    return cart
"#,
    )
    .expect("write test file");

    let config = Config::with_db_path(tmp.path().join("catalog").join("pyindex.db"));
    Fixture {
        _tmp: tmp,
        project,
        server: PyIndexServer::new(config),
    }
}

async fn index(fx: &Fixture) -> Value {
    let out = fx
        .server
        .index_directory(Parameters(IndexDirectoryParams {
            directory: fx.project.to_string_lossy().into_owned(),
            project_name: Some("shop".into()),
        }))
        .await;
    serde_json::from_str(&out).expect("index output is JSON")
}

async fn search(fx: &Fixture, query: &str) -> Value {
    let out = fx
        .server
        .search_code(Parameters(SearchCodeParams {
            query: query.into(),
            project_id: None,
            limit: None,
        }))
        .await;
    serde_json::from_str(&out).expect("search output is JSON")
}

fn bare_server() -> PyIndexServer {
    PyIndexServer::new(Config::with_db_path("/tmp/pyindex-test/pyindex.db"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. ServerHandler Implementation Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_server_info() {
    let info = bare_server().get_info();

    let instructions = info.instructions.expect("instructions");
    assert!(instructions.contains("pyindex"));
    assert!(instructions.contains("search_code"));
    assert!(instructions.contains("class:"));
}

#[test]
fn test_server_capabilities() {
    let info = bare_server().get_info();
    assert!(info.capabilities.tools.is_some());
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. Tool List Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_tool_list() {
    let server = bare_server();
    let tools = server.get_tool_router().list_all();

    let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "get_file_content",
            "get_project",
            "index_directory",
            "list_projects",
            "search_code",
        ]
    );
}

#[test]
fn test_tools_have_descriptions() {
    let server = bare_server();
    for tool in server.get_tool_router().list_all() {
        let description = tool.description.as_deref().unwrap_or_default();
        assert!(!description.is_empty(), "{} has no description", tool.name);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. Tool Call Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_index_directory() {
    let fx = setup();
    let json = index(&fx).await;

    assert_eq!(json["project_id"], 1);
    assert_eq!(json["project_name"], "shop");
    assert_eq!(json["file_count"], 1);
}

#[tokio::test]
async fn test_index_missing_directory() {
    let fx = setup();
    let missing = fx.project.join("nope").to_string_lossy().into_owned();
    let out = fx
        .server
        .index_directory(Parameters(IndexDirectoryParams {
            directory: missing.clone(),
            project_name: None,
        }))
        .await;

    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["error"], format!("Directory not found: {missing}"));
}

#[tokio::test]
async fn test_search_code_free_text() {
    let fx = setup();
    index(&fx).await;

    let json = search(&fx, "cart").await;
    assert_eq!(json["query"], "cart");

    let hits = json["results"].as_array().unwrap();
    let kinds: Vec<(&str, &str)> = hits
        .iter()
        .map(|h| (h["type"].as_str().unwrap(), h["name"].as_str().unwrap()))
        .collect();
    assert!(kinds.contains(&("module", "cart")));
    assert!(kinds.contains(&("class", "Cart")));
    assert!(!kinds.iter().any(|(kind, _)| *kind == "variable"));
}

#[tokio::test]
async fn test_search_code_docstring() {
    let fx = setup();
    index(&fx).await;

    let json = search(&fx, "doc:customer").await;
    let hits = json["results"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "checkout");
    assert_eq!(hits[0]["description"], "Charge the customer.");
}

#[tokio::test]
async fn test_search_code_method_hit() {
    let fx = setup();
    index(&fx).await;

    let json = search(&fx, "method:add").await;
    let hits = json["results"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["type"], "method");
    assert_eq!(hits[0]["name"], "Cart.add");
    assert_eq!(hits[0]["location"]["line"], 9);
    assert_eq!(hits[0]["description"], "Method Cart.add in cart");
}

#[tokio::test]
async fn test_search_code_variable_description() {
    let fx = setup();
    index(&fx).await;

    let json = search(&fx, "var:TAX").await;
    let hits = json["results"].as_array().unwrap();
    assert_eq!(hits[0]["description"], "Variable TAX_RATE = 0.2");
}

#[tokio::test]
async fn test_search_code_empty_catalog() {
    let fx = setup();
    let json = search(&fx, "anything").await;
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_file_content() {
    let fx = setup();
    index(&fx).await;

    let path = fx
        .project
        .canonicalize()
        .unwrap()
        .join("cart.py")
        .to_string_lossy()
        .into_owned();
    let out = fx
        .server
        .get_file_content(Parameters(FileContentParams { path: path.clone() }))
        .await;
    let json: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["path"], path);
    assert!(json["content"].as_str().unwrap().contains("class Cart:"));
    let names: Vec<&str> = json["elements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["TAX_RATE", "Cart", "Cart.add", "checkout"]);
}

#[tokio::test]
async fn test_get_file_content_not_indexed() {
    let fx = setup();
    let out = fx
        .server
        .get_file_content(Parameters(FileContentParams {
            path: "/not/indexed.py".into(),
        }))
        .await;
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["error"], "File not found or not indexed: /not/indexed.py");
}

#[tokio::test]
async fn test_list_projects() {
    let fx = setup();
    let empty: Value = serde_json::from_str(&fx.server.list_projects().await).unwrap();
    assert!(empty["projects"].as_array().unwrap().is_empty());

    index(&fx).await;
    let json: Value = serde_json::from_str(&fx.server.list_projects().await).unwrap();
    let projects = json["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "shop");
    assert_eq!(projects[0]["file_count"], 1);
}

#[tokio::test]
async fn test_get_project() {
    let fx = setup();
    index(&fx).await;

    let out = fx
        .server
        .get_project(Parameters(ProjectParams { project_id: 1 }))
        .await;
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "shop");

    let out = fx
        .server
        .get_project(Parameters(ProjectParams { project_id: 7 }))
        .await;
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["error"], "project not found: 7");
}
