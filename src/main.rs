// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_wraps,
    clippy::needless_pass_by_value
)]

use std::path::PathBuf;

use clap::Parser;

use pyindex::cli::commands::{Cli, Command};
use pyindex::cli::output;
use pyindex::config::Config;
use pyindex::db::Database;
use pyindex::error::PyIndexError;
use pyindex::indexer::{self, IndexRequest};
use pyindex::{logging, operations};

fn main() {
    let cli = Cli::parse();

    let default_filter = if matches!(cli.command, Command::Serve) {
        "info"
    } else {
        "warn"
    };
    logging::init(default_filter);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::fmt::Display>> {
    let config = get_config(cli.db)?;
    match cli.command {
        Command::Index { directory, name } => cmd_index(&config, directory, name),
        Command::Search {
            query,
            project,
            limit,
        } => cmd_search(&config, &query, project, limit),
        Command::View { path } => cmd_view(&config, &path),
        Command::Projects => cmd_projects(&config),
        Command::Project { id } => cmd_project(&config, id),
        Command::Serve => cmd_serve(config),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config(db: Option<PathBuf>) -> Result<Config, Box<dyn std::fmt::Display>> {
    Config::resolve(db).map_err(map_err)
}

fn get_db(config: &Config) -> Result<Database, Box<dyn std::fmt::Display>> {
    Database::open(&config.db_path).map_err(map_err)
}

fn cmd_index(config: &Config, directory: PathBuf, name: Option<String>) -> CmdResult {
    let db = get_db(config)?;
    let request = IndexRequest { directory, name };

    let result = indexer::run_index(&db, &request, &config.settings.indexing).map_err(map_err)?;
    let output: operations::IndexOutput = result.into();
    println!("{}", output::format_json(&output));
    Ok(())
}

fn cmd_search(
    config: &Config,
    query: &str,
    project: Option<i64>,
    limit: Option<usize>,
) -> CmdResult {
    let db = get_db(config)?;
    let limit = limit.unwrap_or(config.settings.search.default_limit);

    let results = operations::search_code(&db, query, project, limit).map_err(map_err)?;
    println!("{}", output::format_json(&results));
    Ok(())
}

fn cmd_view(config: &Config, path: &str) -> CmdResult {
    let db = get_db(config)?;
    // Catalog paths are absolute; resolve relative input against the cwd.
    let resolved = std::fs::canonicalize(path)
        .map_or_else(|_| path.to_string(), |p| p.to_string_lossy().into_owned());

    match operations::get_file_content(&db, &resolved).map_err(map_err)? {
        Some(view) => {
            println!("{}", output::format_json(&view));
            Ok(())
        }
        None => Err(map_err(format!("File not found or not indexed: {path}"))),
    }
}

fn cmd_projects(config: &Config) -> CmdResult {
    let db = get_db(config)?;
    let projects = operations::get_projects(&db).map_err(map_err)?;
    println!("{}", output::format_json(&projects));
    Ok(())
}

fn cmd_project(config: &Config, id: i64) -> CmdResult {
    let db = get_db(config)?;
    match operations::get_project(&db, id).map_err(map_err)? {
        Some(project) => {
            println!("{}", output::format_json(&project));
            Ok(())
        }
        None => Err(map_err(PyIndexError::ProjectNotFound { id })),
    }
}

fn cmd_serve(config: Config) -> CmdResult {
    let rt = tokio::runtime::Runtime::new().map_err(map_err)?;
    rt.block_on(async {
        pyindex::mcp::start_mcp_server(config)
            .await
            .map_err(map_err)
    })
}
