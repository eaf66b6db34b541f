use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::IndexingSettings;
use crate::db::Database;
use crate::error::{PyIndexError, Result};
use crate::ingest::python::PythonAnalyzer;
use crate::ingest::scanner::Scanner;
use crate::models::description::ModuleDescription;

/// Write parsed modules into the catalog under one project.
///
/// The project is resolved by exact `root_path` (an existing project keeps
/// its stored name). Each module is upserted by `(project, path)`; an
/// existing module loses all its child rows before the new ones go in, so
/// repeated runs with the same input leave the same catalog. The whole call
/// is one transaction.
pub fn index_project(
    db: &Database,
    name: &str,
    root_path: &str,
    modules: &[ModuleDescription],
) -> Result<i64> {
    db.write_transaction(|db| {
        let project_id = match db.find_project_by_root(root_path)? {
            Some(project) => {
                db.touch_project(project.id)?;
                project.id
            }
            None => db.insert_project(name, root_path)?,
        };

        for module in modules {
            index_module(db, project_id, module)?;
        }

        tracing::info!(project_id, modules = modules.len(), "indexed project");
        Ok(project_id)
    })
}

fn index_module(db: &Database, project_id: i64, module: &ModuleDescription) -> Result<i64> {
    let name = module.module_name();
    let docstring = module.docstring.as_deref();

    let module_id = match db.find_module(project_id, &module.path)? {
        Some(existing) => {
            db.clear_module_children(existing.id)?;
            db.update_module(existing.id, &name, docstring)?;
            existing.id
        }
        None => db.insert_module(project_id, &name, &module.path, docstring)?,
    };

    for import in &module.imports {
        db.insert_import(module_id, import)?;
    }
    for var in module.unique_variables() {
        db.insert_variable(module_id, var)?;
    }
    for class in &module.classes {
        let class_id = db.insert_class(module_id, class)?;
        for method in &class.methods {
            db.insert_function(module_id, Some(class_id), method)?;
        }
    }
    for func in &module.functions {
        db.insert_function(module_id, None, func)?;
    }
    db.stamp_module_indexed(module_id)?;

    tracing::debug!(
        path = %module.path,
        imports = module.imports.len(),
        classes = module.classes.len(),
        functions = module.functions.len(),
        "indexed module"
    );
    Ok(module_id)
}

/// What to index.
#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub directory: PathBuf,
    /// Display name; defaults to the directory's final component.
    pub name: Option<String>,
}

/// Outcome of a scan-analyze-index run.
#[derive(Debug, Clone, Default)]
pub struct IndexResult {
    /// `None` when no Python files were found.
    pub project_id: Option<i64>,
    pub project_name: String,
    pub root_path: String,
    pub files_scanned: usize,
    pub files_indexed: usize,
    /// Per-file read/parse failures; those files are left out.
    pub errors: Vec<String>,
    pub message: String,
}

/// Scan a directory, analyze every Python file and index the results.
pub fn run_index(
    db: &Database,
    request: &IndexRequest,
    settings: &IndexingSettings,
) -> Result<IndexResult> {
    let root = resolve_root(&request.directory)?;
    let root_path = root.to_string_lossy().into_owned();
    let project_name = request.name.clone().unwrap_or_else(|| default_name(&root));

    let scanned = Scanner::with_settings(&root, settings).scan()?;
    let mut result = IndexResult {
        project_name: project_name.clone(),
        root_path: root_path.clone(),
        files_scanned: scanned.len(),
        ..Default::default()
    };
    if scanned.is_empty() {
        result.message = "No Python files found".into();
        tracing::info!(root = %root_path, "no Python files found");
        return Ok(result);
    }

    let analyzer = PythonAnalyzer::new();
    let outcomes: Vec<std::result::Result<ModuleDescription, String>> = scanned
        .par_iter()
        .map(|path| {
            analyzer
                .analyze_file(path)
                .map_err(|e| format!("{}: {e}", path.display()))
        })
        .collect();

    let mut modules = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(module) => modules.push(module),
            Err(e) => {
                tracing::warn!(error = %e, "skipping file");
                result.errors.push(e);
            }
        }
    }

    let project_id = index_project(db, &project_name, &root_path, &modules)?;
    result.project_id = Some(project_id);
    result.files_indexed = modules.len();
    result.message = format!(
        "Indexed {} of {} Python files",
        result.files_indexed, result.files_scanned
    );
    tracing::info!(
        project_id,
        indexed = result.files_indexed,
        failed = result.errors.len(),
        "index run complete"
    );
    Ok(result)
}

fn resolve_root(directory: &Path) -> Result<PathBuf> {
    if !directory.is_dir() {
        return Err(PyIndexError::DirectoryNotFound {
            path: directory.display().to_string(),
        });
    }
    Ok(directory.canonicalize()?)
}

fn default_name(root: &Path) -> String {
    root.file_name().map_or_else(
        || root.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    )
}
