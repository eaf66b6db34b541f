//! Project registry listing.

use serde::Serialize;

use crate::db::Database;
use crate::error::Result;
use crate::models::catalog::ProjectRecord;

/// A project with its live module count.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: i64,
    pub name: String,
    pub root_path: String,
    pub file_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectSummary {
    fn new(project: ProjectRecord, file_count: u64) -> Self {
        Self {
            id: project.id,
            name: project.name,
            root_path: project.root_path,
            file_count,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Every project, ordered by ID.
pub fn get_projects(db: &Database) -> Result<Vec<ProjectSummary>> {
    db.read_transaction(|db| {
        Ok(db
            .project_summaries(None)?
            .into_iter()
            .map(|(project, count)| ProjectSummary::new(project, count))
            .collect())
    })
}

/// One project by ID, or `None` if it does not exist.
pub fn get_project(db: &Database, id: i64) -> Result<Option<ProjectSummary>> {
    db.read_transaction(|db| {
        Ok(db
            .project_summaries(Some(id))?
            .into_iter()
            .next()
            .map(|(project, count)| ProjectSummary::new(project, count)))
    })
}
