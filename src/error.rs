use thiserror::Error;

#[derive(Error, Debug)]
pub enum PyIndexError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("project not found: {id}")]
    ProjectNotFound { id: i64 },

    #[error("parse error in {path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("no .gitignore file found in {path}")]
    MissingGitignore { path: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PyIndexError>;
