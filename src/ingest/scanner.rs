use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::config::IndexingSettings;
use crate::error::{PyIndexError, Result};

/// File scanner that respects .gitignore and only yields `*.py` files.
pub struct Scanner {
    root: PathBuf,
    settings: IndexingSettings,
}

impl Scanner {
    /// Scanner with no exclude patterns and no size cap.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_settings(
            root,
            &IndexingSettings {
                exclude_patterns: Vec::new(),
                max_file_size_mb: 0,
                require_gitignore: false,
            },
        )
    }

    /// Create a scanner configured from indexing settings.
    pub fn with_settings(root: impl Into<PathBuf>, settings: &IndexingSettings) -> Self {
        Self {
            root: root.into(),
            settings: settings.clone(),
        }
    }

    /// Scan the root, returning absolute Python file paths sorted by path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PyIndexError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }
        if self.settings.require_gitignore && !self.root.join(".gitignore").is_file() {
            return Err(PyIndexError::MissingGitignore {
                path: self.root.display().to_string(),
            });
        }

        let entries: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(true) // skip hidden dirs like .git
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            // honor .gitignore even when the root is not a git checkout
            .require_git(false)
            .follow_links(false)
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !matches!(
                    name.as_ref(),
                    "__pycache__"
                        | ".git"
                        | ".venv"
                        | "venv"
                        | ".tox"
                        | ".mypy_cache"
                        | ".pytest_cache"
                        | "node_modules"
                        | "build"
                        | "dist"
                        | "site-packages"
                )
            })
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .filter(|e| is_python_file(e.path()))
            .map(ignore::DirEntry::into_path)
            .filter(|p| !self.is_excluded(p))
            .collect();

        let max_size = self.settings.max_file_size_bytes();
        let mut files: Vec<PathBuf> = entries
            .into_par_iter()
            .filter(|path| {
                let Ok(meta) = path.metadata() else {
                    return false;
                };
                if max_size > 0 && meta.len() > max_size {
                    tracing::debug!(
                        path = %path.display(),
                        size = meta.len(),
                        "skipping oversized file"
                    );
                    return false;
                }
                true
            })
            .collect();

        files.sort();
        tracing::debug!(root = %self.root.display(), count = files.len(), "scan complete");
        Ok(files)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        self.settings.should_exclude(rel)
    }
}

/// `*.py` check on the extension.
#[must_use]
pub fn is_python_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "py")
}
