use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PyIndexError, Result};

/// Default data directory name under the user's home.
const DATA_DIR: &str = ".pyindex";
/// Default database filename.
const DB_FILE: &str = "pyindex.db";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Where the catalog lives and how it is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the database and `config.toml`.
    pub data_dir: PathBuf,
    /// Path to the `SQLite` catalog.
    pub db_path: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub search: SearchSettings,
    pub indexing: IndexingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Per-category result cap when the caller gives none.
    pub default_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_limit: 20 }
    }
}

/// Indexing-related settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Path fragments to exclude from scanning.
    pub exclude_patterns: Vec<String>,
    /// Maximum file size in MB to index (files larger are skipped).
    pub max_file_size_mb: u32,
    /// Refuse to index a directory without a root `.gitignore`.
    pub require_gitignore: bool,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                ".git/".into(),
                "__pycache__/".into(),
                ".venv/".into(),
                "venv/".into(),
                ".tox/".into(),
                "site-packages/".into(),
                "node_modules/".into(),
            ],
            max_file_size_mb: 10,
            require_gitignore: false,
        }
    }
}

impl Config {
    /// Create config rooted at a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let db_path = data_dir.join(DB_FILE);
        let config_path = data_dir.join(CONFIG_FILE);
        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            data_dir,
            db_path,
            config_path,
            settings,
        }
    }

    /// Config in the per-user data directory (`~/.pyindex`).
    pub fn default_location() -> Result<Self> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| PyIndexError::Config("cannot determine home directory".into()))?;
        Ok(Self::new(home.join(DATA_DIR)))
    }

    /// Config for an explicit database file. Settings are read from a
    /// `config.toml` next to it.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let data_dir = db_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let mut config = Self::new(data_dir);
        config.db_path = db_path;
        config
    }

    /// `with_db_path` when a path is given, otherwise the default location.
    pub fn resolve(db_path: Option<PathBuf>) -> Result<Self> {
        match db_path {
            Some(path) => Ok(Self::with_db_path(path)),
            None => Self::default_location(),
        }
    }

    /// Load settings from config.toml if it exists and parses.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }
}

impl IndexingSettings {
    /// Substring match of each pattern (trailing `/` ignored) against a
    /// path relative to the scanned root.
    #[must_use]
    pub fn should_exclude(&self, rel_path: &Path) -> bool {
        let path_str = rel_path.to_string_lossy().replace('\\', "/");
        self.exclude_patterns.iter().any(|pattern| {
            let pattern = pattern.trim_end_matches('/');
            !pattern.is_empty() && path_str.contains(pattern)
        })
    }

    /// Size cap in bytes (0 = unlimited).
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        u64::from(self.max_file_size_mb) * 1024 * 1024
    }
}
