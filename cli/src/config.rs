use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the database location, e.g. for a second profile or for tests.
pub const DB_ENV_VAR: &str = "LIFTBOOK_DB";

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let db_override = std::env::var_os(DB_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve(db_override)
    }

    fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = if let Some(path) = db_override {
            path
        } else {
            let proj_dirs = ProjectDirs::from("", "", "liftbook")
                .context("Could not determine home directory")?;
            proj_dirs.data_dir().join("liftbook.db")
        };

        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }

        Ok(Config { db_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles").join("gym.db");
        let config = Config::resolve(Some(path.clone())).unwrap();
        assert_eq!(config.db_path, path);
        assert!(dir.path().join("profiles").is_dir());
    }

    #[test]
    fn test_bare_file_name_override() {
        let config = Config::resolve(Some(PathBuf::from("liftbook.db"))).unwrap();
        assert_eq!(config.db_path, PathBuf::from("liftbook.db"));
    }
}
