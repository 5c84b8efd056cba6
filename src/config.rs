//! Fixed on-disk layout for the knowledge base. There is nothing to tune: the
//! store and the log always live in a dot-directory under the user's home.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".towermourne";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "ttrpg_world.db";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "towermourne.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve the layout inside the current user's home directory.
    pub fn load() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Same file layout rooted at an arbitrary directory.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }

    pub fn ensure_data_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.data_dir).context("failed to create data directory")?;
        Ok(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lives_under_data_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::in_dir(dir.path().join("kb"));

        assert_eq!(config.db_path, dir.path().join("kb").join("ttrpg_world.db"));
        assert_eq!(config.log_path, dir.path().join("kb").join("towermourne.log"));

        assert!(!config.data_dir.exists());
        config.ensure_data_dir()?;
        assert!(config.data_dir.is_dir());
        Ok(())
    }
}
