use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::validate::DEFAULT_MAX_LEN;

pub(crate) const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILE: &str = "cervus.toml";
const DB_FILE: &str = "cervus.db";
const LOG_FILE: &str = "cervus.log";

const EMPTY_CONFIG: &str = r#"### cervus configuration file

### database file (default: cervus.db in the data directory)
# db_path = "/path/to/cervus.db"

### seconds to wait on a locked database before giving up
# lock_timeout_secs = 30

### maximum length of a client name
# max_field_len = 100

### rewrite recognizable phone numbers as (XX) X XXXX-XXXX
# normalize_phone = true

### log filter, e.g. "info" or "cervus=debug"
# log_level = "info"
"#;

/// Resolved settings, handed to the database and UI at construction.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) lock_timeout: Duration,
    pub(crate) max_field_len: usize,
    pub(crate) normalize_phone: bool,
    pub(crate) log_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FileConfig {
    db_path: Option<PathBuf>,
    lock_timeout_secs: u64,
    max_field_len: usize,
    normalize_phone: bool,
    log_level: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            lock_timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
            max_field_len: DEFAULT_MAX_LEN,
            normalize_phone: true,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Load `cervus.toml` from the platform config directory (writing a
    /// commented template on first run), then apply `CERVUS_*` overrides.
    pub(crate) fn load() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("com", "cervus", "Cervus")
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;
        let data_dir = dirs.data_dir();
        let config_dir = dirs.config_dir();
        for dir in [data_dir, config_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            std::fs::write(&path, EMPTY_CONFIG)
                .with_context(|| format!("Unable to create config file: {}", path.display()))?;
        }

        Self::from_file(&path, data_dir)
    }

    pub(crate) fn from_file(path: &Path, data_dir: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("CERVUS").try_parsing(true))
            .build()
            .context("Failed to build configuration")?;
        let file: FileConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if file.max_field_len == 0 {
            anyhow::bail!("max_field_len must be at least 1");
        }

        Ok(Self {
            db_path: file.db_path.unwrap_or_else(|| data_dir.join(DB_FILE)),
            log_path: data_dir.join(LOG_FILE),
            lock_timeout: Duration::from_secs(file.lock_timeout_secs),
            max_field_len: file.max_field_len,
            normalize_phone: file.normalize_phone,
            log_level: file.log_level,
        })
    }

    /// Defaults for a database living in `dir`.
    #[cfg(test)]
    pub(crate) fn in_dir(dir: &Path) -> Self {
        Self {
            db_path: dir.join(DB_FILE),
            log_path: dir.join(LOG_FILE),
            lock_timeout: Duration::from_secs(DEFAULT_LOCK_TIMEOUT_SECS),
            max_field_len: DEFAULT_MAX_LEN,
            normalize_phone: true,
            log_level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_template_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, EMPTY_CONFIG).unwrap();

        let config = Config::from_file(&path, dir.path()).unwrap();
        assert_eq!(config.db_path, dir.path().join(DB_FILE));
        assert_eq!(config.log_path, dir.path().join(LOG_FILE));
        assert_eq!(config.lock_timeout, Duration::from_secs(30));
        assert_eq!(config.max_field_len, 100);
        assert!(config.normalize_phone);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let db = dir.path().join("elsewhere.db");
        std::fs::write(
            &path,
            format!(
                "db_path = {:?}\nlock_timeout_secs = 5\nmax_field_len = 40\nnormalize_phone = false\n",
                db.display().to_string()
            ),
        )
        .unwrap();

        let config = Config::from_file(&path, dir.path()).unwrap();
        assert_eq!(config.db_path, db);
        assert_eq!(config.lock_timeout, Duration::from_secs(5));
        assert_eq!(config.max_field_len, 40);
        assert!(!config.normalize_phone);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml"), dir.path()).unwrap();
        assert_eq!(config.max_field_len, DEFAULT_MAX_LEN);
    }

    #[test]
    fn test_zero_max_field_len_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "max_field_len = 0\n").unwrap();
        assert!(Config::from_file(&path, dir.path()).is_err());
    }
}
