use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "notes.db";
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// Where the store keeps its data. Built once at startup and handed to
/// [`crate::NoteStore::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: PathBuf,
    pub log_file: PathBuf,
    pub backup_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            backup_dir: PathBuf::from("."),
        }
    }
}

impl StoreConfig {
    /// Layer file settings and then explicit overrides over the defaults.
    pub fn resolve(file: Option<&NotekeepConfig>, overrides: &NotekeepConfig) -> Self {
        let mut config = Self::default();
        for layer in file.into_iter().chain(std::iter::once(overrides)) {
            if let Some(database) = &layer.database {
                config.database = PathBuf::from(database);
            }
            if let Some(log_file) = &layer.log_file {
                config.log_file = PathBuf::from(log_file);
            }
            if let Some(backup_dir) = &layer.backup_dir {
                config.backup_dir = PathBuf::from(backup_dir);
            }
        }
        config
    }
}

/// On-disk shape of `notekeep.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NotekeepConfig {
    pub database: Option<String>,
    pub log_file: Option<String>,
    pub backup_dir: Option<String>,
}

impl From<&StoreConfig> for NotekeepConfig {
    fn from(config: &StoreConfig) -> Self {
        Self {
            database: Some(config.database.display().to_string()),
            log_file: Some(config.log_file.display().to_string()),
            backup_dir: Some(config.backup_dir.display().to_string()),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("notekeep.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<NotekeepConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: NotekeepConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &NotekeepConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_precedence() {
        let file = NotekeepConfig {
            database: Some("from_file.db".to_string()),
            log_file: Some("file.log".to_string()),
            backup_dir: None,
        };
        let overrides = NotekeepConfig {
            database: Some("from_flag.db".to_string()),
            ..Default::default()
        };

        let config = StoreConfig::resolve(Some(&file), &overrides);
        assert_eq!(config.database, PathBuf::from("from_flag.db"));
        assert_eq!(config.log_file, PathBuf::from("file.log"));
        assert_eq!(config.backup_dir, PathBuf::from("."));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = StoreConfig::resolve(None, &NotekeepConfig::default());
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notekeep.toml");
        let config = NotekeepConfig::from(&StoreConfig::default());

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        assert_eq!(load_config(Some(&path)).unwrap(), Some(config));
    }
}
