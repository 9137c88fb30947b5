//! # Configuration
//!
//! Settings live in `config.json` inside the data directory. Missing files and
//! missing keys fall back to defaults, so a fresh install needs no config at all.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `database-path` | `<data dir>/store.db` | SQLite file; relative paths resolve against the data dir |
//! | `sale-policy` | `fifo` | How a sale without a location picks stock: `fifo` or `single-entry` |

use crate::error::{GreenGrowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DB_FILENAME: &str = "store.db";

pub const KEYS: &[&str] = &["database-path", "sale-policy"];

/// Which entries a sale draws from when no location is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SalePolicy {
    /// Drain entries oldest first; the aggregate must cover the sale.
    #[default]
    Fifo,
    /// Take everything from the first entry that alone covers the sale.
    SingleEntry,
}

impl FromStr for SalePolicy {
    type Err = GreenGrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fifo" => Ok(SalePolicy::Fifo),
            "single-entry" | "single" => Ok(SalePolicy::SingleEntry),
            other => Err(GreenGrowError::Config(format!(
                "Unknown sale policy '{}' (expected fifo or single-entry)",
                other
            ))),
        }
    }
}

impl fmt::Display for SalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalePolicy::Fifo => write!(f, "fifo"),
            SalePolicy::SingleEntry => write!(f, "single-entry"),
        }
    }
}

/// Configuration for greengrow, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GreenGrowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub sale_policy: SalePolicy,
}

impl GreenGrowConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: GreenGrowConfig = serde_json::from_str(&content).map_err(|e| {
            GreenGrowError::Config(format!("{}: {}", config_path.display(), e))
        })?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Store file location, resolved against `data_dir` when relative.
    pub fn database_path_in(&self, data_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DEFAULT_DB_FILENAME),
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match normalize_key(key).as_str() {
            "database-path" => Ok(self
                .database_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| DEFAULT_DB_FILENAME.to_string())),
            "sale-policy" => Ok(self.sale_policy.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "database-path" => {
                let value = value.trim();
                self.database_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "sale-policy" => self.sale_policy = value.parse()?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(String, String)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).ok().map(|v| (k.to_string(), v)))
            .collect()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('_', "-")
}

fn unknown_key(key: &str) -> GreenGrowError {
    GreenGrowError::Config(format!(
        "Unknown config key '{}' (known keys: {})",
        key,
        KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GreenGrowConfig::default();
        assert_eq!(config.sale_policy, SalePolicy::Fifo);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = GreenGrowConfig::load(temp.path()).unwrap();
        assert_eq!(config, GreenGrowConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");

        let mut config = GreenGrowConfig::default();
        config.set("sale_policy", "single-entry").unwrap();
        config.set("database-path", "nursery.db").unwrap();
        config.save(&dir).unwrap();

        let loaded = GreenGrowConfig::load(&dir).unwrap();
        assert_eq!(loaded.sale_policy, SalePolicy::SingleEntry);
        assert_eq!(loaded.database_path_in(&dir), dir.join("nursery.db"));
    }

    #[test]
    fn test_database_path_resolution() {
        let data = Path::new("/var/lib/greengrow");
        let mut config = GreenGrowConfig::default();
        assert_eq!(config.database_path_in(data), data.join("store.db"));

        config.database_path = Some(PathBuf::from("/tmp/other.db"));
        assert_eq!(config.database_path_in(data), PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn test_unknown_key_and_bad_policy() {
        let mut config = GreenGrowConfig::default();
        assert!(matches!(
            config.set("colour", "green"),
            Err(GreenGrowError::Config(_))
        ));
        assert!(matches!(
            config.set("sale-policy", "lifo"),
            Err(GreenGrowError::Config(_))
        ));
        assert_eq!(config.sale_policy, SalePolicy::Fifo);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "{}").unwrap();
        let config = GreenGrowConfig::load(temp.path()).unwrap();
        assert_eq!(config, GreenGrowConfig::default());
    }

    #[test]
    fn test_list_all_shows_every_key() {
        let config = GreenGrowConfig::default();
        let listed = config.list_all();
        assert_eq!(
            listed,
            vec![
                ("database-path".to_string(), "store.db".to_string()),
                ("sale-policy".to_string(), "fifo".to_string()),
            ]
        );
    }
}
