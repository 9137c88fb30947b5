use crate::api::{GreenGrowApi, GreenGrowPaths};
use crate::config::GreenGrowConfig;
use crate::error::{GreenGrowError, Result};
use crate::store::sqlite::SqliteStore;
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the data directory (config file and default store location).
pub const HOME_ENV: &str = "GREENGROW_HOME";
/// Overrides the store file.
pub const DB_ENV: &str = "GREENGROW_DB";

/// Per-user data directory, or `GREENGROW_HOME` when set.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "greengrow", "greengrow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            GreenGrowError::Config(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

/// Store file to open: `--db` flag, then `GREENGROW_DB`, then config, then the default.
pub fn resolve_database_path(
    data_dir: &Path,
    flag: Option<&Path>,
    env_db: Option<PathBuf>,
    config: &GreenGrowConfig,
) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or(env_db)
        .unwrap_or_else(|| config.database_path_in(data_dir))
}

/// Data directory, store file and config, resolved without touching the store.
pub fn resolve_paths(db_flag: Option<&Path>) -> Result<(GreenGrowPaths, GreenGrowConfig)> {
    let data_dir = data_dir()?;
    let config = GreenGrowConfig::load(&data_dir)?;
    let env_db = env::var_os(DB_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let database = resolve_database_path(&data_dir, db_flag, env_db, &config);
    debug!(data_dir = %data_dir.display(), database = %database.display(), "resolved paths");
    Ok((GreenGrowPaths { data_dir, database }, config))
}

/// Open the store and build the API with the configured sale policy.
pub fn initialize(db_flag: Option<&Path>) -> Result<GreenGrowApi<SqliteStore>> {
    let (paths, config) = resolve_paths(db_flag)?;
    let store = SqliteStore::open(&paths.database)?;
    Ok(GreenGrowApi::new(store, paths).with_sale_policy(config.sale_policy))
}
