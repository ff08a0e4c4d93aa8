use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable that points the app at a specific database file.
pub(crate) const DB_ENV_VAR: &str = "STOCKTUI_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

impl Config {
    /// Resolve paths from, in order: a `--db <path>` argument, the
    /// `STOCKTUI_DB` variable, then the platform data directory. The `--db`
    /// pair is removed from `args` so commands never see it.
    pub(crate) fn resolve(args: &mut Vec<String>) -> Result<Self> {
        let flag_path = take_flag_value(args, "--db")?;
        let env_path = std::env::var_os(DB_ENV_VAR).map(PathBuf::from);

        let db_path = match flag_path.or(env_path) {
            Some(path) => path,
            None => default_data_dir()?.join("stocktui.db"),
        };
        Ok(Self::for_db(db_path))
    }

    /// The log file sits next to the database.
    pub(crate) fn for_db(db_path: PathBuf) -> Self {
        let log_path = db_path.with_extension("log");
        Self { db_path, log_path }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "stocktui", "StockTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

pub(crate) fn take_flag_value(args: &mut Vec<String>, flag: &str) -> Result<Option<PathBuf>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        anyhow::bail!("{flag} requires a path");
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(PathBuf::from(crate::run::shellexpand(&value))))
}
