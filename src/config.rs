use std::{ffi::OsString, path::PathBuf};

/// Overrides the data directory when `--data-dir` is not given
pub const DATA_DIR_ENV: &str = "WORLDLOTS_DATA_DIR";

pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    pub fn resolve(cli_data_dir: Option<PathBuf>) -> Self {
        Self::resolve_from(cli_data_dir, std::env::var_os(DATA_DIR_ENV))
    }

    fn resolve_from(cli_data_dir: Option<PathBuf>, env_data_dir: Option<OsString>) -> Self {
        let data_dir = cli_data_dir
            .or_else(|| env_data_dir.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("worldlots")
            });

        Self { data_dir }
    }
}
