use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use env_logger::{Builder, Env, Target};

use crate::error::AppError;

/// Install the global logger, writing to a dated file under `log_dir`. One file
/// per calendar day, appended across runs; `RUST_LOG` overrides the `info`
/// default filter.
pub fn init_file_logger(log_dir: &Path, prefix: &str) -> Result<PathBuf, AppError> {
    fs::create_dir_all(log_dir).map_err(|source| AppError::LogDir {
        dir: log_dir.to_path_buf(),
        source,
    })?;

    let path = log_dir.join(log_file_name(prefix, Local::now().date_naive()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(path)
}

fn log_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.log", prefix, date.format("%Y-%m-%d"))
}
