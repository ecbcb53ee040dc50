use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use trawlmap_tables::TableFiles;

/// Optional TOML override for the conventional table file names, e.g.
///
/// ```toml
/// [tables]
/// stations = "station_list.csv"
/// catches = "/srv/survey/catch_2018.csv"
/// ```
///
/// Relative paths resolve against the data directory.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tables: TableOverrides,
}

#[derive(Debug, Default, Deserialize)]
pub struct TableOverrides {
    pub stations: Option<PathBuf>,
    pub tows: Option<PathBuf>,
    pub catches: Option<PathBuf>,
    pub species: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }
}

pub fn resolve_table_files(data_dir: &Path, config: Option<&Config>) -> TableFiles {
    let mut files = TableFiles::in_dir(data_dir);

    if let Some(config) = config {
        let overrides = &config.tables;
        if let Some(path) = &overrides.stations {
            files.stations = anchor(data_dir, path);
        }
        if let Some(path) = &overrides.tows {
            files.tows = anchor(data_dir, path);
        }
        if let Some(path) = &overrides.catches {
            files.catches = anchor(data_dir, path);
        }
        if let Some(path) = &overrides.species {
            files.species = anchor(data_dir, path);
        }
    }

    files
}

fn anchor(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}
