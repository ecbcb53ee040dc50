use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::TableError;
use crate::tables::{parse_catches, parse_species, parse_stations, parse_tows};

/// Raw degrees/minutes/seconds triple exactly as it appears in the station
/// table. Sign conventions are applied downstream, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DmsCoordinate {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station_code: String,
    pub latitude: DmsCoordinate,
    pub longitude: DmsCoordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TowRecord {
    pub station_code: String,
    pub date: NaiveDate,
    pub tow_number: i64,
    pub duration_min: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchRecord {
    pub station_code: String,
    pub date: NaiveDate,
    pub tow_number: i64,
    pub species_code: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesRecord {
    pub species_code: String,
    pub common_name: String,
}

/// Locations of the four raw tables on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFiles {
    pub stations: PathBuf,
    pub tows: PathBuf,
    pub catches: PathBuf,
    pub species: PathBuf,
}

impl TableFiles {
    /// Conventional file names inside a data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            stations: dir.join("stations.csv"),
            tows: dir.join("tows.csv"),
            catches: dir.join("catch.csv"),
            species: dir.join("species.csv"),
        }
    }
}

/// The four tables, parsed but not yet joined. Loaded once at startup and
/// treated as read-only from then on.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub stations: Vec<StationRecord>,
    pub tows: Vec<TowRecord>,
    pub catches: Vec<CatchRecord>,
    pub species: Vec<SpeciesRecord>,
}

impl RawTables {
    pub fn load(files: &TableFiles) -> Result<Self, TableError> {
        let stations = parse_stations(&read_table("stations", &files.stations)?)?;
        let tows = parse_tows(&read_table("tows", &files.tows)?)?;
        let catches = parse_catches(&read_table("catches", &files.catches)?)?;
        let species = parse_species(&read_table("species", &files.species)?)?;

        Ok(Self {
            stations,
            tows,
            catches,
            species,
        })
    }
}

fn read_table(table: &'static str, path: &Path) -> Result<String, TableError> {
    fs::read_to_string(path).map_err(|source| TableError::Io {
        table,
        path: path.display().to_string(),
        source,
    })
}
