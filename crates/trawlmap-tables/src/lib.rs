pub mod errors;
pub mod model;
pub mod tables;

pub use errors::TableError;
pub use model::{
    CatchRecord, DmsCoordinate, RawTables, SpeciesRecord, StationRecord, TableFiles, TowRecord,
};
pub use tables::{parse_catches, parse_species, parse_stations, parse_tows};
