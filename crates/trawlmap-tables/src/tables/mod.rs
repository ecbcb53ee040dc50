mod catches;
mod common;
mod species;
mod stations;
mod tows;

pub use catches::parse_catches;
pub use species::parse_species;
pub use stations::parse_stations;
pub use tows::parse_tows;
