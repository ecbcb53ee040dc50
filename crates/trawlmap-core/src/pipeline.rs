//! The startup pipeline: four raw tables in, one immutable long-format CPUE
//! table out. Runs once; everything downstream reads the result.

use polars::prelude::*;
use tracing::debug;
use trawlmap_tables::RawTables;

use crate::error::Result;
use crate::frames::{catches_frame, species_frame, stations_frame, tows_frame};
use crate::query::{self, filter_markers, species_names};
use crate::reshape::reshape_with_all_species;
use crate::types::{FilterParams, MapBounds, StationMarker};

/// The analysis-ready table: one row per (station, date, tow duration,
/// species) plus one "All" row per (station, date, tow duration).
/// Constructed once and read-only afterwards; queries borrow it.
#[derive(Debug, Clone)]
pub struct CpueTable {
    df: DataFrame,
}

impl CpueTable {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Species + inclusive date range in, one averaged marker per
    /// station out.
    pub fn query(&self, params: &FilterParams) -> Result<Vec<StationMarker>> {
        filter_markers(&self.df, params)
    }

    /// Distinct species names, real species sorted first, "All" last. The
    /// dropdown domain for the mapping collaborator.
    pub fn species_names(&self) -> Result<Vec<String>> {
        species_names(&self.df)
    }

    pub fn bounds(markers: &[StationMarker]) -> MapBounds {
        query::bounds(markers)
    }
}

/// Joins the four tables, derives CPUE, and reshapes into the long table.
pub fn build_cpue_table(tables: &RawTables) -> Result<CpueTable> {
    let stations = stations_frame(&tables.stations)?;
    let tows = tows_frame(&tables.tows)?;
    let catches = catches_frame(&tables.catches)?;
    let species = species_frame(&tables.species)?;

    // Three successive inner joins; rows with unmatched keys are dropped
    // silently, which is the survey convention this pipeline preserves.
    let joined = stations
        .lazy()
        .join(
            tows.lazy(),
            [col("station_code")],
            [col("station_code")],
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            catches.lazy(),
            [col("station_code"), col("date"), col("tow_number")],
            [col("station_code"), col("date"), col("tow_number")],
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            species.lazy(),
            [col("species_code")],
            [col("species_code")],
            JoinArgs::new(JoinType::Inner),
        )
        .select([
            col("station_code"),
            col("date"),
            col("latitude"),
            col("longitude"),
            col("species"),
            col("catch_count"),
            col("duration_min"),
        ])
        .collect()?;

    debug!(
        stations = tables.stations.len(),
        tows = tables.tows.len(),
        catches = tables.catches.len(),
        joined_rows = joined.height(),
        "joined raw tables"
    );

    let with_cpue = derive_cpue(&joined)?;
    let long = reshape_with_all_species(&with_cpue)?;

    debug!(rows = long.height(), "built CPUE table");

    Ok(CpueTable { df: long })
}

/// CPUE = catch count / tow duration. A zero-duration tow has no defined
/// catch rate and yields a missing value rather than a non-finite float.
fn derive_cpue(df: &DataFrame) -> Result<DataFrame> {
    let len = df.height();
    let catch_count = df.column("catch_count")?.f64()?;
    let duration = df.column("duration_min")?.f64()?;

    let mut cpue: Vec<Option<f64>> = Vec::with_capacity(len);
    for idx in 0..len {
        let value = match (catch_count.get(idx), duration.get(idx)) {
            (Some(count), Some(minutes)) if minutes != 0.0 => Some(count / minutes),
            _ => None,
        };
        cpue.push(value);
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [Series::new("cpue".into(), cpue).into()])?;
    Ok(output)
}
