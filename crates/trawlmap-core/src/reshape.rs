//! Wide/long reshaping of the per-tow CPUE table.
//!
//! The long per-species table is pivoted into a wide table keyed by
//! (station, date, tow duration, coordinates) with one cell per species
//! (CPUE summed over duplicate rows), an "All" column is computed as the
//! row-wise sum with nulls counted as zero, and the result is un-pivoted
//! back to long format. Keeping duration in the key holds same-day tows of
//! different lengths apart as separate rows, so the filter layer averages
//! over them instead of summing their rates.
//! Species columns introduced by the pivot that have no observation for a
//! key are kept as zero-catch cells; the filtering layer later folds those
//! zeros into the null "no data" marker.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;

use crate::error::Result;
use crate::types::ALL_SPECIES;

#[derive(Debug)]
struct WideRow {
    latitude: f64,
    longitude: f64,
    // None means every contributing CPUE was missing (zero-duration tows)
    cells: BTreeMap<String, Option<f64>>,
}

/// Pivot, total, and un-pivot. Output has exactly one row per wide-table
/// key and species plus one "All" row per key, ordered by station, date,
/// duration, then species with "All" last. A station/date with tows of two
/// different durations yields two rows per species.
pub fn reshape_with_all_species(df: &DataFrame) -> Result<DataFrame> {
    let len = df.height();

    let station = df.column("station_code")?.str()?;
    let date = df.column("date")?.date()?;
    let latitude = df.column("latitude")?.f64()?;
    let longitude = df.column("longitude")?.f64()?;
    let duration = df.column("duration_min")?.f64()?;
    let species = df.column("species")?.str()?;
    let cpue = df.column("cpue")?.f64()?;

    // durations are non-negative, so their bit patterns order like the floats
    let mut wide: BTreeMap<(String, i32, u64), WideRow> = BTreeMap::new();
    let mut all_species: BTreeSet<String> = BTreeSet::new();

    for idx in 0..len {
        let (Some(code), Some(day), Some(lat), Some(lon), Some(minutes), Some(name)) = (
            station.get(idx),
            date.get(idx),
            latitude.get(idx),
            longitude.get(idx),
            duration.get(idx),
            species.get(idx),
        ) else {
            continue;
        };

        all_species.insert(name.to_string());

        let row = wide
            .entry((code.to_string(), day, minutes.to_bits()))
            .or_insert_with(|| WideRow {
                latitude: lat,
                longitude: lon,
                cells: BTreeMap::new(),
            });

        let cell = row.cells.entry(name.to_string()).or_insert(None);
        if let Some(value) = cpue.get(idx) {
            *cell = Some(cell.unwrap_or(0.0) + value);
        }
    }

    let capacity = wide.len() * (all_species.len() + 1);
    let mut out_station: Vec<String> = Vec::with_capacity(capacity);
    let mut out_date: Vec<i32> = Vec::with_capacity(capacity);
    let mut out_lat: Vec<f64> = Vec::with_capacity(capacity);
    let mut out_lon: Vec<f64> = Vec::with_capacity(capacity);
    let mut out_species: Vec<String> = Vec::with_capacity(capacity);
    let mut out_cpue: Vec<Option<f64>> = Vec::with_capacity(capacity);

    for ((code, day, _), row) in &wide {
        let mut total = 0.0;
        for name in &all_species {
            // unobserved cells become synthetic zero-catch entries
            let value = match row.cells.get(name) {
                Some(cell) => *cell,
                None => Some(0.0),
            };
            total += value.unwrap_or(0.0);

            out_station.push(code.clone());
            out_date.push(*day);
            out_lat.push(row.latitude);
            out_lon.push(row.longitude);
            out_species.push(name.clone());
            out_cpue.push(value);
        }

        out_station.push(code.clone());
        out_date.push(*day);
        out_lat.push(row.latitude);
        out_lon.push(row.longitude);
        out_species.push(ALL_SPECIES.to_string());
        out_cpue.push(Some(total));
    }

    let date_series = Series::new("date".into(), out_date).cast(&DataType::Date)?;
    let long = DataFrame::new(vec![
        Series::new("station_code".into(), out_station).into(),
        date_series.into(),
        Series::new("latitude".into(), out_lat).into(),
        Series::new("longitude".into(), out_lon).into(),
        Series::new("species".into(), out_species).into(),
        Series::new("cpue".into(), out_cpue).into(),
    ])?;

    Ok(long)
}
