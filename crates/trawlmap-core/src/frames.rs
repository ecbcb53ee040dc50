//! Columnar views of the raw tables. Station coordinates are normalized to
//! signed decimal degrees while the frame is built, so every later stage
//! only ever sees decimal coordinates.

use polars::prelude::*;
use trawlmap_tables::{CatchRecord, SpeciesRecord, StationRecord, TowRecord};

use crate::coords::{to_decimal_latitude, to_decimal_longitude};
use crate::error::Result;
use crate::types::date_to_days;

pub fn stations_frame(stations: &[StationRecord]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "station_code".into(),
            stations
                .iter()
                .map(|s| s.station_code.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "latitude".into(),
            stations
                .iter()
                .map(|s| to_decimal_latitude(&s.latitude))
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "longitude".into(),
            stations
                .iter()
                .map(|s| to_decimal_longitude(&s.longitude))
                .collect::<Vec<_>>(),
        )
        .into(),
    ])?;
    Ok(df)
}

pub fn tows_frame(tows: &[TowRecord]) -> Result<DataFrame> {
    let dates = date_series(tows.iter().map(|t| t.date))?;
    let df = DataFrame::new(vec![
        Series::new(
            "station_code".into(),
            tows.iter()
                .map(|t| t.station_code.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        dates.into(),
        Series::new(
            "tow_number".into(),
            tows.iter().map(|t| t.tow_number).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "duration_min".into(),
            tows.iter().map(|t| t.duration_min).collect::<Vec<_>>(),
        )
        .into(),
    ])?;
    Ok(df)
}

pub fn catches_frame(catches: &[CatchRecord]) -> Result<DataFrame> {
    let dates = date_series(catches.iter().map(|c| c.date))?;
    let df = DataFrame::new(vec![
        Series::new(
            "station_code".into(),
            catches
                .iter()
                .map(|c| c.station_code.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        dates.into(),
        Series::new(
            "tow_number".into(),
            catches.iter().map(|c| c.tow_number).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "species_code".into(),
            catches
                .iter()
                .map(|c| c.species_code.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "catch_count".into(),
            catches.iter().map(|c| c.count).collect::<Vec<_>>(),
        )
        .into(),
    ])?;
    Ok(df)
}

pub fn species_frame(species: &[SpeciesRecord]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "species_code".into(),
            species
                .iter()
                .map(|s| s.species_code.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "species".into(),
            species
                .iter()
                .map(|s| s.common_name.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
    ])?;
    Ok(df)
}

fn date_series(dates: impl Iterator<Item = chrono::NaiveDate>) -> Result<Series> {
    let days: Vec<i32> = dates.map(date_to_days).collect();
    let series = Series::new("date".into(), days).cast(&DataType::Date)?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trawlmap_tables::DmsCoordinate;

    #[test]
    fn stations_frame_carries_decimal_coordinates() {
        let stations = vec![StationRecord {
            station_code: "711".to_string(),
            latitude: DmsCoordinate {
                degrees: 38.0,
                minutes: 3.0,
                seconds: 9.0,
            },
            longitude: DmsCoordinate {
                degrees: 121.0,
                minutes: 41.0,
                seconds: 21.2,
            },
        }];

        let df = stations_frame(&stations).expect("frame build failed");
        assert_eq!(df.height(), 1);

        let lat = df.column("latitude").unwrap().f64().unwrap().get(0).unwrap();
        let lon = df
            .column("longitude")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!((lat - 38.0525).abs() < 1e-4);
        assert!((lon + 121.6892).abs() < 1e-4);
    }

    #[test]
    fn tows_frame_uses_date_dtype() {
        let tows = vec![TowRecord {
            station_code: "711".to_string(),
            date: NaiveDate::from_ymd_opt(2018, 6, 4).unwrap(),
            tow_number: 1,
            duration_min: 10.0,
        }];

        let df = tows_frame(&tows).expect("frame build failed");
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }
}
