//! The filter operation the mapping collaborator calls on every input
//! change. Pure function over the immutable CPUE table: no caches, no
//! hidden state, deterministic for a given (species, date range) pair.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::error::Result;
use crate::types::{days_to_date, FilterParams, MapBounds, StationMarker, ALL_SPECIES};

#[derive(Debug, Default)]
struct Accumulator {
    latitude: f64,
    longitude: f64,
    sum: f64,
    count: usize,
}

/// Rows matching `species == selected AND start <= date <= end`, grouped by
/// station, CPUE averaged with missing values excluded. An average of
/// exactly zero is folded into the null marker. An empty result is a normal
/// outcome, never an error.
pub fn filter_markers(df: &DataFrame, params: &FilterParams) -> Result<Vec<StationMarker>> {
    let len = df.height();

    let station = df.column("station_code")?.str()?;
    let date = df.column("date")?.date()?;
    let latitude = df.column("latitude")?.f64()?;
    let longitude = df.column("longitude")?.f64()?;
    let species = df.column("species")?.str()?;
    let cpue = df.column("cpue")?.f64()?;

    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();

    for idx in 0..len {
        let (Some(code), Some(day), Some(name)) =
            (station.get(idx), date.get(idx), species.get(idx))
        else {
            continue;
        };

        let in_range = days_to_date(day).is_some_and(|d| params.range.contains(d));
        if name != params.species || !in_range {
            continue;
        }

        let acc = groups.entry(code.to_string()).or_default();
        acc.latitude = latitude.get(idx).unwrap_or(acc.latitude);
        acc.longitude = longitude.get(idx).unwrap_or(acc.longitude);
        if let Some(value) = cpue.get(idx) {
            acc.sum += value;
            acc.count += 1;
        }
    }

    let markers = groups
        .into_iter()
        .map(|(code, acc)| {
            let mean = if acc.count > 0 {
                Some(acc.sum / acc.count as f64)
            } else {
                None
            };
            // a zero average means nothing was caught; render it like
            // missing data, not like a tiny catch
            let mean_cpue = mean.filter(|value| *value != 0.0);
            StationMarker {
                station_code: code,
                latitude: acc.latitude,
                longitude: acc.longitude,
                species: params.species.clone(),
                mean_cpue,
            }
        })
        .collect();

    Ok(markers)
}

/// Distinct species names present in the table: real species sorted
/// alphabetically, the aggregate label last.
pub fn species_names(df: &DataFrame) -> Result<Vec<String>> {
    let species = df.column("species")?.str()?;

    let mut names: Vec<String> = Vec::new();
    let mut has_all = false;
    for idx in 0..df.height() {
        if let Some(name) = species.get(idx) {
            if name == ALL_SPECIES {
                has_all = true;
            } else if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    if has_all {
        names.push(ALL_SPECIES.to_string());
    }
    Ok(names)
}

/// Envelope of the marker set; the fixed default view when there are no
/// markers to frame.
pub fn bounds(markers: &[StationMarker]) -> MapBounds {
    let mut iter = markers.iter();
    let Some(first) = iter.next() else {
        return MapBounds::DEFAULT;
    };

    let mut out = MapBounds {
        min_latitude: first.latitude,
        max_latitude: first.latitude,
        min_longitude: first.longitude,
        max_longitude: first.longitude,
    };
    for marker in iter {
        out.min_latitude = out.min_latitude.min(marker.latitude);
        out.max_latitude = out.max_latitude.max(marker.latitude);
        out.min_longitude = out.min_longitude.min(marker.longitude);
        out.max_longitude = out.max_longitude.max(marker.longitude);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{date_to_days, DateRange};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 6, d).unwrap()
    }

    fn table(rows: &[(&str, NaiveDate, &str, Option<f64>)]) -> DataFrame {
        let date_series = Series::new(
            "date".into(),
            rows.iter().map(|r| date_to_days(r.1)).collect::<Vec<_>>(),
        )
        .cast(&DataType::Date)
        .unwrap();

        DataFrame::new(vec![
            Series::new(
                "station_code".into(),
                rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            )
            .into(),
            date_series.into(),
            Series::new("latitude".into(), vec![38.05; rows.len()]).into(),
            Series::new("longitude".into(), vec![-121.69; rows.len()]).into(),
            Series::new(
                "species".into(),
                rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            )
            .into(),
            Series::new("cpue".into(), rows.iter().map(|r| r.3).collect::<Vec<_>>()).into(),
        ])
        .unwrap()
    }

    fn params(species: &str, start: NaiveDate, end: NaiveDate) -> FilterParams {
        FilterParams {
            species: species.to_string(),
            range: DateRange::new(start, end),
        }
    }

    #[test]
    fn averages_across_the_date_range() {
        let df = table(&[
            ("711", day(1), "Chinook Salmon", Some(0.5)),
            ("711", day(2), "Chinook Salmon", Some(1.5)),
        ]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(1), day(30))).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].mean_cpue, Some(1.0));
    }

    #[test]
    fn missing_values_are_excluded_from_the_average() {
        let df = table(&[
            ("711", day(1), "Chinook Salmon", None),
            ("711", day(2), "Chinook Salmon", Some(2.0)),
        ]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(1), day(30))).unwrap();
        assert_eq!(markers[0].mean_cpue, Some(2.0));
    }

    #[test]
    fn zero_average_becomes_null_marker() {
        let df = table(&[("711", day(1), "Chinook Salmon", Some(0.0))]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(1), day(30))).unwrap();
        assert_eq!(markers.len(), 1, "the station still gets a marker");
        assert_eq!(markers[0].mean_cpue, None);
    }

    #[test]
    fn all_missing_group_yields_null_marker() {
        let df = table(&[("711", day(1), "Chinook Salmon", None)]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(1), day(30))).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].mean_cpue, None);
    }

    #[test]
    fn unknown_species_returns_empty_not_error() {
        let df = table(&[("711", day(1), "Chinook Salmon", Some(0.5))]);

        let markers = filter_markers(&df, &params("Kraken", day(1), day(30))).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn date_range_with_no_tows_returns_empty() {
        let df = table(&[("711", day(1), "Chinook Salmon", Some(0.5))]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(10), day(20))).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn boundary_dates_are_inclusive() {
        let df = table(&[
            ("711", day(1), "Chinook Salmon", Some(1.0)),
            ("711", day(5), "Chinook Salmon", Some(3.0)),
        ]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(1), day(5))).unwrap();
        assert_eq!(markers[0].mean_cpue, Some(2.0));
    }

    #[test]
    fn one_marker_per_station_sorted_by_code() {
        let df = table(&[
            ("712", day(1), "Chinook Salmon", Some(1.0)),
            ("704", day(1), "Chinook Salmon", Some(2.0)),
            ("704", day(2), "Chinook Salmon", Some(4.0)),
        ]);

        let markers = filter_markers(&df, &params("Chinook Salmon", day(1), day(30))).unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].station_code, "704");
        assert_eq!(markers[0].mean_cpue, Some(3.0));
        assert_eq!(markers[1].station_code, "712");
    }

    #[test]
    fn species_names_put_the_aggregate_last() {
        let df = table(&[
            ("711", day(1), "Splittail", Some(0.5)),
            ("711", day(1), "All", Some(0.5)),
            ("711", day(1), "Chinook Salmon", Some(0.5)),
        ]);

        let names = species_names(&df).unwrap();
        assert_eq!(names, vec!["Chinook Salmon", "Splittail", "All"]);
    }

    #[test]
    fn empty_marker_set_gets_default_bounds() {
        assert_eq!(bounds(&[]), MapBounds::DEFAULT);
    }

    #[test]
    fn bounds_cover_all_markers() {
        let markers = vec![
            StationMarker {
                station_code: "704".to_string(),
                latitude: 38.0,
                longitude: -121.8,
                species: "All".to_string(),
                mean_cpue: Some(1.0),
            },
            StationMarker {
                station_code: "711".to_string(),
                latitude: 38.2,
                longitude: -121.6,
                species: "All".to_string(),
                mean_cpue: Some(1.0),
            },
        ];

        let out = bounds(&markers);
        assert_eq!(out.min_latitude, 38.0);
        assert_eq!(out.max_latitude, 38.2);
        assert_eq!(out.min_longitude, -121.8);
        assert_eq!(out.max_longitude, -121.6);
    }
}
