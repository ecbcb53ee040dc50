// crates/trawlmap-core/src/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label of the synthetic aggregate species row. Its CPUE for a
/// station/date is the sum of every real species' CPUE there, nulls
/// counted as zero.
pub const ALL_SPECIES: &str = "All";

/// Days between 0001-01-01 (chrono's CE epoch) and 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn date_to_days(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

/// Inclusive date range, the second of the two live filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The pair of live parameters the mapping collaborator feeds back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub species: String,
    pub range: DateRange,
}

/// One map marker: a station's CPUE averaged over the filtered date range.
/// `mean_cpue` is `None` both when every matching CPUE was missing and when
/// the average came out exactly zero; the renderer shows the neutral
/// "no data" marker for either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMarker {
    pub station_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub species: String,
    pub mean_cpue: Option<f64>,
}

/// Geographic envelope of a marker set, used by the renderer to frame the
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl MapBounds {
    /// Fixed default view over the survey region, used when a filter
    /// matches nothing.
    pub const DEFAULT: MapBounds = MapBounds {
        min_latitude: 37.8,
        max_latitude: 38.6,
        min_longitude: -122.2,
        max_longitude: -121.2,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_day_conversion_round_trips() {
        let date = NaiveDate::from_ymd_opt(2018, 6, 4).unwrap();
        let days = date_to_days(date);
        assert_eq!(days_to_date(days), Some(date));
    }

    #[test]
    fn epoch_is_day_zero() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2018, 6, 30).unwrap(),
        );
        assert!(range.contains(NaiveDate::from_ymd_opt(2018, 6, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2018, 6, 30).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2018, 7, 1).unwrap()));
    }
}
