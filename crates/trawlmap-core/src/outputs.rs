//! Boundary artifacts for the mapping collaborator: the derived table as
//! parquet, and query results as a GeoJSON FeatureCollection whose marker
//! styling follows the fixed binned CPUE color scale.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use once_cell::sync::Lazy;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::types::StationMarker;

#[derive(Debug, Clone, Copy)]
pub struct CpueBin {
    pub upper: f64,
    pub label: &'static str,
    pub color: &'static str,
    pub radius_px: f64,
}

const NULL_COLOR: &str = "#999999";
const NULL_RADIUS_PX: f64 = 3.0;

// Fixed bin edges 0, 0.1, 1, 10, 100, 1000; anything above the last edge
// falls into the open-ended top bin.
static CPUE_BINS: Lazy<Vec<CpueBin>> = Lazy::new(|| {
    vec![
        CpueBin {
            upper: 0.1,
            label: "0-0.1",
            color: "#ffffb2",
            radius_px: 4.0,
        },
        CpueBin {
            upper: 1.0,
            label: "0.1-1",
            color: "#fed976",
            radius_px: 6.0,
        },
        CpueBin {
            upper: 10.0,
            label: "1-10",
            color: "#feb24c",
            radius_px: 8.0,
        },
        CpueBin {
            upper: 100.0,
            label: "10-100",
            color: "#fd8d3c",
            radius_px: 10.0,
        },
        CpueBin {
            upper: 1000.0,
            label: "100-1000",
            color: "#f03b20",
            radius_px: 12.0,
        },
        CpueBin {
            upper: f64::INFINITY,
            label: ">1000",
            color: "#bd0026",
            radius_px: 14.0,
        },
    ]
});

pub fn classify_cpue(cpue: f64) -> &'static CpueBin {
    CPUE_BINS
        .iter()
        .find(|bin| cpue <= bin.upper)
        .unwrap_or_else(|| CPUE_BINS.last().expect("bin scale is non-empty"))
}

/// One point feature per marker. Null CPUE renders as a small neutral
/// marker; everything else is styled by its bin.
pub fn markers_to_geojson(markers: &[StationMarker]) -> FeatureCollection {
    let features = markers
        .iter()
        .map(|marker| {
            let geometry = Geometry::new(Value::Point(vec![marker.longitude, marker.latitude]));

            let mut properties = JsonObject::new();
            properties.insert(
                "station_code".to_string(),
                marker.station_code.clone().into(),
            );
            properties.insert("species".to_string(), marker.species.clone().into());
            properties.insert("cpue".to_string(), marker.mean_cpue.into());

            let (bin_label, color, radius) = match marker.mean_cpue {
                Some(cpue) => {
                    let bin = classify_cpue(cpue);
                    (bin.label, bin.color, bin.radius_px)
                }
                None => ("no data", NULL_COLOR, NULL_RADIUS_PX),
            };
            properties.insert("bin".to_string(), bin_label.into());
            properties.insert("color".to_string(), color.into());
            properties.insert("radius_px".to_string(), radius.into());
            properties.insert("popup".to_string(), popup_text(marker).into());

            Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn popup_text(marker: &StationMarker) -> String {
    match marker.mean_cpue {
        Some(cpue) => format!(
            "CPUE {:.3} at station {} ({:.4}, {:.4})",
            cpue, marker.station_code, marker.latitude, marker.longitude
        ),
        None => format!(
            "No catch data at station {} ({:.4}, {:.4})",
            marker.station_code, marker.latitude, marker.longitude
        ),
    }
}

pub fn create_parquet_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let mut clone = df.clone();
        ParquetWriter::new(&mut cursor)
            .with_compression(ParquetCompression::Zstd(None))
            .with_statistics(StatisticsOptions::default())
            .finish(&mut clone)?;
    }
    Ok(buffer)
}

pub fn write_parquet(df: &DataFrame, path: &Path) -> Result<()> {
    let bytes = create_parquet_bytes(df)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(cpue: Option<f64>) -> StationMarker {
        StationMarker {
            station_code: "711".to_string(),
            latitude: 38.0525,
            longitude: -121.6892,
            species: "Chinook Salmon".to_string(),
            mean_cpue: cpue,
        }
    }

    #[test]
    fn bins_follow_the_fixed_edges() {
        assert_eq!(classify_cpue(0.05).label, "0-0.1");
        assert_eq!(classify_cpue(0.1).label, "0-0.1");
        assert_eq!(classify_cpue(0.5).label, "0.1-1");
        assert_eq!(classify_cpue(7.0).label, "1-10");
        assert_eq!(classify_cpue(50.0).label, "10-100");
        assert_eq!(classify_cpue(500.0).label, "100-1000");
        assert_eq!(classify_cpue(5000.0).label, ">1000");
    }

    #[test]
    fn geojson_point_is_lon_lat_ordered() {
        let collection = markers_to_geojson(&[marker(Some(0.5))]);
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(coords) => {
                assert_eq!(coords[0], -121.6892);
                assert_eq!(coords[1], 38.0525);
            }
            other => panic!("expected point geometry, got {other:?}"),
        }
    }

    #[test]
    fn null_cpue_gets_neutral_styling() {
        let collection = markers_to_geojson(&[marker(None)]);
        let properties = collection.features[0].properties.as_ref().unwrap();

        assert_eq!(properties["cpue"], serde_json::Value::Null);
        assert_eq!(properties["bin"], "no data");
        assert_eq!(properties["color"], NULL_COLOR);
        assert!(properties["popup"]
            .as_str()
            .unwrap()
            .starts_with("No catch data"));
    }

    #[test]
    fn popup_carries_cpue_station_and_coordinates() {
        let collection = markers_to_geojson(&[marker(Some(0.5))]);
        let properties = collection.features[0].properties.as_ref().unwrap();
        let popup = properties["popup"].as_str().unwrap();

        assert!(popup.contains("0.500"));
        assert!(popup.contains("711"));
        assert!(popup.contains("38.0525"));
        assert!(popup.contains("-121.6892"));
    }

    #[test]
    fn empty_marker_set_serializes_to_empty_collection() {
        let collection = markers_to_geojson(&[]);
        assert!(collection.features.is_empty());
    }
}
