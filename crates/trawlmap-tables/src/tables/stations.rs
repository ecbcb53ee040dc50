use super::common::{
    build_reader, csv_error, field, header_index, parse_required_f64, required_str,
};
use crate::errors::TableError;
use crate::model::{DmsCoordinate, StationRecord};

const TABLE: &str = "stations";

/// Parses the station list. Coordinates stay in their raw degrees/minutes/
/// seconds form; normalization to signed decimal degrees happens in the
/// pipeline, not here.
pub fn parse_stations(content: &str) -> Result<Vec<StationRecord>, TableError> {
    let mut reader = build_reader(content);
    let header = reader
        .headers()
        .map_err(|err| csv_error(TABLE, err))?
        .clone();

    let code_idx = header_index(TABLE, &header, "StationCode")?;
    let lat_d = header_index(TABLE, &header, "LatD")?;
    let lat_m = header_index(TABLE, &header, "LatM")?;
    let lat_s = header_index(TABLE, &header, "LatS")?;
    let lon_d = header_index(TABLE, &header, "LonD")?;
    let lon_m = header_index(TABLE, &header, "LonM")?;
    let lon_s = header_index(TABLE, &header, "LonS")?;

    let mut stations = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| csv_error(TABLE, err))?;
        // header is line 1, first data row is line 2
        let line_index = row + 2;

        let station_code = required_str(
            TABLE,
            field(TABLE, &record, code_idx, "StationCode", line_index)?,
            line_index,
            "StationCode",
        )?;

        let dms = |idx: usize, column: &'static str| -> Result<f64, TableError> {
            parse_required_f64(
                TABLE,
                field(TABLE, &record, idx, column, line_index)?,
                line_index,
                column,
            )
        };

        let latitude = DmsCoordinate {
            degrees: dms(lat_d, "LatD")?,
            minutes: dms(lat_m, "LatM")?,
            seconds: dms(lat_s, "LatS")?,
        };
        let longitude = DmsCoordinate {
            degrees: dms(lon_d, "LonD")?,
            minutes: dms(lon_m, "LonM")?,
            seconds: dms(lon_s, "LonS")?,
        };

        stations.push(StationRecord {
            station_code,
            latitude,
            longitude,
        });
    }

    Ok(stations)
}
