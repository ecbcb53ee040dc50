use super::common::{
    build_reader, csv_error, field, header_index, parse_date, parse_required_f64,
    parse_required_i64, required_str,
};
use crate::errors::TableError;
use crate::model::TowRecord;

const TABLE: &str = "tows";

pub fn parse_tows(content: &str) -> Result<Vec<TowRecord>, TableError> {
    let mut reader = build_reader(content);
    let header = reader
        .headers()
        .map_err(|err| csv_error(TABLE, err))?
        .clone();

    let code_idx = header_index(TABLE, &header, "StationCode")?;
    let date_idx = header_index(TABLE, &header, "SampleDate")?;
    let tow_idx = header_index(TABLE, &header, "TowNumber")?;
    let duration_idx = header_index(TABLE, &header, "TowDuration")?;

    let mut tows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| csv_error(TABLE, err))?;
        let line_index = row + 2;

        tows.push(TowRecord {
            station_code: required_str(
                TABLE,
                field(TABLE, &record, code_idx, "StationCode", line_index)?,
                line_index,
                "StationCode",
            )?,
            date: parse_date(
                TABLE,
                field(TABLE, &record, date_idx, "SampleDate", line_index)?,
                line_index,
                "SampleDate",
            )?,
            tow_number: parse_required_i64(
                TABLE,
                field(TABLE, &record, tow_idx, "TowNumber", line_index)?,
                line_index,
                "TowNumber",
            )?,
            duration_min: parse_required_f64(
                TABLE,
                field(TABLE, &record, duration_idx, "TowDuration", line_index)?,
                line_index,
                "TowDuration",
            )?,
        });
    }

    Ok(tows)
}
