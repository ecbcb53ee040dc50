use super::common::{
    build_reader, csv_error, field, header_index, parse_date, parse_required_f64,
    parse_required_i64, required_str,
};
use crate::errors::TableError;
use crate::model::CatchRecord;

const TABLE: &str = "catches";

pub fn parse_catches(content: &str) -> Result<Vec<CatchRecord>, TableError> {
    let mut reader = build_reader(content);
    let header = reader
        .headers()
        .map_err(|err| csv_error(TABLE, err))?
        .clone();

    let code_idx = header_index(TABLE, &header, "StationCode")?;
    let date_idx = header_index(TABLE, &header, "SampleDate")?;
    let tow_idx = header_index(TABLE, &header, "TowNumber")?;
    let species_idx = header_index(TABLE, &header, "OrganismCode")?;
    let count_idx = header_index(TABLE, &header, "Count")?;

    let mut catches = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| csv_error(TABLE, err))?;
        let line_index = row + 2;

        catches.push(CatchRecord {
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
            species_code: required_str(
                TABLE,
                field(TABLE, &record, species_idx, "OrganismCode", line_index)?,
                line_index,
                "OrganismCode",
            )?,
            count: parse_required_f64(
                TABLE,
                field(TABLE, &record, count_idx, "Count", line_index)?,
                line_index,
                "Count",
            )?,
        });
    }

    Ok(catches)
}
