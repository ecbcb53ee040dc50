use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::errors::TableError;

pub(crate) fn build_reader(content: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

/// Resolves an expected column to its positional index. Column lookup is by
/// header name; unrecognized extra columns are simply never indexed.
pub(crate) fn header_index(
    table: &'static str,
    header: &StringRecord,
    column: &'static str,
) -> Result<usize, TableError> {
    header
        .iter()
        .position(|field| field.eq_ignore_ascii_case(column))
        .ok_or_else(|| TableError::SchemaMismatch {
            table,
            column,
            header: header.iter().collect::<Vec<_>>().join(","),
        })
}

pub(crate) fn field<'a>(
    table: &'static str,
    record: &'a StringRecord,
    index: usize,
    column: &'static str,
    line_index: usize,
) -> Result<&'a str, TableError> {
    record.get(index).ok_or_else(|| TableError::DataRow {
        table,
        line_index,
        message: format!("row too short, column '{column}' missing"),
    })
}

pub(crate) fn parse_required_f64(
    table: &'static str,
    value: &str,
    line_index: usize,
    column: &'static str,
) -> Result<f64, TableError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|err| TableError::DataRow {
            table,
            line_index,
            message: format!("failed to parse column '{column}' as float: {err}"),
        })
}

pub(crate) fn parse_required_i64(
    table: &'static str,
    value: &str,
    line_index: usize,
    column: &'static str,
) -> Result<i64, TableError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|err| TableError::DataRow {
            table,
            line_index,
            message: format!("failed to parse column '{column}' as integer: {err}"),
        })
}

pub(crate) fn parse_date(
    table: &'static str,
    value: &str,
    line_index: usize,
    column: &'static str,
) -> Result<NaiveDate, TableError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| TableError::DataRow {
        table,
        line_index,
        message: format!("failed to parse column '{column}' as date: {err}"),
    })
}

pub(crate) fn required_str(
    table: &'static str,
    value: &str,
    line_index: usize,
    column: &'static str,
) -> Result<String, TableError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TableError::DataRow {
            table,
            line_index,
            message: format!("column '{column}' is empty"),
        });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn csv_error(table: &'static str, source: csv::Error) -> TableError {
    TableError::Csv { table, source }
}
