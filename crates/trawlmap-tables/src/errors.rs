use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("{table} table is missing expected column '{column}' (header was: {header})")]
    SchemaMismatch {
        table: &'static str,
        column: &'static str,
        header: String,
    },

    #[error("{table} table CSV error: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{table} table row {line_index} invalid: {message}")]
    DataRow {
        table: &'static str,
        line_index: usize,
        message: String,
    },

    #[error("failed to read {table} table from '{path}': {source}")]
    Io {
        table: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}
