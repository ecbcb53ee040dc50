use super::common::{build_reader, csv_error, field, header_index, required_str};
use crate::errors::TableError;
use crate::model::SpeciesRecord;

const TABLE: &str = "species";

/// Parses the species-code lookup. Many codes may map to the same common
/// name; the lookup is taken as-is.
pub fn parse_species(content: &str) -> Result<Vec<SpeciesRecord>, TableError> {
    let mut reader = build_reader(content);
    let header = reader
        .headers()
        .map_err(|err| csv_error(TABLE, err))?
        .clone();

    let code_idx = header_index(TABLE, &header, "OrganismCode")?;
    let name_idx = header_index(TABLE, &header, "CommonName")?;

    let mut species = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| csv_error(TABLE, err))?;
        let line_index = row + 2;

        species.push(SpeciesRecord {
            species_code: required_str(
                TABLE,
                field(TABLE, &record, code_idx, "OrganismCode", line_index)?,
                line_index,
                "OrganismCode",
            )?,
            common_name: required_str(
                TABLE,
                field(TABLE, &record, name_idx, "CommonName", line_index)?,
                line_index,
                "CommonName",
            )?,
        });
    }

    Ok(species)
}
