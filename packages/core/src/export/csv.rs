//! CSV export and import
//!
//! Export writes the fixed header below, then one row per record. Every
//! present value is wrapped in double quotes with inner quotes doubled;
//! absent values are left empty. Rows end with `\n`.

use crate::export::FormatError;
use crate::models::{Gender, PersonId, PersonRecord};

pub const CSV_HEADER: [&str; 10] = [
    "id",
    "name",
    "parentId",
    "partnerId",
    "birthDate",
    "deathDate",
    "anniversaryDate",
    "notes",
    "profilePicture",
    "gender",
];

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn cells(record: &PersonRecord) -> [Option<String>; 10] {
    [
        Some(record.id.to_string()),
        Some(record.name.clone()),
        record.parent_id.map(|id| id.to_string()),
        record.partner_id.map(|id| id.to_string()),
        record.birth_date.clone(),
        record.death_date.clone(),
        record.anniversary_date.clone(),
        record.notes.clone(),
        record.profile_picture.clone(),
        record.gender.map(|g| g.as_str().to_string()),
    ]
}

pub fn to_csv(records: &[PersonRecord]) -> String {
    let mut out = CSV_HEADER.join(",");
    for record in records {
        let row: Vec<String> = cells(record)
            .iter()
            .map(|cell| cell.as_deref().map(quote).unwrap_or_default())
            .collect();
        out.push('\n');
        out.push_str(&row.join(","));
    }
    out
}

/// Parse CSV produced by [`to_csv`] (or any CSV with the same column names,
/// in any order).
///
/// `id` and `name` columns are required; other columns are optional. Empty
/// cells read as absent and unknown genders as unset.
pub fn from_csv(input: &str) -> Result<Vec<PersonRecord>, FormatError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let mut positions = [None; 10];
    for (slot, name) in positions.iter_mut().zip(CSV_HEADER) {
        *slot = column(name);
    }
    for required in ["id", "name"] {
        if column(required).is_none() {
            return Err(FormatError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let cell = |i: usize| {
            positions[i]
                .and_then(|p| row.get(p))
                .map(str::to_string)
                .filter(|v| !v.is_empty())
        };
        let id_cell = |i: usize| -> Result<Option<PersonId>, FormatError> {
            cell(i)
                .map(|v| {
                    v.trim()
                        .parse::<i64>()
                        .map(PersonId)
                        .map_err(|_| FormatError::invalid_field(line, CSV_HEADER[i], v.as_str()))
                })
                .transpose()
        };

        let id = id_cell(0)?.ok_or_else(|| FormatError::invalid_field(line, "id", ""))?;
        records.push(PersonRecord {
            id,
            name: cell(1).unwrap_or_default(),
            parent_id: id_cell(2)?,
            partner_id: id_cell(3)?,
            birth_date: cell(4),
            death_date: cell(5),
            anniversary_date: cell(6),
            notes: cell(7),
            profile_picture: cell(8),
            gender: cell(9).as_deref().and_then(Gender::parse),
            facebook_url: None,
        });
    }

    tracing::debug!("Parsed {} record(s) from CSV", records.len());
    Ok(records)
}
