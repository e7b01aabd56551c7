//! Export formats
//!
//! Both formats round-trip the flat record shape:
//!
//! - `json` - a JSON array of records (camelCase field names)
//! - `csv` - one row per record with a fixed header; `facebookUrl` is not
//!   part of the CSV shape

pub mod csv;
mod error;
pub mod json;

pub use error::FormatError;
pub use json::{from_json, to_json};
pub use self::csv::{from_csv, to_csv, CSV_HEADER};
