//! Writers for the assembled [`MinutesTable`](crate::models::MinutesTable).
//!
//! # Submodules
//!
//! - [`json`]: Pretty-printed JSON array, one object per row
//! - [`csv`]: CSV with a `title,date,text,year,month,url` header
//!
//! Both writers create missing parent directories. An empty table produces
//! `[]` in JSON and an empty CSV file with no header row.

pub mod csv;
pub mod json;
