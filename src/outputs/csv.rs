//! CSV output.

use crate::models::MinutesTable;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Render `table` as CSV, header first. An empty table renders as an empty
/// string with no header.
pub fn table_to_csv(table: &MinutesTable) -> Result<String, Box<dyn Error>> {
    if table.is_empty() {
        return Ok(String::new());
    }
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    for row in table {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Write `table` to `path` as CSV.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = table.len()))]
pub async fn write_table(table: &MinutesTable, path: &Path) -> Result<(), Box<dyn Error>> {
    let csv = table_to_csv(table)?;
    ensure_parent_dir(path).await?;
    fs::write(path, csv).await?;
    info!("Wrote CSV output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::build_address;
    use crate::models::{MinutesRecord, PageContent};

    fn table() -> MinutesTable {
        MinutesTable::from(vec![
            MinutesRecord::new(
                PageContent {
                    title: "Monetary Policy Summary, February 2023".to_string(),
                    date: "2 February 2023".to_string(),
                    text: "Bank Rate increased to 4%, by a 7-2 majority".to_string(),
                },
                2023,
                "february".to_string(),
                build_address(2023, "february"),
            ),
            MinutesRecord::new(
                PageContent::default(),
                2023,
                "march".to_string(),
                build_address(2023, "march"),
            ),
        ])
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = table_to_csv(&table()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("title,date,text,year,month,url"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("\"Monetary Policy Summary, February 2023\",2 February 2023,"));
        assert!(first.contains("\"Bank Rate increased to 4%, by a 7-2 majority\""));
        assert!(first.ends_with(",2023,february,https://www.bankofengland.co.uk/monetary-policy-summary-and-minutes/2023/february-2023"));
        let second = lines.next().unwrap();
        assert!(second.starts_with(",,,2023,march,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_table_has_no_header() {
        assert_eq!(table_to_csv(&MinutesTable::new()).unwrap(), "");
    }

    #[tokio::test]
    async fn test_write_table_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/minutes.csv");
        write_table(&table(), &path).await.unwrap();

        let mut reader = ::csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), MinutesTable::COLUMNS);
        assert_eq!(reader.records().count(), 2);
    }
}
