//! JSON output.

use crate::models::MinutesTable;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `table` to `path` as a pretty-printed JSON array.
///
/// # Output
///
/// ```json
/// [
///   {
///     "title": "Monetary Policy Summary, March 2023",
///     "date": "23 March 2023",
///     "text": "...",
///     "year": 2023,
///     "month": "march",
///     "url": "https://www.bankofengland.co.uk/monetary-policy-summary-and-minutes/2023/march-2023"
///   }
/// ]
/// ```
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = table.len()))]
pub async fn write_table(table: &MinutesTable, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(table)?;

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create JSON output directory");
        return Err(e);
    }

    fs::write(path, json).await?;
    info!("Wrote JSON output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::build_address;
    use crate::models::{MinutesRecord, PageContent};

    #[tokio::test]
    async fn test_write_table_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("json/minutes.json");
        let table = MinutesTable::from(vec![MinutesRecord::new(
            PageContent {
                title: "Monetary Policy Summary, May 2024".to_string(),
                date: "9 May 2024".to_string(),
                text: "Bank Rate maintained at 5.25%".to_string(),
            },
            2024,
            "may".to_string(),
            build_address(2024, "may"),
        )]);

        write_table(&table, &path).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let rows = written.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["year"], 2024);
        assert_eq!(rows[0]["month"], "may");
        assert_eq!(rows[0]["text"], "Bank Rate maintained at 5.25%");
        assert!(rows[0]["url"].as_str().unwrap().ends_with("/2024/may-2024"));
    }

    #[tokio::test]
    async fn test_write_empty_table_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        write_table(&MinutesTable::new(), &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
