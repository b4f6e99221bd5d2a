//! CSV-backed snapshot source.
//!
//! Reads the whole file on every fetch; wrap in
//! [`SnapshotCache`](super::SnapshotCache) for load-once behavior.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::{DataError, DataSource};
use crate::models::SalesRecord;

/// Snapshot source reading a CSV file with the fixed sales schema.
///
/// Expected columns: `date, purchases, redemptions, assets, wholesaler,
/// advisor, mandate_name, fund_type, region_owner` (the last also
/// accepted under its legacy name `rvp`).
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<SalesRecord>, DataError> {
        let to_error = |source: csv::Error| DataError::Load {
            path: self.path.display().to_string(),
            source,
        };

        debug!("reading sales snapshot from {}", self.path.display());
        let mut reader = csv::Reader::from_path(&self.path).map_err(to_error)?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: SalesRecord = row.map_err(to_error)?;
            records.push(record);
        }

        info!(rows = records.len(), "loaded sales snapshot");
        Ok(records)
    }
}

impl DataSource for CsvStore {
    fn snapshot(&self) -> Result<Arc<Vec<SalesRecord>>, DataError> {
        Ok(Arc::new(self.load()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const HEADER: &str =
        "date,purchases,redemptions,assets,wholesaler,advisor,mandate_name,fund_type,region_owner\n";

    #[test]
    fn test_load_well_formed_snapshot() {
        let file = write_csv(&format!(
            "{HEADER}2024-01-15,1200.50,300.25,45000,Apex Partners,J. Morgan,Core Growth,Equity,Alice\n\
             2024-02-10,800,0,30000,Summit Capital,K. Patel,Income Plus,Fixed Income,Bob\n"
        ));

        let snapshot = CsvStore::new(file.path()).snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(snapshot[0].purchases, 1200.50);
        assert_eq!(snapshot[1].region_owner, "Bob");
    }

    #[test]
    fn test_legacy_rvp_header_is_accepted() {
        let file = write_csv(
            "date,purchases,redemptions,assets,wholesaler,advisor,mandate_name,fund_type,rvp\n\
             2024-01-15,10,0,100,Apex Partners,J. Morgan,Core Growth,Equity,Alice\n",
        );

        let snapshot = CsvStore::new(file.path()).snapshot().unwrap();
        assert_eq!(snapshot[0].region_owner, "Alice");
    }

    #[test]
    fn test_malformed_date_fails_whole_load() {
        let file = write_csv(&format!(
            "{HEADER}01/15/2024,10,0,100,Apex Partners,J. Morgan,Core Growth,Equity,Alice\n"
        ));

        let err = CsvStore::new(file.path()).snapshot().unwrap_err();
        assert!(matches!(err, DataError::Load { .. }));
    }

    #[test]
    fn test_malformed_amount_fails_whole_load() {
        let file = write_csv(&format!(
            "{HEADER}2024-01-15,lots,0,100,Apex Partners,J. Morgan,Core Growth,Equity,Alice\n"
        ));

        assert!(CsvStore::new(file.path()).snapshot().is_err());
    }

    #[test]
    fn test_missing_column_fails_whole_load() {
        let file = write_csv(
            "date,purchases,redemptions\n\
             2024-01-15,10,0\n",
        );

        assert!(CsvStore::new(file.path()).snapshot().is_err());
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let err = CsvStore::new("/nonexistent/sales.csv").snapshot().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sales.csv"));
    }
}
