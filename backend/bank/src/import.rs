//! # Mapping Import
//!
//! Bulk load of the staff pass mapping from CSV.
//!
//! ## Format
//! - Header row, exactly 3 columns: `staff_pass_id,team_name,created_at`
//! - `created_at` is epoch millis
//! - Any bad row rejects the whole file, nothing is written
use std::{fs::File, io::Read, path::Path};

use chrono::DateTime;
use csv::{Position, ReaderBuilder, StringRecord};
use tracing::info;

use crate::{database::Store, error::BankError, models::MappingEntry};

pub const COLUMNS: usize = 3;

fn invalid(line: u64, reason: impl Into<String>) -> BankError {
    BankError::Import {
        line,
        reason: reason.into(),
    }
}

fn parse_record(line: u64, record: &StringRecord) -> Result<MappingEntry, BankError> {
    if record.len() != COLUMNS {
        return Err(invalid(
            line,
            format!("expected {COLUMNS} columns, found {}", record.len()),
        ));
    }

    let staff_pass_id = &record[0];
    if staff_pass_id.is_empty() {
        return Err(invalid(line, "empty staff pass id"));
    }

    let raw_created_at = record[2].trim();
    let millis: i64 = raw_created_at.parse().map_err(|e| {
        invalid(
            line,
            format!("error converting epoch time to integer: {raw_created_at:?} ({e})"),
        )
    })?;

    let created_at = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| invalid(line, format!("epoch time out of range: {millis}")))?;

    Ok(MappingEntry {
        staff_pass_id: staff_pass_id.to_string(),
        team_name: record[1].to_string(),
        created_at,
    })
}

/// Parses every row before returning, first failure wins.
pub fn read_mappings<R: Read>(reader: R) -> Result<Vec<MappingEntry>, BankError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?;
    if headers.len() != COLUMNS {
        return Err(invalid(
            1,
            format!("header should have {COLUMNS} columns, found {}", headers.len()),
        ));
    }

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, Position::line);

        entries.push(parse_record(line, &record)?);
    }

    Ok(entries)
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MappingEntry>, BankError> {
    read_mappings(File::open(path)?)
}

impl Store {
    /// Reads `path` fully, then upserts it in one transaction.
    pub fn import_csv<P, F>(&self, path: P, on_row: F) -> Result<usize, BankError>
    where
        P: AsRef<Path>,
        F: FnMut(&MappingEntry),
    {
        let path = path.as_ref();
        let entries = load_csv(path)?;

        let count = self.upsert_mappings(&entries, on_row)?;
        info!("Imported {count} mapping entries from {}", path.display());

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::mapping::tests::entry;

    const MAPPING: &str = "staff_pass_id,team_name,created_at
STAFF_H123804820G,BASS,1623772799000
MANAGER_T999888420B,RUST,1623772799000
BOSS_T000000001P,RUST,1623872111000
";

    #[test]
    fn test_read_mappings() {
        let entries = read_mappings(MAPPING.as_bytes()).unwrap();

        assert_eq!(
            entries,
            vec![
                entry("STAFF_H123804820G", "BASS", 1623772799000),
                entry("MANAGER_T999888420B", "RUST", 1623772799000),
                entry("BOSS_T000000001P", "RUST", 1623872111000),
            ]
        );
    }

    #[test]
    fn test_header_column_count() {
        let err = read_mappings("staff_pass_id,team_name\nA,B\n".as_bytes()).unwrap_err();

        assert!(matches!(err, BankError::Import { line: 1, .. }));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(
            read_mappings("".as_bytes()),
            Err(BankError::Import { line: 1, .. })
        ));
    }

    #[test]
    fn test_row_column_count() {
        let csv = "staff_pass_id,team_name,created_at\nA,ONE,1\nB,TWO\n";

        assert!(matches!(
            read_mappings(csv.as_bytes()),
            Err(BankError::Import { line: 3, .. })
        ));
    }

    #[test]
    fn test_non_numeric_timestamp() {
        let csv = "staff_pass_id,team_name,created_at\nA,ONE,yesterday\n";

        let err = read_mappings(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, BankError::Import { line: 2, .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_empty_staff_pass_id() {
        let csv = "staff_pass_id,team_name,created_at\n,ONE,1\n";

        assert!(matches!(
            read_mappings(csv.as_bytes()),
            Err(BankError::Import { line: 2, .. })
        ));
    }

    #[test]
    fn test_import_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MAPPING.as_bytes()).unwrap();

        let store = Store::open_in_memory().unwrap();
        let mut rows = 0;

        let count = store.import_csv(file.path(), |_| rows += 1).unwrap();

        assert_eq!(count, 3);
        assert_eq!(rows, 3);
        assert_eq!(store.resolve("BOSS_T000000001P").unwrap().team_name, "RUST");
    }

    #[test]
    fn test_import_csv_is_all_or_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{MAPPING}LATE_1,LATE,not-a-number").unwrap();

        let store = Store::open_in_memory().unwrap();

        assert!(store.import_csv(file.path(), |_| {}).is_err());
        assert_eq!(store.mapping_count().unwrap(), 0);
    }

    #[test]
    fn test_import_missing_file() {
        let store = Store::open_in_memory().unwrap();

        assert!(matches!(
            store.import_csv("/definitely/not/here.csv", |_| {}),
            Err(BankError::Io(_))
        ));
    }
}
