//! Staff pass to team resolution.
use rusqlite::{OptionalExtension, Row, TransactionBehavior, params};
use tracing::debug;

use crate::{
    database::{Store, from_millis},
    error::BankError,
    models::MappingEntry,
};

fn mapping_from_row(row: &Row<'_>) -> rusqlite::Result<MappingEntry> {
    Ok(MappingEntry {
        staff_pass_id: row.get(0)?,
        team_name: row.get(1)?,
        created_at: from_millis(2, row.get(2)?)?,
    })
}

impl Store {
    /// Exact, case sensitive lookup. Never writes.
    pub fn resolve(&self, staff_pass_id: &str) -> Result<MappingEntry, BankError> {
        let conn = self.connection()?;

        conn.query_row(
            "SELECT staff_pass_id, team_name, created_at FROM mapping_entries WHERE staff_pass_id = ?1",
            params![staff_pass_id],
            mapping_from_row,
        )
        .optional()?
        .ok_or_else(|| BankError::NotFound(staff_pass_id.to_string()))
    }

    /// Inserts or replaces every entry in one transaction, all or nothing.
    pub fn upsert_mappings<F>(&self, entries: &[MappingEntry], mut on_row: F) -> Result<usize, BankError>
    where
        F: FnMut(&MappingEntry),
    {
        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        {
            let mut statement = tx.prepare(
                "INSERT INTO mapping_entries (staff_pass_id, team_name, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (staff_pass_id) DO UPDATE SET
                    team_name = excluded.team_name,
                    created_at = excluded.created_at",
            )?;

            for entry in entries {
                statement.execute(params![
                    entry.staff_pass_id,
                    entry.team_name,
                    entry.created_at.timestamp_millis()
                ])?;

                on_row(entry);
            }
        }

        tx.commit()?;

        debug!("Upserted {} mapping entries", entries.len());

        Ok(entries.len())
    }

    pub fn mapping_count(&self) -> Result<u64, BankError> {
        let conn = self.connection()?;

        Ok(conn.query_row("SELECT COUNT(*) FROM mapping_entries", [], |row| row.get(0))?)
    }

    pub fn team_exists(&self, team_name: &str) -> Result<bool, BankError> {
        let conn = self.connection()?;

        Ok(conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM mapping_entries WHERE team_name = ?1)",
            params![team_name],
            |row| row.get(0),
        )?)
    }
}
