//! # Redemption Coordinator
//!
//! One gift per team, decided by whichever transaction commits first.
//!
//! ## Flow
//! 1. `BEGIN IMMEDIATE`: takes the write lock up front, so a second writer on any connection to
//!    the same file waits (busy timeout) until the first commits or rolls back
//! 2. Confirm the staff pass belongs to the team
//! 3. Look for an existing ledger row, bail out with it if present
//! 4. Insert, relying on the `team_name` primary key if the check was somehow bypassed
//! 5. Commit
//!
//! Dropping the transaction on any early return rolls it back, nothing partial is ever written.
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior, params};
use tracing::{info, warn};

use crate::{
    database::{Store, from_millis},
    error::BankError,
    models::{RedemptionEntry, now},
};

fn redemption_from_row(row: &Row<'_>) -> rusqlite::Result<RedemptionEntry> {
    Ok(RedemptionEntry {
        team_name: row.get(0)?,
        redeemed_at: from_millis(1, row.get(1)?)?,
        redeemed_by: row.get(2)?,
    })
}

fn find_redemption(conn: &Connection, team_name: &str) -> rusqlite::Result<Option<RedemptionEntry>> {
    conn.query_row(
        "SELECT team_name, redeemed_at, redeemed_by FROM redemption_entries WHERE team_name = ?1",
        params![team_name],
        redemption_from_row,
    )
    .optional()
}

fn is_member(conn: &Connection, staff_pass_id: &str, team_name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM mapping_entries WHERE staff_pass_id = ?1 AND team_name = ?2)",
        params![staff_pass_id, team_name],
        |row| row.get(0),
    )
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

impl Store {
    /// Records the one redemption `team_name` is allowed, on behalf of `staff_pass_id`.
    ///
    /// Returns [`BankError::AlreadyRedeemed`] with the existing row when the team got there first.
    pub fn redeem(&self, team_name: &str, staff_pass_id: &str) -> Result<RedemptionEntry, BankError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !is_member(&tx, staff_pass_id, team_name)? {
            return Err(BankError::NotMember {
                staff_pass_id: staff_pass_id.to_string(),
                team_name: team_name.to_string(),
            });
        }

        if let Some(existing) = find_redemption(&tx, team_name)? {
            return Err(BankError::AlreadyRedeemed(existing));
        }

        let entry = RedemptionEntry {
            team_name: team_name.to_string(),
            redeemed_at: now(),
            redeemed_by: staff_pass_id.to_string(),
        };

        let inserted = tx.execute(
            "INSERT INTO redemption_entries (team_name, redeemed_at, redeemed_by) VALUES (?1, ?2, ?3)",
            params![entry.team_name, entry.redeemed_at.timestamp_millis(), entry.redeemed_by],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                warn!(team = team_name, "Redemption insert hit the unique constraint");

                return match find_redemption(&tx, team_name)? {
                    Some(existing) => Err(BankError::AlreadyRedeemed(existing)),
                    None => Err(err.into()),
                };
            }
            Err(err) => return Err(err.into()),
        }

        tx.commit()?;

        info!(team = team_name, staff_pass_id, "Gift redeemed");

        Ok(entry)
    }

    /// Resolves the staff pass then redeems for its team.
    pub fn claim(&self, staff_pass_id: &str) -> Result<RedemptionEntry, BankError> {
        let mapping = self.resolve(staff_pass_id)?;

        self.redeem(&mapping.team_name, &mapping.staff_pass_id)
    }

    pub fn redemption_for(&self, team_name: &str) -> Result<Option<RedemptionEntry>, BankError> {
        let conn = self.connection()?;

        Ok(find_redemption(&conn, team_name)?)
    }

    /// Every ledger row, ordered by team.
    pub fn redemptions(&self) -> Result<Vec<RedemptionEntry>, BankError> {
        let conn = self.connection()?;
        let mut statement = conn.prepare(
            "SELECT team_name, redeemed_at, redeemed_by FROM redemption_entries ORDER BY team_name",
        )?;

        let rows = statement.query_map([], redemption_from_row)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
