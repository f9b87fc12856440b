use thiserror::Error;

use crate::models::RedemptionEntry;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Staff pass {0} not found")]
    NotFound(String),

    #[error("Staff pass {staff_pass_id} does not belong to team {team_name}")]
    NotMember {
        staff_pass_id: String,
        team_name: String,
    },

    #[error("{}", .0.claimed_message())]
    AlreadyRedeemed(RedemptionEntry),

    #[error("Invalid mapping file at line {line}: {reason}")]
    Import { line: u64, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
