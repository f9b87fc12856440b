//! # Mapping Processing
//!
//! Offline loader for the staff pass mapping, for when the server should not be the one doing
//! the import.
//!
//! ## Steps
//! 1. Open (or create) the database
//! 2. Parse the whole CSV, any bad row aborts before anything is written
//! 3. Upsert every row in one transaction, ticking the progress bar per row
//! 4. Report how many passes and teams the database now knows
use std::{collections::BTreeMap, path::Path};

use bank::{BankError, MappingEntry, Store, import::load_csv};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    pub imported: usize,
    pub total: u64,
    pub teams: BTreeMap<String, usize>,
}

pub fn load_mappings(db_path: &Path, csv_path: &Path) -> Result<Summary, BankError> {
    let store = Store::open(db_path)?;
    let entries = load_csv(csv_path)?;

    println!("Loaded Rows: {}", entries.len());

    let pb = ProgressBar::new(entries.len() as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }

    let imported = store.upsert_mappings(&entries, |entry| {
        pb.set_message(entry.staff_pass_id.clone());
        pb.inc(1);
    })?;

    pb.finish_with_message("Done");

    let summary = Summary {
        imported,
        total: store.mapping_count()?,
        teams: count_teams(&entries),
    };

    println!("Imported: {}", summary.imported);
    println!("Total Staff Passes: {}", summary.total);
    println!("Teams In File: {}\n", summary.teams.len());

    Ok(summary)
}

pub fn count_teams(entries: &[MappingEntry]) -> BTreeMap<String, usize> {
    let mut teams = BTreeMap::new();

    for entry in entries {
        *teams.entry(entry.team_name.clone()).or_insert(0) += 1;
    }

    teams
}
