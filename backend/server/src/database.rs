//! # SQLite
//!
//! Opens the database and runs the optional one-time mapping import before the server binds.
//!
//! A bad mapping file stops startup, a half loaded mapping is never served.
use std::path::Path;

use bank::{BankError, Store};
use tracing::info;

pub fn init_store(db_path: &Path, csv_path: Option<&Path>) -> Result<Store, BankError> {
    info!("Opening database {}", db_path.display());
    let store = Store::open(db_path)?;

    if let Some(csv_path) = csv_path {
        info!("Importing staff mapping from {}", csv_path.display());
        store.import_csv(csv_path, |_| {})?;
    }

    info!("{} staff passes mapped", store.mapping_count()?);

    Ok(store)
}
