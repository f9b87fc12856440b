use std::path::PathBuf;

use clap::Parser;

/// Bulk import of the staff pass to team mapping
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Mapping CSV: staff_pass_id,team_name,created_at (epoch millis)
    csv: PathBuf,

    /// Database to import into, created if it does not exist
    #[arg(long, default_value = "gifts.db")]
    db: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    process::load_mappings(&args.db, &args.csv)?;

    Ok(())
}
