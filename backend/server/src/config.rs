use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use tracing::{info, warn};

pub const DEFAULT_ORIGINS: &str = "http://localhost:3000,https://lczm.github.com";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the database, created if it does not exist
    #[arg(long, default_value = "gifts.db")]
    pub db: PathBuf,

    /// Staff pass to team mapping CSV imported before serving
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub struct Config {
    pub port: u16,
    pub allowed_origins: Vec<HeaderValue>,
    pub db_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

impl Config {
    pub fn load(args: Args) -> Result<Self> {
        let origins: String = try_load("ALLOWED_ORIGINS", DEFAULT_ORIGINS)?;

        Ok(Self {
            port: try_load("RUST_PORT", "3000")?,
            allowed_origins: parse_origins(&origins)?,
            db_path: args.db,
            csv_path: args.csv,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            allowed_origins: parse_origins(DEFAULT_ORIGINS).unwrap_or_default(),
            db_path: PathBuf::from("gifts.db"),
            csv_path: None,
        }
    }
}

pub fn parse_origins(origins: &str) -> Result<Vec<HeaderValue>> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid origin {origin:?}"))
        })
        .collect()
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow::anyhow!("Environment misconfigured: invalid {key} value: {e}")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins(" http://localhost:3000 ,, https://example.com").unwrap();

        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://example.com"),
            ]
        );
    }

    #[test]
    fn test_parse_origins_rejects_control_characters() {
        assert!(parse_origins("http://bad\norigin").is_err());
    }

    #[test]
    fn test_default_origins() {
        assert_eq!(Config::default().allowed_origins.len(), 2);
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["gifts", "--csv", "mapping.csv"]);

        assert_eq!(args.db, PathBuf::from("gifts.db"));
        assert_eq!(args.csv, Some(PathBuf::from("mapping.csv")));
    }
}
