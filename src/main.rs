mod config;
mod db;
mod error;
mod ids;
mod models;
mod run;
mod ui;
mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::RecordError;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::load()?;
    init_logging(&config)?;

    let db = match db::Database::open(&config) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "database unavailable at startup");
            eprintln!("{}", open_failure_message(&config.db_path, &e));
            std::process::exit(1);
        }
    };
    tracing::debug!(path = %db.path().display(), "database ready");

    match args.len() {
        1 => run::as_tui(&db),
        _ => run::as_cli(&args, &db),
    }
}

/// Log to a file; the TUI owns the terminal.
fn init_logging(config: &Config) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Unable to open log file: {}", config.log_path.display()))?;
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid log_level: {}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_failure_message(db_path: &Path, err: &RecordError) -> String {
    format!(
        "cervus: cannot open the database at {}\n  {err}\nSet db_path in the config file or CERVUS_DB_PATH to a writable location.",
        db_path.display()
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_failure_message_names_path_and_cause() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::in_dir(dir.path());
        config.db_path = dir.path().join("missing").join("cervus.db");
        let err = db::Database::open(&config).err().unwrap();

        let message = open_failure_message(&config.db_path, &err);
        assert!(message.starts_with("cervus: cannot open the database at "));
        assert!(message.contains(&config.db_path.display().to_string()));
        assert!(message.contains("Database error:"));
        assert!(message.contains("CERVUS_DB_PATH"));
    }
}
