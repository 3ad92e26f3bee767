//! CLI subcommands. One module per command; `main.rs` owns argument
//! parsing and dispatch.

pub mod cleanup;
pub mod context;
pub mod init;
pub mod mock;
pub mod monthly;
pub mod output;
pub mod status;
pub mod weekly;

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::store::{FileStore, HttpStore, RecordStore};

/// Open the record store a command reads from: a JSON dump when `--input`
/// is given, otherwise the live API from configuration.
pub fn open_store(config: &Config, input: Option<&Path>) -> Result<Box<dyn RecordStore>> {
    match input {
        Some(path) => {
            let store = FileStore::load(path)
                .with_context(|| format!("Failed to load records from {}", path.display()))?;
            Ok(Box::new(store))
        }
        None => {
            let store = HttpStore::new(&config.api).context(
                "Record store is not configured. Set STATUSCTL_DATABASE_ID or run 'statusctl init'",
            )?;
            Ok(Box::new(store))
        }
    }
}
