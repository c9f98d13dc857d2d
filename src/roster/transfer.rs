//! Import and export of character files
//!
//! Imports accept a single record or a list, in either app's format. Export
//! always writes the canonical shape as a pretty-printed array.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use super::store::StoreError;
use crate::character::Character;
use crate::normalize::{decode_records, regenerate_ids, DecodeError, Decoded};

/// Errors importing characters
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read characters: {0}")]
    Decode(#[from] DecodeError),

    #[error("no characters found in import")]
    Empty,

    #[error("{skipped} of {total} records could not be read; nothing was imported")]
    Incomplete { skipped: usize, total: usize },

    #[error("failed to save imported characters: {0}")]
    Store(#[from] StoreError),
}

/// Errors exporting characters
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode characters: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decode an import payload and give every record a fresh id not in `taken`
///
/// A payload with any unreadable record is rejected as a whole.
pub fn prepare_import(bytes: &[u8], taken: &HashSet<String>) -> Result<Vec<Character>, ImportError> {
    let Decoded {
        mut characters,
        skipped,
    } = decode_records(bytes)?;
    if skipped > 0 {
        return Err(ImportError::Incomplete {
            skipped,
            total: skipped + characters.len(),
        });
    }
    if characters.is_empty() {
        return Err(ImportError::Empty);
    }

    regenerate_ids(&mut characters, taken);
    Ok(characters)
}

/// Canonical export document
pub fn export_json(characters: &[Character]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(characters)?)
}

/// Default file name for an export made on `date`
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("whitehack-characters-{}.json", date.format("%Y-%m-%d"))
}

/// Read an import file
pub async fn read_import_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    tokio::fs::read(path).await.map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write an export document
pub async fn write_export_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
