use std::path::Path;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::error::FeederError;

/// Reads one identifier per line. Lines are trimmed and blank lines dropped.
///
/// # Errors
///
/// Returns an error when the file cannot be read or holds no identifiers.
pub fn load_ids(path: &Path) -> Result<Vec<String>, FeederError> {
    let content = std::fs::read_to_string(path).map_err(|err| FeederError::ReadIdFile {
        path: path.to_path_buf(),
        source: err,
    })?;
    let ids: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    if ids.is_empty() {
        return Err(FeederError::IdFileEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(ids)
}

#[must_use]
pub fn shuffle_ids(mut ids: Vec<String>) -> Vec<String> {
    ids.shuffle(&mut thread_rng());
    ids
}

/// Splits identifiers into batches of `batch_size`; the last one may be short.
/// A zero batch size is treated as one.
pub fn batches(ids: &[String], batch_size: usize) -> std::slice::Chunks<'_, String> {
    ids.chunks(batch_size.max(1))
}
