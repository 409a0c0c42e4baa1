//! Pair list persistence
//!
//! A generated pair list is saved as JSON so a later run can pick it up
//! instead of scanning again.

use crate::config::Mode;
use crate::types::{FloodError, FloodResult, Pair};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Write the pair list as pretty-printed JSON
pub fn save_pairs<P: AsRef<Path>>(path: P, pairs: &[Pair]) -> FloodResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(pairs)?;
    fs::write(path, content)?;
    log::info!("Saved {} pairs to {}", pairs.len(), path.display());
    Ok(())
}

/// Read a pair list written by [`save_pairs`]
pub fn load_pairs<P: AsRef<Path>>(path: P) -> FloodResult<Vec<Pair>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let pairs: Vec<Pair> = serde_json::from_str(&content)?;
    log::info!("Loaded {} pairs from {}", pairs.len(), path.display());
    Ok(pairs)
}

/// `<mode>_<YYYYMMDDTHHMMSS>.json`
pub fn backup_file_name(mode: Mode, now: NaiveDateTime) -> String {
    format!("{}_{}.json", mode.as_str(), now.format("%Y%m%dT%H%M%S"))
}

/// Number of rasters shared by every pair.
///
/// `None` for an empty list. Pairs built from different band sets cannot be
/// stacked into one feature matrix, so more than one size is an error.
pub fn validate_cardinality(pairs: &[Pair]) -> FloodResult<Option<usize>> {
    let sizes: BTreeSet<usize> = pairs.iter().map(|p| p.rasters.len()).collect();
    match sizes.len() {
        0 => Ok(None),
        1 => Ok(sizes.into_iter().next()),
        _ => Err(FloodError::InconsistentRasterSets(sizes.into_iter().collect())),
    }
}
