//! Ground-truth mask discovery
//!
//! Each algorithm has a fixed file naming convention. The tile and date of a
//! mask are read from its full path: a mask without a date token applies to
//! every acquisition on its tile.

use crate::config::MaskSource;
use crate::io::filesystem::{find, EntryKind, SearchOptions};
use crate::types::{FloodError, FloodResult, Mask, MaskDate};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Tried in order against the full path; the first one that matches wins
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\d{8}T\d{6}", r"\d{8}-\d{6}-"]
        .iter()
        .map(|p| Regex::new(p).expect("valid mask date regex"))
        .collect()
});

static MASK_TILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}[A-Z]{3}").expect("valid mask tile regex"));

/// File name pattern of the masks produced by `algorithm`
pub fn mask_pattern(algorithm: &str) -> FloodResult<&'static str> {
    match algorithm.to_lowercase().as_str() {
        // Global Surface Water occurrence, one file per tile
        "gsw" => Ok(r"^\d{2}[A-Z]{3}.tif$"),
        // Copernicus EMS delineations, one file per acquisition
        "ems" => Ok(r"\d{2}[A-Z]{3}_\d{8}T\d{6}.tif$"),
        other => Err(FloodError::Config(format!("Unknown mask algorithm: {}", other))),
    }
}

/// Date carried by a mask path, `MaskDate::All` if there is none
pub fn mask_date(path: &str) -> FloodResult<MaskDate> {
    let token = DATE_PATTERNS
        .iter()
        .find_map(|regex| regex.find(path))
        .map(|m| m.as_str().replace(['T', '-'], ""));

    match token {
        None => Ok(MaskDate::All),
        Some(token) => NaiveDateTime::parse_from_str(&token, "%Y%m%d%H%M%S")
            .map(MaskDate::At)
            .map_err(|e| FloodError::DateParse {
                token,
                reason: e.to_string(),
            }),
    }
}

/// Last tile code appearing in a mask path
pub fn mask_tile(path: &str) -> Option<String> {
    MASK_TILE.find_iter(path).last().map(|m| m.as_str().to_string())
}

/// Masks of one algorithm below `root`, in path order
pub fn find_masks(algorithm: &str, root: &Path) -> FloodResult<Vec<Mask>> {
    let pattern = mask_pattern(algorithm)?;
    let paths = match find(pattern, root, SearchOptions::default().kind(EntryKind::File)) {
        Ok(paths) => paths,
        Err(FloodError::NotFound { .. }) => {
            log::warn!("No {} masks found in {}", algorithm, root.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut masks = Vec::with_capacity(paths.len());
    for path in paths {
        let text = path.to_string_lossy().into_owned();
        let Some(tile) = mask_tile(&text) else {
            log::warn!("Skipping mask without tile code: {}", text);
            continue;
        };
        let date = match mask_date(&text) {
            Ok(date) => date,
            Err(e) => {
                log::warn!("Skipping mask {}: {}", text, e);
                continue;
            }
        };
        log::debug!("Mask {} tile={} date={}", text, tile, date);
        masks.push(Mask {
            algorithm: algorithm.to_lowercase(),
            tile,
            date,
            path,
        });
    }
    Ok(masks)
}

/// Masks of every source, flattened in source order
pub fn scan_masks(sources: &[MaskSource]) -> FloodResult<Vec<Mask>> {
    let mut masks = Vec::new();
    for source in sources {
        let found = find_masks(&source.algorithm, &source.root)?;
        log::info!("Found {} {} masks", found.len(), source.algorithm);
        masks.extend(found);
    }
    Ok(masks)
}
