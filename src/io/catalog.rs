//! Product catalog scanning
//!
//! Every file and folder below the root (the root included) is a candidate
//! product entry. Candidates are collected in file-name order, turned into
//! products (in parallel with the `parallel` feature) and sorted by
//! acquisition time with a stable sort, so the result does not depend on the
//! number of worker threads.

use crate::core::product::Product;
use crate::types::{FloodResult, Level};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filters applied to the scanned catalog
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Platform short names to keep; empty keeps every platform
    pub platforms: Vec<String>,
    pub tiles_excluded: Vec<String>,
    pub levels: Vec<Level>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            tiles_excluded: Vec::new(),
            levels: vec![Level::L1c, Level::L2a],
        }
    }
}

/// Walks a directory tree and builds the product catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogScanner {
    options: ScanOptions,
}

impl CatalogScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// All valid products below `root`, earliest acquisition first
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> FloodResult<Vec<Product>> {
        let root = root.as_ref();
        log::info!("Scanning products below {}", root.display());

        let candidates = collect_candidates(root);
        log::debug!("{} candidate entries below {}", candidates.len(), root.display());

        #[cfg(feature = "parallel")]
        let built = construct_parallel(&candidates);
        #[cfg(not(feature = "parallel"))]
        let built = construct_sequential(&candidates);

        let mut seen = HashSet::new();
        let mut products: Vec<Product> = built
            .into_iter()
            .flatten()
            .filter(|product| {
                if !product.is_valid() {
                    log::debug!("Dropping invalid product {}", product.base_name());
                    return false;
                }
                self.options.levels.contains(&product.level())
                    && !self.options.tiles_excluded.iter().any(|t| t == product.tile())
            })
            .filter(|product| seen.insert(product.clone()))
            .collect();

        products.sort_by(|a, b| a.cmp_acquisition(b));

        if !self.options.platforms.is_empty() {
            products.retain(|p| self.options.platforms.iter().any(|s| s == p.short_name()));
        }

        log::info!("Found {} products below {}", products.len(), root.display());
        Ok(products)
    }
}

/// Every entry below `root` (the root included) in file-name order
fn collect_candidates(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                log::warn!("Skipping unreadable entry below {}: {}", root.display(), e);
                None
            }
        })
        .collect()
}

fn construct_one(path: &Path) -> Option<Product> {
    match Product::try_construct(path) {
        Ok(product) => product,
        Err(e) => {
            log::warn!("Cannot build product from {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(feature = "parallel")]
fn construct_parallel(candidates: &[PathBuf]) -> Vec<Option<Product>> {
    use rayon::prelude::*;

    candidates.par_iter().map(|path| construct_one(path)).collect()
}

#[cfg(not(feature = "parallel"))]
fn construct_sequential(candidates: &[PathBuf]) -> Vec<Option<Product>> {
    candidates.iter().map(|path| construct_one(path)).collect()
}

/// Scan with explicit filters
pub fn scan_products<P: AsRef<Path>>(root: P, options: ScanOptions) -> FloodResult<Vec<Product>> {
    CatalogScanner::new(options).scan(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn s1_pair(dir: &Path, tile: &str, stamp: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(format!("s1a_{}_vv_DES_110_{}.tif", tile, stamp)), b"").unwrap();
        fs::write(dir.join(format!("s1a_{}_vh_DES_110_{}.tif", tile, stamp)), b"").unwrap();
    }

    #[test]
    fn test_scan_sorts_and_skips_noise() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let tiles = dir.path().join("s1");
        s1_pair(&tiles, "31TCJ", "20200503t101500");
        s1_pair(&tiles, "31TCJ", "20200501t101500");
        fs::write(tiles.join("README.txt"), b"").unwrap();

        let products = CatalogScanner::default().scan(dir.path()).unwrap();
        assert_eq!(products.len(), 2);
        assert!(products[0].acquisition_time() < products[1].acquisition_time());
    }

    #[test]
    fn test_scan_drops_incomplete_pairs() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        s1_pair(dir.path(), "31TCJ", "20200501t101500");
        fs::write(dir.path().join("s1a_31TCJ_vv_DES_110_20200502t101500.tif"), b"").unwrap();

        let products = CatalogScanner::default().scan(dir.path()).unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let products = CatalogScanner::default().scan("/nonexistent/floodml/catalog").unwrap();
        assert!(products.is_empty());
    }
}
