//! Training/validation dataset assembly
//!
//! Ties the configuration to the scanners and the join: products are read
//! from the mode's root, masks from the mode's ground-truth algorithms.

use crate::config::{DatasetConfig, Mode};
use crate::core::bands::{AuxiliaryBands, SyntheticBandGenerator};
use crate::core::pairing::{JoinReport, PairingEngine, PairingParams};
use crate::core::product::Product;
use crate::io::catalog::{CatalogScanner, ScanOptions};
use crate::io::masks::scan_masks;
use crate::types::{FloodResult, Mask, Pair};

/// Dataset of one mode built from a configuration
#[derive(Debug, Clone)]
pub struct Dataset {
    config: DatasetConfig,
    mode: Mode,
}

impl Dataset {
    pub fn new(config: DatasetConfig, mode: Mode) -> Self {
        Self { config, mode }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Valid products of the mode's root, restricted to declared platforms
    pub fn products(&self) -> FloodResult<Vec<Product>> {
        let options = ScanOptions {
            platforms: self.config.platforms()?,
            tiles_excluded: self.config.tiles_excluded.clone(),
            levels: self.config.levels()?,
        };
        CatalogScanner::new(options).scan(self.config.root(self.mode)?)
    }

    /// Masks of every ground-truth algorithm used by the mode
    pub fn masks(&self) -> FloodResult<Vec<Mask>> {
        scan_masks(&self.config.mask_sources(self.mode)?)
    }

    fn pairing_params(&self) -> FloodResult<PairingParams> {
        Ok(PairingParams {
            tolerance: self.config.tolerance(),
            real_bands: self.config.real_bands()?,
            synthetic_bands: self.config.synthetic_bands()?,
            auxiliary: AuxiliaryBands::new(
                self.config.path.mnt.clone(),
                &self.config.inputs.mnt_used,
                &self.config.inputs.additional_bands,
            )?,
            wdir: self.config.path.wdir.clone(),
        })
    }

    /// Scan, join and report the failing combinations
    pub fn product_pairs_with_report(
        &self,
        generator: &dyn SyntheticBandGenerator,
    ) -> FloodResult<JoinReport> {
        let params = self.pairing_params()?;
        let products = self.products()?;
        let masks = self.masks()?;

        let engine = PairingEngine::new(params, generator);
        let report = engine.join_with_report(&products, &masks, &self.config.tiles_excluded);
        log::info!(
            "{} dataset: {} pairs from {} products and {} masks",
            self.mode.as_str(),
            report.pairs.len(),
            products.len(),
            masks.len()
        );
        Ok(report)
    }

    /// Every (raster set, mask) pair of the mode
    pub fn product_pairs(&self, generator: &dyn SyntheticBandGenerator) -> FloodResult<Vec<Pair>> {
        Ok(self.product_pairs_with_report(generator)?.pairs)
    }
}
