//! Mask/product join
//!
//! Every mask is matched against the products of its tile. A dated mask
//! accepts products within the tolerance window (boundary included) or, for
//! products without a known hour, on the same calendar day. An `all` mask
//! accepts every product of the tile.
//!
//! The raster list of a pair follows the declared band order: real bands,
//! synthetic bands, then auxiliary layers. A band that cannot be resolved
//! fails that one pair; the join goes on with the rest.

use crate::config::BandDeclaration;
use crate::core::bands::{AuxiliaryBands, SyntheticBandGenerator, SyntheticOptions};
use crate::core::dates::{format_key, is_midnight};
use crate::core::product::Product;
use crate::types::{FloodError, FloodResult, Mask, MaskDate, Pair, RasterDescriptor};
use chrono::Duration;
use std::collections::HashSet;
use std::path::PathBuf;

/// Join parameters
#[derive(Debug, Clone)]
pub struct PairingParams {
    /// Maximum distance between a mask date and an acquisition (inclusive)
    pub tolerance: Duration,
    pub real_bands: Vec<BandDeclaration>,
    pub synthetic_bands: Vec<BandDeclaration>,
    pub auxiliary: AuxiliaryBands,
    /// Working directory handed to the synthetic band generator
    pub wdir: PathBuf,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            tolerance: Duration::hours(1),
            real_bands: Vec::new(),
            synthetic_bands: Vec::new(),
            auxiliary: AuxiliaryBands::default(),
            wdir: PathBuf::new(),
        }
    }
}

/// A (mask, product) combination whose pair could not be built
#[derive(Debug)]
pub struct PairFailure {
    pub mask: PathBuf,
    pub product: String,
    pub error: FloodError,
}

/// Pairs built by a join plus the combinations that failed
#[derive(Debug, Default)]
pub struct JoinReport {
    pub pairs: Vec<Pair>,
    pub failures: Vec<PairFailure>,
}

/// Joins masks to products
pub struct PairingEngine<'a> {
    params: PairingParams,
    generator: &'a dyn SyntheticBandGenerator,
}

impl<'a> PairingEngine<'a> {
    pub fn new(params: PairingParams, generator: &'a dyn SyntheticBandGenerator) -> Self {
        Self { params, generator }
    }

    pub fn params(&self) -> &PairingParams {
        &self.params
    }

    /// Pairs in mask order; failing combinations are logged and skipped
    pub fn join(&self, products: &[Product], masks: &[Mask], excluded_tiles: &[String]) -> Vec<Pair> {
        self.join_with_report(products, masks, excluded_tiles).pairs
    }

    pub fn join_with_report(
        &self,
        products: &[Product],
        masks: &[Mask],
        excluded_tiles: &[String],
    ) -> JoinReport {
        let mut report = JoinReport::default();
        if products.is_empty() || masks.is_empty() {
            log::info!(
                "Nothing to join: {} products, {} masks",
                products.len(),
                masks.len()
            );
            return report;
        }

        let relevant: HashSet<&str> = masks
            .iter()
            .map(|m| m.tile.as_str())
            .chain(products.iter().map(|p| p.tile()))
            .filter(|tile| !excluded_tiles.iter().any(|t| t.as_str() == *tile))
            .collect();

        for mask in masks {
            if !relevant.contains(mask.tile.as_str()) {
                continue;
            }

            let mut candidates: Vec<&Product> =
                products.iter().filter(|p| self.matches(p, mask)).collect();
            if candidates.is_empty() {
                log::debug!("No product for {} mask {}", mask.algorithm, mask.path.display());
                continue;
            }

            if candidates.len() > 1 && !mask.date.is_all() {
                log::warn!(
                    "{} products match {} mask of tile {} at {}, keeping the earliest",
                    candidates.len(),
                    mask.algorithm,
                    mask.tile,
                    mask.date
                );
                // min_by returns the first of equal elements
                let earliest = candidates
                    .iter()
                    .copied()
                    .min_by(|a, b| a.cmp_acquisition(b));
                candidates = earliest.into_iter().collect();
            }

            for product in candidates {
                match self.build_pair(product, mask) {
                    Ok(Some(pair)) => report.pairs.push(pair),
                    Ok(None) => {}
                    Err(error) => {
                        log::warn!(
                            "Cannot build {} pair for {} on tile {}: {}",
                            mask.algorithm,
                            product.base_name(),
                            mask.tile,
                            error
                        );
                        report.failures.push(PairFailure {
                            mask: mask.path.clone(),
                            product: product.base_name().to_string(),
                            error,
                        });
                    }
                }
            }
        }

        log::info!(
            "Joined {} pairs from {} masks ({} failures)",
            report.pairs.len(),
            masks.len(),
            report.failures.len()
        );
        report
    }

    /// Whether `product` corresponds to `mask`
    pub fn matches(&self, product: &Product, mask: &Mask) -> bool {
        if product.tile() != mask.tile {
            return false;
        }
        match mask.date {
            MaskDate::All => true,
            MaskDate::At(date) => {
                let acquisition = product.acquisition_time();
                let delta = (acquisition - date).abs();
                delta <= self.params.tolerance
                    || (is_midnight(&acquisition) && acquisition.date() == date.date())
            }
        }
    }

    /// Ordered rasters of `product`; `None` when no declared band applies
    pub fn rasters_for(&self, product: &Product) -> FloodResult<Option<Vec<RasterDescriptor>>> {
        let short_name = product.short_name();
        let mut rasters = Vec::new();

        for decl in self.params.real_bands.iter().filter(|d| d.applies_to(short_name)) {
            let path = product.find_band(&decl.code)?;
            rasters.push(RasterDescriptor::new(decl.code.clone(), path));
        }

        let options = SyntheticOptions {
            wdir: self.params.wdir.clone(),
        };
        for decl in self.params.synthetic_bands.iter().filter(|d| d.applies_to(short_name)) {
            let path = self.generator.generate(product, &decl.code, &options)?;
            rasters.push(RasterDescriptor::new(decl.code.clone(), path));
        }

        if rasters.is_empty() {
            return Ok(None);
        }

        rasters.extend(self.params.auxiliary.resolve(product.tile())?);
        Ok(Some(rasters))
    }

    fn build_pair(&self, product: &Product, mask: &Mask) -> FloodResult<Option<Pair>> {
        let Some(rasters) = self.rasters_for(product)? else {
            log::debug!("No declared band applies to {}", product.base_name());
            return Ok(None);
        };
        Ok(Some(Pair {
            tile: product.tile().to_string(),
            date: format_key(&product.acquisition_time()),
            algorithm: mask.algorithm.clone(),
            nodata: product.nodata(),
            rasters,
            mask_path: mask.path.clone(),
        }))
    }
}
