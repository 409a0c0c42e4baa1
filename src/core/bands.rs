//! Band resolution beyond the product's own files
//!
//! Synthetic bands (indices, polarisation ratios) come from a
//! [`SyntheticBandGenerator`]. Auxiliary rasters (DEM layers, HAND) are
//! looked up per tile in directories named by the configuration.

use crate::config::AdditionalBand;
use crate::core::product::Product;
use crate::io::filesystem::{find_single, SearchOptions};
use crate::types::{FloodError, FloodResult, RasterDescriptor};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options handed to a [`SyntheticBandGenerator`]
#[derive(Debug, Clone, Default)]
pub struct SyntheticOptions {
    /// Working directory generated bands are written to
    pub wdir: PathBuf,
}

/// Produces (or locates) a derived band for a product
pub trait SyntheticBandGenerator {
    fn generate(
        &self,
        product: &Product,
        code: &str,
        options: &SyntheticOptions,
    ) -> FloodResult<PathBuf>;
}

/// Uses synthetic bands computed beforehand at their canonical location
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedBands;

impl SyntheticBandGenerator for PrecomputedBands {
    fn generate(
        &self,
        product: &Product,
        code: &str,
        options: &SyntheticOptions,
    ) -> FloodResult<PathBuf> {
        let path = product.synthetic_band_path(&options.wdir, code)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(FloodError::SyntheticBand {
                band: code.to_string(),
                product: product.base_name().to_string(),
                reason: format!("{} has not been generated", path.display()),
            })
        }
    }
}

/// DEM source; selects the version field of the auxiliary file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemOrigin {
    Srtm,
    Merit,
}

impl DemOrigin {
    fn version_pattern(&self) -> &'static str {
        match self {
            DemOrigin::Srtm => "(1001|0001)",
            DemOrigin::Merit => "2001",
        }
    }
}

/// DEM-derived layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemKind {
    Altitude,
    Aspect,
    Slope,
    Water,
}

impl DemKind {
    fn file_code(&self) -> &'static str {
        match self {
            DemKind::Altitude => "ALT",
            DemKind::Aspect => "ASP",
            DemKind::Slope => "SLP",
            DemKind::Water => "MSK",
        }
    }
}

/// A declared DEM layer such as `merit_slp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemLayer {
    pub declaration: String,
    pub origin: DemOrigin,
    pub kind: DemKind,
}

impl DemLayer {
    pub fn parse(declaration: &str) -> FloodResult<Self> {
        let unknown = || FloodError::Config(format!("Unknown mnt type: {}", declaration));
        let (origin, kind) = declaration.split_once('_').ok_or_else(unknown)?;
        let origin = match origin.to_lowercase().as_str() {
            "srtm" => DemOrigin::Srtm,
            "merit" => DemOrigin::Merit,
            _ => return Err(unknown()),
        };
        let kind = match kind.to_uppercase().as_str() {
            "ALT" => DemKind::Altitude,
            "ASP" => DemKind::Aspect,
            "SLP" => DemKind::Slope,
            "WAT" => DemKind::Water,
            _ => return Err(unknown()),
        };
        Ok(Self {
            declaration: declaration.to_string(),
            origin,
            kind,
        })
    }

    fn file_regex(&self, tile: &str) -> FloodResult<Regex> {
        let code = self.kind.file_code();
        let pattern = format!(
            r"\w+_AUX_REF\w+_T?{}_{}_({}|{}_R1).TIF$",
            regex::escape(tile),
            self.origin.version_pattern(),
            code,
            code
        );
        Ok(Regex::new(&pattern)?)
    }

    /// Locate this layer for `tile` anywhere below `mnt_root`
    pub fn resolve(&self, mnt_root: &Path, tile: &str) -> FloodResult<RasterDescriptor> {
        let regex = self.file_regex(tile)?;
        let mut matches: Vec<PathBuf> = WalkDir::new(mnt_root)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("Skipping unreadable DEM entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| regex.is_match(&path.to_string_lossy()))
            .collect();
        matches.sort();

        if matches.len() > 1 {
            log::warn!(
                "More than one match found for {} on tile {}: {:?}",
                self.declaration,
                tile,
                matches
            );
        }
        let path = matches.into_iter().next().ok_or_else(|| {
            FloodError::AuxiliaryBand(format!(
                "Cannot find {} for tile {} in {}",
                self.declaration,
                tile,
                mnt_root.display()
            ))
        })?;
        Ok(RasterDescriptor::new(self.declaration.clone(), path))
    }
}

/// Extra per-tile rasters named in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalLayer {
    /// Height above nearest drainage, stored as `<tile>.tif`
    Hand { name: String, root: PathBuf },
}

impl AdditionalLayer {
    pub fn from_config(band: &AdditionalBand) -> FloodResult<Self> {
        if band.band.eq_ignore_ascii_case("hand") {
            Ok(AdditionalLayer::Hand {
                name: band.band.clone(),
                root: band.path.clone(),
            })
        } else {
            Err(FloodError::Config(format!("Unknown band encountered: {}", band.band)))
        }
    }

    pub fn resolve(&self, tile: &str) -> FloodResult<RasterDescriptor> {
        match self {
            AdditionalLayer::Hand { name, root } => {
                let pattern = format!("{}.tif", regex::escape(tile));
                let path = find_single(&pattern, root, SearchOptions::default()).map_err(|_| {
                    FloodError::AuxiliaryBand(format!(
                        "Cannot find {} for tile {} in {}",
                        name,
                        tile,
                        root.display()
                    ))
                })?;
                Ok(RasterDescriptor::new(name.clone(), path))
            }
        }
    }
}

/// DEM and additional layers appended after the product bands
#[derive(Debug, Clone, Default)]
pub struct AuxiliaryBands {
    pub mnt_root: Option<PathBuf>,
    pub dem_layers: Vec<DemLayer>,
    pub additional: Vec<AdditionalLayer>,
}

impl AuxiliaryBands {
    pub fn new(
        mnt_root: Option<PathBuf>,
        mnt_used: &[String],
        additional: &[AdditionalBand],
    ) -> FloodResult<Self> {
        let dem_layers = mnt_used
            .iter()
            .map(|decl| DemLayer::parse(decl))
            .collect::<FloodResult<Vec<_>>>()?;
        if !dem_layers.is_empty() && mnt_root.is_none() {
            return Err(FloodError::Config(
                "DEM layers are declared but no mnt path is configured".to_string(),
            ));
        }
        let additional = additional
            .iter()
            .map(AdditionalLayer::from_config)
            .collect::<FloodResult<Vec<_>>>()?;
        Ok(Self {
            mnt_root,
            dem_layers,
            additional,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.dem_layers.is_empty() && self.additional.is_empty()
    }

    /// DEM layers first, then additional bands, each in declaration order
    pub fn resolve(&self, tile: &str) -> FloodResult<Vec<RasterDescriptor>> {
        let mut rasters = Vec::with_capacity(self.dem_layers.len() + self.additional.len());
        if let Some(mnt_root) = &self.mnt_root {
            for layer in &self.dem_layers {
                rasters.push(layer.resolve(mnt_root, tile)?);
            }
        }
        for layer in &self.additional {
            rasters.push(layer.resolve(tile)?);
        }
        Ok(rasters)
    }
}
