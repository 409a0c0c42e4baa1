use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Acquisition platforms recognized by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Sentinel1,
    Sentinel2,
    Landsat8,
    Landsat9,
    Venus,
    Spot4,
    Spot5,
    Pleiades,
    TerraSar,
}

impl Platform {
    /// Short platform code used by band declarations (e.g. `s2_B03`)
    pub fn short_name(&self) -> &'static str {
        match self {
            Platform::Sentinel1 => "s1",
            Platform::Sentinel2 => "s2",
            Platform::Landsat8 => "l8",
            Platform::Landsat9 => "l9",
            Platform::Venus => "vns",
            Platform::Spot4 => "sp4",
            Platform::Spot5 => "sp5",
            Platform::Pleiades => "pds",
            Platform::TerraSar => "tsx",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Sentinel1 => "sentinel1",
            Platform::Sentinel2 => "sentinel2",
            Platform::Landsat8 => "landsat8",
            Platform::Landsat9 => "landsat9",
            Platform::Venus => "venus",
            Platform::Spot4 => "spot4",
            Platform::Spot5 => "spot5",
            Platform::Pleiades => "pleiades",
            Platform::TerraSar => "terrasar",
        };
        write!(f, "{}", name)
    }
}

/// Format flavor of a product (naming and metadata convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Natif,
    Muscate,
    Ssc,
    Lc1,
    Lc2,
    Theia,
    Preprojected,
    Tiled,
    Eec,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Natif => "natif",
            Variant::Muscate => "muscate",
            Variant::Ssc => "ssc",
            Variant::Lc1 => "lc1",
            Variant::Lc2 => "lc2",
            Variant::Theia => "theia",
            Variant::Preprojected => "preprojected",
            Variant::Tiled => "tiled",
            Variant::Eec => "eec",
        };
        write!(f, "{}", name)
    }
}

/// Processing level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    L1c,
    L2a,
}

impl Level {
    pub fn parse(s: &str) -> Option<Level> {
        match s.to_lowercase().as_str() {
            "l1c" => Some(Level::L1c),
            "l2a" => Some(Level::L2a),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::L1c => write!(f, "l1c"),
            Level::L2a => write!(f, "l2a"),
        }
    }
}

/// Pixel size as (x, y); y is negative for north-up rasters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Square pixels, north-up
    pub const fn square(size: f64) -> Self {
        Self { x: size, y: -size }
    }
}

/// Reference date of a ground-truth mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskDate {
    /// Valid for every acquisition on the tile (e.g. permanent water)
    All,
    /// Tied to a single acquisition
    At(NaiveDateTime),
}

impl MaskDate {
    pub fn is_all(&self) -> bool {
        matches!(self, MaskDate::All)
    }
}

impl fmt::Display for MaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskDate::All => write!(f, "all"),
            MaskDate::At(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A ground-truth raster found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub algorithm: String,
    pub tile: String,
    pub date: MaskDate,
    pub path: PathBuf,
}

/// One entry of a pair's ordered raster list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: PathBuf,
}

impl RasterDescriptor {
    pub fn new(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
        }
    }
}

/// Raster band set joined with its ground-truth mask
///
/// The order of `rasters` is a downstream contract: feature vectors are
/// assembled in exactly this order for training and inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub tile: String,
    /// Acquisition time of the product, `YYYYMMDDTHHMMSS`
    pub date: String,
    #[serde(rename = "algo")]
    pub algorithm: String,
    pub nodata: i32,
    pub rasters: Vec<RasterDescriptor>,
    #[serde(rename = "mask")]
    pub mask_path: PathBuf,
}

/// Error types for catalog scanning and pairing
#[derive(Debug, thiserror::Error)]
pub enum FloodError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Cannot find {pattern} in {}", path.display())]
    NotFound { pattern: String, path: PathBuf },

    #[error("Missing companion file for {product}: {detail}")]
    MissingCompanionFile { product: String, detail: String },

    #[error("Cannot interpret name {name}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Cannot parse date token '{token}': {reason}")]
    DateParse { token: String, reason: String },

    #[error("XML parsing error: {0}")]
    Xml(String),

    #[error("Declared band {band} not found for product {product}")]
    MissingDeclaredBand { band: String, product: String },

    #[error("Synthetic band {band} unavailable for product {product}: {reason}")]
    SyntheticBand {
        band: String,
        product: String,
        reason: String,
    },

    #[error("Auxiliary band error: {0}")]
    AuxiliaryBand(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("More than one raster-set size found in pair list: {0:?}")]
    InconsistentRasterSets(Vec<usize>),
}

/// Result type for catalog and pairing operations
pub type FloodResult<T> = Result<T, FloodError>;
