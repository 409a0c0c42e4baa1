//! floodml: satellite product catalog and ground-truth pairing
//!
//! This library recognizes satellite products (Sentinel-1/2, Landsat-8/9,
//! VENµS, SPOT, Pléiades, TerraSAR-X) from their file and folder names,
//! scans ground-truth water masks, and joins the two into ordered
//! "raster band set + mask" pairs for flood-detection model training and
//! inference.

pub mod types;
pub mod config;
pub mod io;
pub mod core;
pub mod dataset;

// Re-export main types and functions for easier access
pub use types::{
    FloodError, FloodResult, Level, Mask, MaskDate, Pair, Platform, RasterDescriptor, Resolution,
    Variant,
};

pub use config::{BandDeclaration, DatasetConfig, Mode};
pub use crate::core::{
    classify, Classification, PairingEngine, PairingParams, PrecomputedBands, Product,
    ProductClass, SyntheticBandGenerator,
};
pub use dataset::Dataset;
pub use io::{CatalogScanner, ScanOptions};
