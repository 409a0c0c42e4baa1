//! Product recognition, per-platform variants and the mask/product join

pub mod patterns;
pub mod dates;
pub mod product;
pub mod sentinel1;
pub mod sentinel2;
pub mod landsat;
pub mod venus;
pub mod spot;
pub mod pleiades;
pub mod terrasar;
pub mod bands;
pub mod pairing;

// Re-export main types
pub use patterns::{classify, Classification, PatternTable, ProductClass};
pub use product::{BandLookup, Product, SyntheticNaming, SyntheticSupport};
pub use bands::{AuxiliaryBands, PrecomputedBands, SyntheticBandGenerator, SyntheticOptions};
pub use pairing::{JoinReport, PairFailure, PairingEngine, PairingParams};
