//! Filesystem-facing modules: pattern search, metadata XML, scanners and pair files

pub mod filesystem;
pub mod xml;
pub mod catalog;
pub mod masks;
pub mod pairs;

pub use filesystem::{find, find_single, EntryKind, SearchOptions};
pub use catalog::{CatalogScanner, ScanOptions};
pub use masks::{find_masks, scan_masks};
pub use pairs::{load_pairs, save_pairs, validate_cardinality};
