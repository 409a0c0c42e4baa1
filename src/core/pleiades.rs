//! Pléiades products: THEIA `FCGC` volumes and preprojected `DS_PHR` datasets

use crate::core::dates::parse_pleiades_stamp;
use crate::core::patterns::ProductClass;
use crate::core::product::{
    entry_name, token, BandLookup, Product, SyntheticNaming, SyntheticSupport,
};
use crate::io::filesystem::{find_single, EntryKind, SearchOptions};
use crate::io::xml::{read_document, DimapDocument};
use crate::types::{FloodError, FloodResult, Level, Resolution};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

const BASE_RESOLUTION: Resolution = Resolution::square(10.0);
const COARSE_RESOLUTION: Resolution = Resolution::square(100.0);

const PLEIADES_SYNTHETIC: SyntheticSupport = SyntheticSupport {
    codes: &["ndvi"],
    naming: SyntheticNaming::StemSuffix,
};

/// Tile and acquisition time carried by a `DS_PHR...` dataset name
fn dataset_attributes(dataset: &str) -> FloodResult<(String, NaiveDateTime)> {
    let tile = format!("{}_{}", token(dataset, -3)?, token(dataset, -2)?);
    let acquisition_time = parse_pleiades_stamp(token(dataset, 2)?)?;
    Ok((tile, acquisition_time))
}

fn pleiades_product(
    class: ProductClass,
    root: PathBuf,
    base: String,
    metadata_path: Option<PathBuf>,
    valid: bool,
    bands: BandLookup,
) -> FloodResult<Product> {
    let (tile, acquisition_time) = dataset_attributes(&base)?;
    Ok(Product {
        class,
        root,
        base,
        level: Level::L1c,
        tile,
        acquisition_time,
        nodata: 0,
        base_resolution: BASE_RESOLUTION,
        coarse_resolution: COARSE_RESOLUTION,
        metadata_path,
        valid,
        relative_orbit: None,
        bands,
        synthetic: PLEIADES_SYNTHETIC,
        components: Vec::new(),
    })
}

/// THEIA delivery volume (`FCGC600...`).
///
/// The multispectral image folder and its DIMAP file are mandatory; the
/// dataset name read from the DIMAP replaces the volume name.
pub(crate) fn theia(path: &Path) -> FloodResult<Product> {
    let volume = entry_name(path);
    let missing = |detail: &str| FloodError::MissingCompanionFile {
        product: volume.clone(),
        detail: detail.to_string(),
    };

    let ms_folder = find_single(
        r"IMG_PHR\d\w_P?MS_\d*",
        path,
        SearchOptions::with_depth(1).kind(EntryKind::Folder),
    )
    .map_err(|_| missing("no IMG_PHR*MS image folder"))?;
    let dimap = find_single("DIM_PHR*XML", &ms_folder, SearchOptions::with_depth(1))
        .map_err(|_| missing("no DIM_PHR*.XML metadata"))?;

    let document: DimapDocument = read_document(&dimap)?;
    let dataset = document.dataset_identification.dataset_name.value.trim().to_string();
    log::debug!("Pleiades volume {} holds dataset {}", volume, dataset);

    pleiades_product(
        ProductClass::PleiadesTheia,
        path.to_path_buf(),
        dataset,
        Some(dimap),
        true,
        BandLookup::Search { depth: 2 },
    )
}

/// Preprojected dataset folder (`DS_PHR1A_...`); valid iff an `XS1` image is present
pub(crate) fn preprojected(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let valid = find_single("IMG_PHR*XS1", path, SearchOptions::with_depth(1)).is_ok();
    pleiades_product(
        ProductClass::PleiadesPreprojected,
        path.to_path_buf(),
        base,
        None,
        valid,
        BandLookup::Search { depth: 1 },
    )
}
