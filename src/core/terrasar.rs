//! TerraSAR-X / TanDEM-X enhanced ellipsoid corrected (EEC) scenes

use crate::core::dates::parse_compact_datetime;
use crate::core::patterns::ProductClass;
use crate::core::product::{entry_name, token, BandLookup, Product, SyntheticSupport};
use crate::io::xml::{read_document, TerraSarAnnotation};
use crate::types::{FloodError, FloodResult, Level, Resolution};
use std::path::{Path, PathBuf};

/// Scenes are not cut on a tiling grid
pub const UNTILED: &str = "untiled";

/// `TSX1_SAR__EEC_RE___SM_S_SRA_20200101T053000_20200101T053008` with `<name>.xml` inside
pub(crate) fn enhanced(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let annotation_path = path.join(format!("{}.xml", base));
    if !annotation_path.is_file() {
        return Err(FloodError::MissingCompanionFile {
            product: base,
            detail: format!("no annotation {}", annotation_path.display()),
        });
    }

    let annotation: TerraSarAnnotation = read_document(&annotation_path)?;
    let images: Vec<PathBuf> = annotation
        .image_files()
        .iter()
        .map(|file| path.join(file))
        .collect();
    let valid = !images.is_empty() && images.iter().all(|image| image.is_file());
    if !valid {
        log::debug!("{} lists {} images, not all present", base, images.len());
    }

    let spacing = annotation.product_info.image_data_info.image_raster.row_spacing.value;
    let acquisition_time = parse_compact_datetime(token(&base, -2)?)?;

    Ok(Product {
        class: ProductClass::TerraSarX,
        root: path.to_path_buf(),
        base,
        level: Level::L1c,
        tile: UNTILED.to_string(),
        acquisition_time,
        nodata: 0,
        base_resolution: Resolution::new(spacing, spacing),
        coarse_resolution: Resolution::square(240.0),
        metadata_path: Some(annotation_path),
        valid,
        relative_orbit: Some(annotation.product_info.mission_info.rel_orbit),
        bands: BandLookup::Search { depth: 2 },
        synthetic: SyntheticSupport::NONE,
        components: images,
    })
}
