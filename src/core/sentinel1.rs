//! Sentinel-1 tiled GRD products
//!
//! A tiled acquisition is a pair of GeoTIFFs sharing one directory with
//! other acquisitions of the tile:
//! `s1a_31TCJ_vv_DES_110_20200501t101500.tif` and its `_vh_` sibling.
//! The VV file is the product entry; its parent directory is the root.

use crate::core::dates::parse_s1_stamp;
use crate::core::patterns::{ProductClass, TILE};
use crate::core::product::{
    entry_name, token, BandLookup, Product, SyntheticNaming, SyntheticSupport,
};
use crate::types::{FloodError, FloodResult, Level, Resolution};
use std::path::Path;

const S1_SYNTHETIC: SyntheticSupport = SyntheticSupport {
    codes: &["vvovervh", "vhovervv", "vvplusvh", "vhplusvv"],
    naming: SyntheticNaming::PolarisationSubdir,
};

pub(crate) fn tiled(path: &Path) -> FloodResult<Product> {
    let name = entry_name(path);
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.clone());
    let root = path.parent().map(Path::to_path_buf).ok_or_else(|| {
        FloodError::InvalidName {
            name: name.clone(),
            reason: "no parent directory".to_string(),
        }
    })?;

    let vh = root.join(name.replace("_vv_", "_vh_"));
    if !vh.is_file() {
        return Err(FloodError::MissingCompanionFile {
            product: name,
            detail: format!("no VH polarisation at {}", vh.display()),
        });
    }

    let tile = TILE
        .find(&base)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FloodError::InvalidName {
            name: name.clone(),
            reason: "no tile code".to_string(),
        })?;
    let acquisition_time = parse_s1_stamp(token(&base, -1)?)?;
    let relative_orbit = token(&base, 4)?.parse::<u32>().ok();

    Ok(Product {
        class: ProductClass::Sentinel1Tiled,
        root,
        base,
        level: Level::L1c,
        tile,
        acquisition_time,
        nodata: 0,
        base_resolution: Resolution::square(10.0),
        coarse_resolution: Resolution::square(240.0),
        metadata_path: None,
        valid: path.is_file(),
        relative_orbit,
        bands: BandLookup::PolarisationSibling,
        synthetic: S1_SYNTHETIC,
        components: vec![path.to_path_buf(), vh],
    })
}
