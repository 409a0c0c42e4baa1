//! Landsat-8 and Landsat-9 products
//!
//! Both satellites share every convention; only the mission digit in the
//! name differs, so one set of constructors serves the two product classes.

use crate::core::dates::{parse_day_at_noon, parse_julian_at_noon, parse_muscate_stamp};
use crate::core::patterns::{ProductClass, PREFIXED_TILE};
use crate::core::product::{
    entry_name, muscate_level, muscate_validity, natif_header, optional_file, stem, tile_or_raw,
    token, BandLookup, Product, SyntheticNaming, SyntheticSupport,
};
use crate::types::{FloodError, FloodResult, Level, Resolution};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

const BASE_RESOLUTION: Resolution = Resolution::square(30.0);
const COARSE_RESOLUTION: Resolution = Resolution::square(240.0);

const OPTICAL_SYNTHETIC: SyntheticSupport = SyntheticSupport {
    codes: &["ndvi", "mndwi"],
    naming: SyntheticNaming::StemSuffix,
};

#[allow(clippy::too_many_arguments)]
fn landsat_product(
    class: ProductClass,
    path: &Path,
    base: String,
    level: Level,
    tile: String,
    acquisition_time: NaiveDateTime,
    metadata_path: Option<PathBuf>,
    valid: bool,
) -> Product {
    Product {
        class,
        root: path.to_path_buf(),
        base,
        level,
        tile,
        acquisition_time,
        nodata: 0,
        base_resolution: BASE_RESOLUTION,
        coarse_resolution: COARSE_RESOLUTION,
        metadata_path,
        valid,
        relative_orbit: None,
        bands: BandLookup::Search { depth: 1 },
        synthetic: OPTICAL_SYNTHETIC,
        components: Vec::new(),
    }
}

/// `L8_TEST_L8C_L1VALD_196030_20170525.DBL.DIR`
pub(crate) fn natif(class: ProductClass, path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let tile = tile_or_raw(token(&base, 4)?);
    let acquisition_time = parse_day_at_noon(token(stem(&base), -1)?)?;
    let metadata_path = natif_header(path, &base);
    let valid = metadata_path.is_some();
    Ok(landsat_product(
        class,
        path,
        base,
        Level::L1c,
        tile,
        acquisition_time,
        metadata_path,
        valid,
    ))
}

/// `LANDSAT8-OLITIRS-XSTHPAN_20170501-103532-111_L2A_T31TCH_D_V1-4`
pub(crate) fn muscate(class: ProductClass, path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let level = muscate_level(&base)?;
    let tile = match PREFIXED_TILE.find(&base) {
        Some(m) => m.as_str()[1..].to_string(),
        None => token(&base, 3)?.to_string(),
    };
    let acquisition_time = parse_muscate_stamp(token(&base, 1)?)?;
    let metadata_path = optional_file(path, "*MTD_ALL.xml");
    let valid = muscate_validity(path, level, metadata_path.as_deref());
    Ok(landsat_product(
        class,
        path,
        base,
        level,
        tile,
        acquisition_time,
        metadata_path,
        valid,
    ))
}

/// Collection-1 scene id, e.g. `LC81970302015158LGN00`
///
/// Path/row sit at characters 3..9 and the acquisition day (`YYYYDDD`) at 9..16.
pub(crate) fn lc1(class: ProductClass, path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let slice = |range: std::ops::Range<usize>| {
        base.get(range).ok_or_else(|| FloodError::InvalidName {
            name: base.clone(),
            reason: "scene id too short".to_string(),
        })
    };
    let tile = slice(3..9)?.to_string();
    let acquisition_time = parse_julian_at_noon(slice(9..16)?)?;
    let metadata_path = optional_file(path, "*_MTL.txt");
    let valid = metadata_path.is_some();
    Ok(landsat_product(
        class,
        path,
        base,
        Level::L1c,
        tile,
        acquisition_time,
        metadata_path,
        valid,
    ))
}

/// Collection-2 product id, e.g. `LC08_L1TP_199029_20170527_20170615_01_T1`
pub(crate) fn lc2(class: ProductClass, path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let tile = token(&base, 2)?.to_string();
    let acquisition_time = parse_day_at_noon(token(&base, 3)?)?;
    let metadata_path = optional_file(path, "*_MTL.txt");
    let valid = metadata_path.is_some();
    Ok(landsat_product(
        class,
        path,
        base,
        Level::L1c,
        tile,
        acquisition_time,
        metadata_path,
        valid,
    ))
}
