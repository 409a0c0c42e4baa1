//! SPOT-4 and SPOT-5 MUSCATE products

use crate::core::dates::parse_muscate_stamp;
use crate::core::patterns::ProductClass;
use crate::core::product::{
    entry_name, optional_file, tile_or_raw, token, BandLookup, Product, SyntheticNaming,
    SyntheticSupport,
};
use crate::types::{FloodResult, Level, Resolution};
use std::path::Path;

const BASE_RESOLUTION: Resolution = Resolution::square(15.0);
const COARSE_RESOLUTION: Resolution = Resolution::square(240.0);

/// Indices derivable from the HRG XS channels
const SPOT_SYNTHETIC: SyntheticSupport = SyntheticSupport {
    codes: &["ndvi", "ndsi"],
    naming: SyntheticNaming::StemSuffix,
};

/// `SPOT5-HRG2-XS_20120622-083239-000_L1C_097-262-0_D_V1-0`
pub(crate) fn muscate(class: ProductClass, path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let tile = tile_or_raw(token(&base, -3)?);
    let acquisition_time = parse_muscate_stamp(token(&base, 1)?)?;
    let metadata_path = optional_file(path, "*MTD_ALL.xml");

    Ok(Product {
        class,
        root: path.to_path_buf(),
        level: Level::L1c,
        tile,
        acquisition_time,
        nodata: 0,
        base_resolution: BASE_RESOLUTION,
        coarse_resolution: COARSE_RESOLUTION,
        valid: metadata_path.is_some(),
        metadata_path,
        relative_orbit: None,
        bands: BandLookup::Search { depth: 1 },
        synthetic: SPOT_SYNTHETIC,
        components: Vec::new(),
        base,
    })
}
